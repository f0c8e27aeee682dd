//! Authentication: session persistence, validation and route guards.
//!
//! This module provides:
//! - `AuthProvider` / `GoTrueProvider`: the remote identity oracle
//! - `AuthClient`: request-scoped session access backed by cookies, with
//!   transparent refresh
//! - `validate_session`: the per-request check that turns cookies into a
//!   trusted `{session, user}` pair (or an anonymous result)
//! - `token`: unverified claim decoding for role checks and diagnostics
//! - `guard`: login redirects and role-gated sections

pub mod client;
pub mod cookies;
pub mod error;
pub mod guard;
pub mod provider;
pub mod role;
pub mod session;
pub mod token;
pub mod validator;

pub use client::AuthClient;
pub use cookies::{CookieJar, SessionCookies, SetCookie};
pub use error::{AuthApiError, AuthFailureKind};
pub use guard::{GuardRejection, RouteAccess};
pub use provider::{AuthProvider, GoTrueProvider};
pub use role::{is_admin, is_commissioner, Role};
pub use session::{AuthUser, Session};
pub use token::{decode_claims, jwt_debug_info, role_from_token, JwtDebugInfo, TokenClaims};
pub use validator::{validate_session, ValidatedSession};
