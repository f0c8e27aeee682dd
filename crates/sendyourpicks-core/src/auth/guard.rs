//! Route guards: who may load which page, and where everyone else goes.

use super::role::{is_admin, is_commissioner, Role};
use super::validator::ValidatedSession;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const AUTH_ERROR_PATH: &str = "/auth/error";

pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";

/// Prefixes reachable without a session (besides `/` itself).
const PUBLIC_ROUTES: [&str; 2] = ["/login", "/auth"];

/// Why a guard stopped the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardRejection {
    /// 303 See Other to `location`.
    Redirect { location: &'static str },
    /// 403 with a message.
    Forbidden(&'static str),
}

impl GuardRejection {
    pub fn status(&self) -> u16 {
        match self {
            GuardRejection::Redirect { .. } => 303,
            GuardRejection::Forbidden(_) => 403,
        }
    }

    fn to_login() -> Self {
        GuardRejection::Redirect {
            location: LOGIN_PATH,
        }
    }
}

/// Role requirement of a protected section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Commissioner,
    Admin,
}

impl RouteAccess {
    /// Section a path belongs to, if it is role-protected.
    pub fn for_path(path: &str) -> Option<Self> {
        if matches_section(path, "/admin") {
            Some(RouteAccess::Admin)
        } else if matches_section(path, "/commissioner") {
            Some(RouteAccess::Commissioner)
        } else {
            None
        }
    }

    pub fn permits(self, role: Option<&Role>) -> bool {
        match self {
            RouteAccess::Commissioner => is_commissioner(role),
            RouteAccess::Admin => is_admin(role),
        }
    }
}

/// `section` itself or anything below it, but not `/adminx`.
fn matches_section(path: &str, section: &str) -> bool {
    path == section
        || path
            .strip_prefix(section)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
}

pub fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTES.iter().any(|route| matches_section(path, route))
}

/// Site-wide guard: every page except `/` and the public sections needs a
/// session.
pub fn root_layout_guard(auth: &ValidatedSession, path: &str) -> Result<(), GuardRejection> {
    if auth.session.is_none() && !is_public_route(path) && path != "/" {
        return Err(GuardRejection::to_login());
    }
    Ok(())
}

/// Section guard for role-protected pages. Returns the role that passed.
pub fn require_role(auth: &ValidatedSession, access: RouteAccess) -> Result<Role, GuardRejection> {
    if auth.session.is_none() {
        return Err(GuardRejection::to_login());
    }
    match auth.role() {
        Some(role) if access.permits(Some(&role)) => Ok(role),
        _ => Err(GuardRejection::Forbidden(INSUFFICIENT_PERMISSIONS)),
    }
}

/// Signed-in users never see the login page.
pub fn login_page_guard(auth: &ValidatedSession) -> Result<(), GuardRejection> {
    if auth.session.is_some() {
        return Err(GuardRejection::Redirect {
            location: DASHBOARD_PATH,
        });
    }
    Ok(())
}

/// Where `/` sends a visitor.
pub fn landing_target(auth: &ValidatedSession) -> &'static str {
    if auth.session.is_some() {
        DASHBOARD_PATH
    } else {
        LOGIN_PATH
    }
}

/// Where to go after an email-link code exchange.
pub fn code_exchange_target(succeeded: bool) -> &'static str {
    if succeeded {
        DASHBOARD_PATH
    } else {
        AUTH_ERROR_PATH
    }
}
