//! REST API client module for the Send Your Picks backend.
//!
//! This module provides the `ApiClient` for calling the backend with the
//! user's bearer token, plus typed helpers for each backend route.
//! Every call is logged through the structured `Logger`.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::{handle_api_error, ApiClient};
pub use endpoints::{NewSeason, SpreadUpdate, WeekPickProgress};
pub use error::{ApiError, REQUEST_FAILED};
