//! Send Your Picks core library.
//!
//! Shared by the web server and its tests:
//!
//! - `auth`: cookie-backed sessions, provider-verified session validation,
//!   route guards
//! - `logging`: the structured one-line event log
//! - `api`: REST client for the picks backend
//! - `models`: backend data types
//! - `config`: environment configuration
//! - `utils`: display formatters

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod models;
pub mod utils;

pub use config::Config;
