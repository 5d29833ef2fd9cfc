//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the caller named by a Bearer token.
//! - [`auth::authenticate`] -- token check shared with the socket upgrade.

pub mod auth;
