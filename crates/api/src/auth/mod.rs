//! Authentication primitives.
//!
//! Tokens are issued by an external identity service; this server only
//! validates them. The `test-util` feature adds
//! `jwt::generate_access_token` for tests that need to mint one.

pub mod jwt;
