//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Sign-up and login with Argon2 password hashes

pub mod auth;
