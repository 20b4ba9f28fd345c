//! Business logic services.
//!
//! # Services
//!
//! - `auth` - account signup, login, and password changes
//! - `credentials` - bcrypt hashing on the blocking thread pool

pub mod auth;
pub mod credentials;
