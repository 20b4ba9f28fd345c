//! Garden Planner Core - Shared types library.
//!
//! This crate provides common types used across all Garden Planner components:
//! - `server` - JSON API for accounts, favorites, layouts, and comments
//! - `cli` - Command-line tools for migrations and catalog imports
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document IDs, plant IDs, and favorites

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
