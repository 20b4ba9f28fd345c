//! Core types for Garden Planner.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod favorite;
pub mod id;

pub use favorite::{Favorite, FavoriteSet, PlantId, PlantIdError, Safety};
pub use id::*;
