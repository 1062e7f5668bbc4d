//! # Domain Layer
//!
//! Pure rating logic with no I/O.
//!
//! - [`value_objects`]: identifiers, enums, timestamps
//! - [`entities`]: market maker baselines and ratings, alerts
//! - [`services`]: metric generation, pillar scoring, red-flag detection,
//!   grade classification and the rating engine that composes them
//! - [`errors`]: domain error type

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
