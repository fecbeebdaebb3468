//! # vecta-core
//!
//! Core types and primitives for the Vecta motion-design engine.
//! This crate contains foundational types shared across all Vecta crates:
//! colors, points, transforms, editor configuration, content hashing and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod hash;
pub mod math;

pub use config::*;

pub use color::Color;
pub use error::{VectaError, VectaResult};
pub use hash::ContentHash;
pub use math::{Point2D, Transform2D};
