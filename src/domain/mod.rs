//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the pipeline.
//! Types here should have no raster or async dependencies to avoid
//! circular imports from the rendering and compositing modules.

pub mod annotation;
pub mod geometry;
pub mod screen;

pub use annotation::*;
pub use geometry::*;
pub use screen::*;
