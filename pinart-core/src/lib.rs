//! Core data structures and traits for pinart
//!
//! This crate provides the fundamental types of the depth-to-pin pipeline:
//! depth buffers, the fixed pin grid description, pin height buffers, the
//! sink trait consumed by renderers, and session configuration.

pub mod depth;
pub mod grid;
pub mod heights;
pub mod traits;
pub mod config;
pub mod error;

pub use depth::*;
pub use grid::*;
pub use heights::*;
pub use traits::*;
pub use config::*;
pub use error::*;
