//! # pinart Algorithms
//!
//! The numerical core of the depth-to-pin pipeline.
//!
//! A frame flows through these modules in order: the depth range is scanned
//! ([`normalize`]), every pin is mapped to a buffer coordinate ([`hex_grid`]),
//! the depth field is evaluated there with separable quadratic Lagrange
//! interpolation ([`resample`]), and [`actuation`] turns the normalized value
//! into a pin height.

pub mod normalize;
pub mod resample;
pub mod hex_grid;
pub mod layout;
pub mod actuation;
pub mod parallel;
pub mod preview;

// Re-export commonly used items
pub use normalize::*;
pub use resample::*;
pub use hex_grid::*;
pub use layout::*;
pub use actuation::*;
pub use parallel::{Parallelism, ThreadPoolConfig};
pub use preview::*;
