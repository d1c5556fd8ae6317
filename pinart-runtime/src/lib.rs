//! # pinart Runtime
//!
//! Runs depth inference and pin actuation as two independent periodic tasks.
//!
//! The tasks share nothing but a single-slot [`FrameSlot`]: inference
//! publishes each new depth buffer into it, replacing the previous one, and
//! actuation reads whatever buffer is current when it ticks. Frames the
//! actuation side never saw are dropped, never queued.

pub mod slot;
pub mod estimator;
pub mod resolution;
pub mod stats;
pub mod tasks;
pub mod session;

pub use slot::*;
pub use estimator::*;
pub use resolution::*;
pub use stats::*;
pub use tasks::*;
pub use session::*;
