//! Small shared constructs used across the projection pipeline.

mod angles;

pub use angles::{ANGLE_TOL, AngularSpan, AngularSteps};
