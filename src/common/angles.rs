//! This module contains common constructs for stepping through angular ranges

use serde::{Deserialize, Serialize};

pub const ANGLE_TOL: f64 = 1.0e-12;

/// One axis of a rectangular field of view, in degrees. The span is centered on zero, so it
/// covers `[-range / 2, range / 2)` and is sampled every `interval` degrees starting from the
/// lower bound.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngularSpan {
    pub range: f64,
    pub interval: f64,
}

impl AngularSpan {
    pub fn new(range: f64, interval: f64) -> Self {
        Self { range, interval }
    }

    /// The first angle of the span, inclusive
    pub fn start(&self) -> f64 {
        -self.range / 2.0
    }

    /// The last angle of the span, exclusive
    pub fn end(&self) -> f64 {
        self.range / 2.0
    }

    /// Returns an iterator over the sample angles of the span. The angles are `start + i *
    /// interval` for `i = 0, 1, ...` for as long as the angle is strictly less than `end`, so an
    /// interval which doesn't evenly divide the range still produces a final, narrower step but
    /// never the terminal angle itself.
    ///
    /// Each angle is computed from its index rather than by accumulating the interval, so the
    /// same span always produces exactly the same angles.
    ///
    /// # Examples
    ///
    /// ```
    /// use lidar_projection::common::AngularSpan;
    /// let span = AngularSpan::new(100.0, 30.0);
    /// let angles = span.steps().collect::<Vec<_>>();
    /// assert_eq!(angles, vec![-50.0, -20.0, 10.0, 40.0]);
    /// ```
    pub fn steps(&self) -> AngularSteps {
        AngularSteps {
            start: self.start(),
            end: self.end(),
            interval: self.interval,
            index: 0,
        }
    }

    /// The number of angles `steps()` will produce
    pub fn count(&self) -> usize {
        self.steps().count()
    }
}

/// Iterator over the sample angles of an `AngularSpan`
#[derive(Clone, Debug)]
pub struct AngularSteps {
    start: f64,
    end: f64,
    interval: f64,
    index: usize,
}

impl Iterator for AngularSteps {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        // A zero, negative, or NaN interval would never reach the end of the span, and neither
        // would an unbounded range
        if !(self.interval > 0.0 && self.interval.is_finite()) || !self.start.is_finite() {
            return None;
        }

        let angle = self.start + self.index as f64 * self.interval;
        if angle < self.end {
            self.index += 1;
            Some(angle)
        } else {
            None
        }
    }
}
