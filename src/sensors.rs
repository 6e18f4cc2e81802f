//! This module contains tools for simulating sensors and sensor data

mod lidar_projection;

use crate::sampler::RayCaster;
use crate::{Iso3, Point3};

pub use lidar_projection::{CycleReport, LidarProjector};

/// A sensor which can be placed in a scene and produce the world points it measures. Along with
/// the points, a sensor may return one scalar value per point, such as a range or an intensity.
pub trait SimulatedPointSensor {
    fn get_points(&mut self, scene: &dyn RayCaster, iso: &Iso3) -> (Vec<Point3>, Option<Vec<f64>>);
}
