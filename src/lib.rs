//! Simulated LIDAR projection: casts a rectangular lattice of rays from a sensor pose, measures
//! how far each ray travels before it hits something, and turns every sample into a small
//! screen-facing quad whose color encodes the measured range.

use std::error::Error;

pub mod common;
pub mod config;
pub mod errors;
pub mod grid;
pub mod lattice;
pub mod line_batch;
pub mod palette;
pub mod quad;
pub mod sampler;
pub mod scene;
pub mod sensors;

pub use parry3d_f64::na;

pub use config::SensorConfig;
pub use lattice::{LatticeCell, SampleLattice};
pub use line_batch::{LineBatch, Polyline, PolylineId};
pub use palette::{Color, Palette};
pub use quad::{DrawableHost, QuadRenderer};
pub use sampler::{RayCaster, SampleStats};
pub use scene::ShapeScene;
pub use sensors::{CycleReport, LidarProjector};

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

pub type Point3 = parry3d_f64::na::Point3<f64>;
pub type Vector3 = parry3d_f64::na::Vector3<f64>;
pub type UnitVec3 = parry3d_f64::na::Unit<Vector3>;
pub type UnitQuat = parry3d_f64::na::UnitQuaternion<f64>;
pub type Iso3 = parry3d_f64::na::Isometry3<f64>;
