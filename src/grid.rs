//! The angular grid generator. It turns the sensor's rectangular field of view into a lattice of
//! unit direction vectors in the sensor's local frame, where +Z is forward, +X is right and +Y is
//! up.

use crate::config::SensorConfig;
use crate::lattice::SampleLattice;
use crate::{UnitQuat, UnitVec3, Vector3};
use log::trace;

/// Compute the local direction of a single ray. The forward vector is pitched about the local
/// right axis and then yawed about the local up axis, both angles in degrees.
///
/// # Arguments
///
/// * `pitch`: rotation about +X, in degrees
/// * `yaw`: rotation about +Y, in degrees
///
/// returns: Unit<Matrix<f64, Const<3>, Const<1>, ArrayStorage<f64, 3, 1>>>
///
/// # Examples
///
/// ```
/// use lidar_projection::grid::ray_direction;
/// use approx::assert_relative_eq;
/// let d = ray_direction(0.0, 90.0);
/// assert_relative_eq!(d.x, 1.0, epsilon = 1.0e-12);
/// ```
pub fn ray_direction(pitch: f64, yaw: f64) -> UnitVec3 {
    let yaw = UnitQuat::from_axis_angle(&Vector3::y_axis(), yaw.to_radians());
    let pitch = UnitQuat::from_axis_angle(&Vector3::x_axis(), pitch.to_radians());
    (yaw * pitch) * Vector3::z_axis()
}

/// Write the direction of every sample in the current field of view into the lattice, growing
/// it as needed, and return the (rows, columns) extent of the field of view.
///
/// The column angle comes from `x_span` and is applied as the pitch, the row angle comes from
/// `y_span` and is applied as the yaw. Directions are recomputed on every call even when the
/// lattice doesn't need to grow.
///
/// Cells outside of the returned extent, left over from a wider field of view on an earlier
/// cycle, are not touched.
pub fn generate_directions(config: &SensorConfig, lattice: &mut SampleLattice) -> (usize, usize) {
    let x_span = config.x_span();
    let y_span = config.y_span();
    let mut rows = 0;
    let mut columns = 0;

    for (iy, curr_y) in y_span.steps().enumerate() {
        for (ix, curr_x) in x_span.steps().enumerate() {
            let direction = ray_direction(curr_x, curr_y);
            trace!("ray ({}, {}) at ({:.2}, {:.2}): {:?}", iy, ix, curr_x, curr_y, direction);

            lattice.ensure_cell(iy, ix).direction = direction;
            columns = columns.max(ix + 1);
            rows = iy + 1;
        }
    }

    (rows, columns)
}
