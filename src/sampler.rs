//! The range sampler casts one ray per lattice cell into the world and records where it stopped.

use crate::lattice::SampleLattice;
use crate::{Iso3, Point3, UnitVec3};
use log::debug;

/// The ray intersection query the sampler depends on. Implementations must return the nearest
/// intersection along the ray which is no farther than `max_distance` from the origin, or `None`
/// if there isn't one. The query must not modify the world.
pub trait RayCaster {
    fn cast_ray(&self, origin: &Point3, direction: &UnitVec3, max_distance: f64) -> Option<Point3>;
}

impl<F> RayCaster for F
where
    F: Fn(&Point3, &UnitVec3, f64) -> Option<Point3>,
{
    fn cast_ray(&self, origin: &Point3, direction: &UnitVec3, max_distance: f64) -> Option<Point3> {
        self(origin, direction, max_distance)
    }
}

/// Counts of the ray outcomes of a single sampling pass
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SampleStats {
    pub hits: usize,
    pub misses: usize,
}

/// The point recorded for a ray which hits nothing, at exactly `max_distance` along the ray
pub fn miss_point(origin: &Point3, direction: &UnitVec3, max_distance: f64) -> Point3 {
    origin + direction.into_inner() * max_distance
}

/// Cast a ray for every cell of the lattice and store the world space hit point in the cell.
///
/// Each cell's local direction is rotated by the orientation of `pose` and cast from the position
/// of `pose`. A ray which doesn't hit anything within `detection_distance` stores the point at
/// exactly `detection_distance` along the ray, so every cell always holds a finite point.
///
/// Every cell in the lattice is sampled, including cells beyond the current field of view which
/// were created by an earlier, wider configuration.
///
/// # Arguments
///
/// * `lattice`: the lattice holding the directions to sample, hit points are written in place
/// * `caster`: the ray intersection query
/// * `pose`: the world position and orientation of the sensor
/// * `detection_distance`: the maximum range of every ray
///
/// returns: SampleStats
pub fn sample_ranges<C: RayCaster + ?Sized>(
    lattice: &mut SampleLattice,
    caster: &C,
    pose: &Iso3,
    detection_distance: f64,
) -> SampleStats {
    let origin = Point3::from(pose.translation.vector);
    let mut stats = SampleStats::default();

    for (_, cell) in lattice.iter_mut() {
        let direction = pose.rotation * cell.direction;
        cell.hit_point = match caster.cast_ray(&origin, &direction, detection_distance) {
            Some(hit) => {
                stats.hits += 1;
                hit
            }
            None => {
                stats.misses += 1;
                miss_point(&origin, &direction, detection_distance)
            }
        };
    }

    debug!("Sampled {} hits and {} misses", stats.hits, stats.misses);
    stats
}
