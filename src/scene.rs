//! A software ray intersection backend for the range sampler, built on `parry3d`. The scene is a
//! flat list of positioned shapes, and every ray is tested against all of them.

use crate::sampler::RayCaster;
use crate::{Iso3, Point3, UnitVec3};
use parry3d_f64::query::{Ray, RayCast};
use parry3d_f64::shape::{Shape, SharedShape};

#[derive(Clone, Default)]
pub struct ShapeScene {
    shapes: Vec<(Iso3, SharedShape)>,
}

impl ShapeScene {
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Add an arbitrary `parry3d` shape placed at `iso`. Returns the index of the shape.
    pub fn add_shape(&mut self, iso: Iso3, shape: SharedShape) -> usize {
        self.shapes.push((iso, shape));
        self.shapes.len() - 1
    }

    pub fn add_ball(&mut self, center: Point3, radius: f64) -> usize {
        self.add_shape(
            Iso3::translation(center.x, center.y, center.z),
            SharedShape::ball(radius),
        )
    }

    /// Add an oriented box, where `half_extents` are half of the box size along its local axes
    pub fn add_cuboid(&mut self, iso: Iso3, half_extents: [f64; 3]) -> usize {
        let [hx, hy, hz] = half_extents;
        self.add_shape(iso, SharedShape::cuboid(hx, hy, hz))
    }

    /// Add an infinite half space bounded by a plane through `point` with the given outward
    /// normal. Everything behind the plane is solid.
    pub fn add_half_space(&mut self, point: Point3, normal: UnitVec3) -> usize {
        self.add_shape(
            Iso3::translation(point.x, point.y, point.z),
            SharedShape::halfspace(normal),
        )
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Find the distance along the ray to the nearest shape within `max_distance`
    pub fn nearest_impact(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
        self.shapes
            .iter()
            .filter_map(|(iso, shape)| {
                let shape: &dyn Shape = &**shape;
                shape.cast_ray(iso, ray, max_distance, true)
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}

impl RayCaster for ShapeScene {
    fn cast_ray(&self, origin: &Point3, direction: &UnitVec3, max_distance: f64) -> Option<Point3> {
        let ray = Ray::new(*origin, direction.into_inner());
        self.nearest_impact(&ray, max_distance)
            .map(|toi| ray.point_at(toi))
    }
}
