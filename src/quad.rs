//! The quad renderer turns each lattice sample into a small square outline positioned at the hit
//! point, facing the same way as the sensor, and colored by the sample's range.

use crate::config::SensorConfig;
use crate::lattice::SampleLattice;
use crate::palette::{Color, Palette};
use crate::{Iso3, Point3, UnitQuat, Vector3};
use log::debug;

/// The outline of a unit square as a connected strip of 8 points in the XY plane. The first four
/// points trace the square's border and the last four cross it, so the strip draws the square and
/// both of its diagonals.
pub const QUAD_TEMPLATE: [[f64; 2]; 8] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [0.0, 0.0],
    [1.0, 1.0],
    [1.0, 0.0],
    [0.0, 1.0],
];

/// The renderer collaborator which owns the actual drawable primitives. Each drawable is a
/// polyline of 8 points with a uniform width and a single flat color.
pub trait DrawableHost {
    type Handle;

    /// Create a new, named drawable whose lifetime is tied to `parent`
    fn create_drawable(&mut self, parent: &str, name: &str) -> Self::Handle;

    /// Replace the points, width, and color of an existing drawable
    fn update_drawable(
        &mut self,
        handle: &Self::Handle,
        points: &[Point3; 8],
        width: f64,
        color: Color,
    );

    /// Destroy a drawable. Hosts which tie drawable lifetimes to the parent may ignore this.
    fn release_drawable(&mut self, _handle: Self::Handle) {}
}

/// Compute the 8 strip points of a quad. Each template point is shifted so the square is centered
/// on the origin, scaled by `square_size`, rotated, and finally moved to `position`.
///
/// # Arguments
///
/// * `rotation`: the orientation of the quad, normally the sensor's orientation
/// * `position`: the world position of the quad's center
/// * `square_size`: the edge length of the quad
///
/// returns: [OPoint<f64, Const<3>>; 8]
pub fn quad_corners(rotation: &UnitQuat, position: &Point3, square_size: f64) -> [Point3; 8] {
    QUAD_TEMPLATE.map(|[x, y]| {
        let local = Vector3::new(x - 0.5, y - 0.5, 0.0) * square_size;
        position + rotation * local
    })
}

/// The distance from `origin` to `point` as a fraction of `detection_distance`, clamped to [0, 1]
pub fn normalized_range(origin: &Point3, point: &Point3, detection_distance: f64) -> f64 {
    ((point - origin).norm() / detection_distance).clamp(0.0, 1.0)
}

/// Owns one drawable handle per lattice cell, stored in a ragged arena that mirrors the shape of
/// the lattice. Handles are created the first time their cell is rendered and then reused for
/// every later cycle.
#[derive(Debug, Clone)]
pub struct QuadRenderer<H> {
    handles: Vec<Vec<H>>,
}

impl<H> Default for QuadRenderer<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> QuadRenderer<H> {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    pub fn handle(&self, row: usize, column: usize) -> Option<&H> {
        self.handles.get(row).and_then(|r| r.get(column))
    }

    /// The total number of drawables created so far
    pub fn drawable_count(&self) -> usize {
        self.handles.iter().map(|r| r.len()).sum()
    }

    pub fn handles(&self) -> impl Iterator<Item = ((usize, usize), &H)> {
        self.handles
            .iter()
            .enumerate()
            .flat_map(|(r, hs)| hs.iter().enumerate().map(move |(c, h)| ((r, c), h)))
    }

    /// Give every handle back to the host, leaving the renderer empty
    pub fn release_all<D>(&mut self, host: &mut D)
    where
        D: DrawableHost<Handle = H>,
    {
        for handle in self.handles.drain(..).flatten() {
            host.release_drawable(handle);
        }
    }

    /// Draw every cell of the lattice, creating drawables for any cells which don't have one yet.
    /// Returns the number of drawables created.
    ///
    /// # Arguments
    ///
    /// * `lattice`: the sampled lattice, with world space hit points
    /// * `palette`: the gradient used to color each quad by its normalized range
    /// * `config`: supplies the quad size, line thickness, and detection distance
    /// * `pose`: the sensor pose; the quads take its orientation and ranges are measured from its
    ///   position
    /// * `parent`: the name of the owner the drawables are parented to
    /// * `host`: the renderer collaborator
    ///
    /// returns: usize
    pub fn render<D>(
        &mut self,
        lattice: &SampleLattice,
        palette: &Palette,
        config: &SensorConfig,
        pose: &Iso3,
        parent: &str,
        host: &mut D,
    ) -> usize
    where
        D: DrawableHost<Handle = H>,
    {
        let origin = Point3::from(pose.translation.vector);
        let mut created = 0;

        for ((row, column), cell) in lattice.iter() {
            if self.handles.len() <= row {
                self.handles.resize_with(row + 1, Vec::new);
            }

            let row_handles = &mut self.handles[row];
            while row_handles.len() <= column {
                let name = format!("quad {} {}", row, row_handles.len());
                row_handles.push(host.create_drawable(parent, &name));
                created += 1;
            }

            let range = normalized_range(&origin, &cell.hit_point, config.detection_distance);
            let color = palette.color_for(range);
            let points = quad_corners(&pose.rotation, &cell.hit_point, config.square_size);
            host.update_drawable(&row_handles[column], &points, config.line_thickness, color);
        }

        if created > 0 {
            debug!("Created {} drawables for {}", created, parent);
        }

        created
    }
}
