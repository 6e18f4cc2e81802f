//! This module has the LIDAR projection sensor, which sweeps a rectangular grid of rays from a
//! single pose, records how far each ray got, and draws a range-colored quad at every sample.
//!
//! The sensor owns all of the state the pipeline needs between frames: the configuration, the
//! sample lattice, the gradient palette, and the drawable handles. Each call to `update` runs the
//! whole pipeline (grid generation, range sampling, quad rendering) to completion.

use crate::config::SensorConfig;
use crate::errors::InvalidConfig;
use crate::grid::generate_directions;
use crate::lattice::SampleLattice;
use crate::palette::Palette;
use crate::quad::{DrawableHost, QuadRenderer, normalized_range};
use crate::sampler::{RayCaster, SampleStats, sample_ranges};
use crate::sensors::SimulatedPointSensor;
use crate::{Iso3, Point3};
use log::{debug, warn};

/// A summary of a single update cycle
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Rows in the current field of view
    pub rows: usize,

    /// Columns in the current field of view
    pub columns: usize,

    /// Cells sampled and drawn, which includes cells left over from a wider field of view
    pub cells: usize,

    pub hits: usize,
    pub misses: usize,

    /// Drawables created during this cycle
    pub created: usize,
}

#[derive(Debug, Clone)]
pub struct LidarProjector<H> {
    name: String,
    config: SensorConfig,
    active: SensorConfig,
    lattice: SampleLattice,
    palette: Palette,
    renderer: QuadRenderer<H>,
    extent: (usize, usize),
    cycles: u64,
}

fn sanitize(name: &str, config: &SensorConfig) -> SensorConfig {
    let active = config.sanitized();
    if let Err(e) = config.validate() {
        warn!("Sensor {} has an invalid configuration ({}), running with clamped values", name, e);
    }
    active
}

impl<H> LidarProjector<H> {
    /// Create a new sensor. A configuration which fails validation is accepted, but the sensor
    /// runs on a sanitized copy of it so that the pipeline never divides by zero or indexes
    /// outside of the palette. Use `try_new` to reject invalid configurations instead.
    ///
    /// # Arguments
    ///
    /// * `name`: the sensor name, which the drawables are parented to
    /// * `config`: the initial configuration
    ///
    /// returns: LidarProjector<H>
    pub fn new(name: &str, config: SensorConfig) -> Self {
        let active = sanitize(name, &config);
        let palette = Palette::new(active.gradient_steps, &active.base_color);

        Self {
            name: name.to_string(),
            config,
            active,
            lattice: SampleLattice::new(),
            palette,
            renderer: QuadRenderer::new(),
            extent: (0, 0),
            cycles: 0,
        }
    }

    /// Create a new sensor, rejecting a configuration which fails validation
    pub fn try_new(name: &str, config: SensorConfig) -> Result<Self, InvalidConfig> {
        config.validate()?;
        Ok(Self::new(name, config))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration as it was last set
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// The sanitized configuration the pipeline actually runs with
    pub fn active_config(&self) -> &SensorConfig {
        &self.active
    }

    /// Replace the configuration. The change takes effect on the next cycle; the lattice grows
    /// if the new field of view needs more samples but never shrinks. The palette is only rebuilt
    /// if its step count or base color changed.
    pub fn set_config(&mut self, config: SensorConfig) {
        let active = sanitize(&self.name, &config);
        if active.gradient_steps != self.active.gradient_steps
            || active.base_color != self.active.base_color
        {
            debug!("Rebuilding palette for {} with {} steps", self.name, active.gradient_steps);
            self.palette = Palette::new(active.gradient_steps, &active.base_color);
        }

        self.config = config;
        self.active = active;
    }

    /// Replace the configuration, rejecting it if it fails validation
    pub fn try_set_config(&mut self, config: SensorConfig) -> Result<(), InvalidConfig> {
        config.validate()?;
        self.set_config(config);
        Ok(())
    }

    pub fn lattice(&self) -> &SampleLattice {
        &self.lattice
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn renderer(&self) -> &QuadRenderer<H> {
        &self.renderer
    }

    /// The (rows, columns) of the field of view generated on the last cycle
    pub fn active_extent(&self) -> (usize, usize) {
        self.extent
    }

    /// The number of completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run the grid generation and range sampling stages without drawing anything. The lattice
    /// holds the new hit points afterwards.
    pub fn scan<C: RayCaster + ?Sized>(&mut self, pose: &Iso3, caster: &C) -> SampleStats {
        self.extent = generate_directions(&self.active, &mut self.lattice);
        sample_ranges(
            &mut self.lattice,
            caster,
            pose,
            self.active.detection_distance,
        )
    }

    /// Run one full cycle of the pipeline: generate the ray directions for the current
    /// configuration, sample the ranges from `pose`, and update one drawable per lattice cell,
    /// creating drawables for cells which are new this cycle.
    ///
    /// # Arguments
    ///
    /// * `pose`: the world position and orientation of the sensor for this cycle
    /// * `caster`: the ray intersection query
    /// * `host`: the renderer which owns the drawables
    ///
    /// returns: CycleReport
    pub fn update<C, D>(&mut self, pose: &Iso3, caster: &C, host: &mut D) -> CycleReport
    where
        C: RayCaster + ?Sized,
        D: DrawableHost<Handle = H>,
    {
        let stats = self.scan(pose, caster);
        let created = self.renderer.render(
            &self.lattice,
            &self.palette,
            &self.active,
            pose,
            &self.name,
            host,
        );
        self.cycles += 1;

        let report = CycleReport {
            rows: self.extent.0,
            columns: self.extent.1,
            cells: self.lattice.len(),
            hits: stats.hits,
            misses: stats.misses,
            created,
        };
        debug!("{} cycle {}: {:?}", self.name, self.cycles, report);
        report
    }

    /// Iterate over the world space hit point of every lattice cell from the last cycle
    pub fn hit_points(&self) -> impl Iterator<Item = ((usize, usize), Point3)> {
        self.lattice.iter().map(|(i, cell)| (i, cell.hit_point))
    }

    /// Iterate over the normalized range of every lattice cell from the last cycle, measured
    /// from the position of `pose`
    pub fn normalized_ranges(&self, pose: &Iso3) -> impl Iterator<Item = ((usize, usize), f64)> {
        let origin = Point3::from(pose.translation.vector);
        let distance = self.active.detection_distance;
        self.lattice
            .iter()
            .map(move |(i, cell)| (i, normalized_range(&origin, &cell.hit_point, distance)))
    }

    /// Tear the sensor down, releasing every drawable it created back to the host
    pub fn teardown<D>(mut self, host: &mut D)
    where
        D: DrawableHost<Handle = H>,
    {
        debug!("Releasing {} drawables for {}", self.renderer.drawable_count(), self.name);
        self.renderer.release_all(host);
    }
}

impl<H> SimulatedPointSensor for LidarProjector<H> {
    fn get_points(&mut self, scene: &dyn RayCaster, iso: &Iso3) -> (Vec<Point3>, Option<Vec<f64>>) {
        self.scan(iso, scene);
        let points = self.hit_points().map(|(_, p)| p).collect();
        let ranges = self.normalized_ranges(iso).map(|(_, r)| r).collect();
        (points, Some(ranges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_batch::{LineBatch, PolylineId};
    use crate::scene::ShapeScene;
    use crate::{UnitQuat, UnitVec3, Vector3};
    use approx::assert_relative_eq;

    fn never(_: &Point3, _: &UnitVec3, _: f64) -> Option<Point3> {
        None
    }

    fn wall_scene() -> ShapeScene {
        let mut scene = ShapeScene::new();
        scene.add_cuboid(Iso3::translation(0.0, 0.0, 51.0), [500.0, 500.0, 1.0]);
        scene
    }

    fn narrow() -> SensorConfig {
        SensorConfig {
            x_range: 20.0,
            y_range: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_cycle() {
        let mut sensor = LidarProjector::new("lidar", SensorConfig::default());
        let mut batch = LineBatch::new();

        let report = sensor.update(&Iso3::identity(), &wall_scene(), &mut batch);
        assert_eq!(report.rows, 11);
        assert_eq!(report.columns, 11);
        assert_eq!(report.cells, 121);
        assert_eq!(report.hits, 121);
        assert_eq!(report.created, 121);
        assert_eq!(batch.len(), 121);

        let report = sensor.update(&Iso3::identity(), &wall_scene(), &mut batch);
        assert_eq!(report.created, 0);
        assert_eq!(batch.len(), 121);
        assert_eq!(sensor.cycles(), 2);
    }

    #[test]
    fn test_forward_miss_point() {
        let mut sensor = LidarProjector::new("lidar", narrow());
        let mut batch = LineBatch::new();
        sensor.update(&Iso3::identity(), &never, &mut batch);

        // The angles are -10 and 0 on both axes, so cell (1, 1) looks straight ahead
        let hit = sensor.lattice().get(1, 1).unwrap().hit_point;
        assert_relative_eq!(hit, Point3::new(0.0, 0.0, 200.0), epsilon = 1.0e-10);

        let (_, range) = sensor
            .normalized_ranges(&Iso3::identity())
            .find(|(i, _)| *i == (1, 1))
            .unwrap();
        assert_relative_eq!(range, 1.0);

        // Misses are drawn in the far color, which is the second to last palette entry
        let handle = sensor.renderer().handle(1, 1).unwrap();
        let color = batch.get(*handle).unwrap().color;
        assert_eq!(color, sensor.palette().colors()[23]);
    }

    #[test]
    fn test_near_hit_color() {
        let mut sensor = LidarProjector::new("lidar", narrow());
        let mut batch = LineBatch::new();
        sensor.update(&Iso3::identity(), &wall_scene(), &mut batch);

        // The wall face is at z = 50, a quarter of the detection distance
        let handle = sensor.renderer().handle(1, 1).unwrap();
        let line = batch.get(*handle).unwrap();
        assert_eq!(line.color, sensor.palette().colors()[6]);
        assert_eq!(line.width, 0.05);
        assert_relative_eq!(line.points[0], Point3::new(-0.25, -0.25, 50.0), epsilon = 1.0e-10);
    }

    #[test]
    fn test_growing_view_keeps_handles() {
        let mut sensor = LidarProjector::new("lidar", narrow());
        let mut batch = LineBatch::new();
        sensor.update(&Iso3::identity(), &never, &mut batch);

        let before = sensor
            .renderer()
            .handles()
            .map(|(i, h)| (i, *h))
            .collect::<Vec<_>>();
        let columns = sensor.lattice().columns();

        sensor.set_config(SensorConfig {
            x_range: 40.0,
            ..narrow()
        });
        let report = sensor.update(&Iso3::identity(), &never, &mut batch);

        assert!(sensor.lattice().columns() > columns);
        assert_eq!(report.columns, 4);
        assert_eq!(report.created, 4);
        for ((r, c), h) in before {
            assert_eq!(sensor.renderer().handle(r, c), Some(&h));
        }
    }

    #[test]
    fn test_shrinking_view_keeps_lattice() {
        let mut sensor = LidarProjector::new("lidar", SensorConfig::default());
        let mut batch = LineBatch::new();
        sensor.update(&Iso3::identity(), &never, &mut batch);

        sensor.set_config(narrow());
        let report = sensor.update(&Iso3::identity(), &never, &mut batch);

        assert_eq!(sensor.active_extent(), (2, 2));
        assert_eq!(report.cells, 121);
        assert_eq!(report.created, 0);
        assert_eq!(sensor.lattice().rows(), 11);
    }

    #[test]
    fn test_quads_follow_orientation() {
        let mut sensor = LidarProjector::new("lidar", narrow());
        let mut batch = LineBatch::new();
        let pose = Iso3::from_parts(
            Vector3::new(0.0, 0.0, 0.0).into(),
            UnitQuat::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2),
        );
        sensor.update(&pose, &never, &mut batch);

        let hit = sensor.lattice().get(1, 1).unwrap().hit_point;
        assert_relative_eq!(hit, Point3::new(200.0, 0.0, 0.0), epsilon = 1.0e-10);

        let handle = sensor.renderer().handle(1, 1).unwrap();
        let line = batch.get(*handle).unwrap();
        assert!(line.points.iter().all(|p| (p.x - 200.0).abs() < 1.0e-10));
    }

    #[test]
    fn test_invalid_config() {
        let config = SensorConfig {
            detection_distance: 0.0,
            gradient_steps: 0,
            ..Default::default()
        };
        assert!(LidarProjector::<PolylineId>::try_new("lidar", config.clone()).is_err());

        // Accepted by `new`, but the pipeline runs clamped
        let mut sensor = LidarProjector::new("lidar", config);
        let mut batch = LineBatch::new();
        let report = sensor.update(&Iso3::identity(), &never, &mut batch);
        assert_eq!(report.cells, 121);
        assert_eq!(sensor.palette().len(), 1);
        assert_eq!(sensor.active_config().detection_distance, 200.0);
        assert_eq!(sensor.config().detection_distance, 0.0);
    }

    #[test]
    fn test_try_set_config_rejects() {
        let mut sensor = LidarProjector::<PolylineId>::new("lidar", narrow());
        let bad = SensorConfig {
            x_interval: 0.0,
            ..narrow()
        };
        assert!(sensor.try_set_config(bad).is_err());
        assert_eq!(sensor.config(), &narrow());
    }

    #[test]
    fn test_palette_rebuilt_on_steps_change() {
        let mut sensor = LidarProjector::<PolylineId>::new("lidar", narrow());
        assert_eq!(sensor.palette().len(), 25);

        sensor.set_config(SensorConfig {
            gradient_steps: 5,
            ..narrow()
        });
        assert_eq!(sensor.palette().len(), 5);
    }

    #[test]
    fn test_get_points() {
        let mut sensor = LidarProjector::<PolylineId>::new("lidar", narrow());
        let (points, ranges) = sensor.get_points(&wall_scene(), &Iso3::identity());
        let ranges = ranges.unwrap();

        assert_eq!(points.len(), 4);
        assert_eq!(ranges.len(), 4);
        assert!(points.iter().all(|p| (p.z - 50.0).abs() < 1.0e-9));
        assert!(ranges.iter().all(|r| *r > 0.2499 && *r < 0.27));
    }

    #[test]
    fn test_teardown_releases_drawables() {
        let mut batch = LineBatch::new();
        let other = batch.create_drawable("other", "keep");

        let mut sensor = LidarProjector::new("lidar", narrow());
        sensor.update(&Iso3::identity(), &never, &mut batch);
        assert_eq!(batch.len(), 5);

        sensor.teardown(&mut batch);
        assert_eq!(batch.len(), 1);
        assert!(batch.get(other).is_some());
    }
}
