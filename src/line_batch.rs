//! A CPU side drawable host which keeps every quad as a plain polyline record. It can be handed to
//! any line renderer, or inspected directly.

use crate::Point3;
use crate::palette::Color;
use crate::quad::DrawableHost;
use itertools::Itertools;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolylineId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub parent: String,
    pub name: String,
    pub points: Vec<Point3>,
    pub width: f64,
    pub color: Color,
}

/// Polylines are kept in slots so that ids stay valid after other polylines are released.
#[derive(Debug, Clone, Default)]
pub struct LineBatch {
    slots: Vec<Option<Polyline>>,
}

impl LineBatch {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Iterate over the live polylines in creation order
    pub fn polylines(&self) -> impl Iterator<Item = (PolylineId, &Polyline)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (PolylineId(i), p)))
    }

    pub fn get(&self, id: PolylineId) -> Option<&Polyline> {
        self.slots.get(id.0).and_then(|p| p.as_ref())
    }

    /// The number of live polylines
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Break every polyline into its connected segments, each with the color of its polyline
    pub fn segments(&self) -> impl Iterator<Item = (Point3, Point3, Color)> {
        self.polylines().flat_map(|(_, p)| {
            p.points
                .iter()
                .tuple_windows()
                .map(move |(a, b)| (*a, *b, p.color))
        })
    }
}

impl DrawableHost for LineBatch {
    type Handle = PolylineId;

    fn create_drawable(&mut self, parent: &str, name: &str) -> PolylineId {
        self.slots.push(Some(Polyline {
            parent: parent.to_string(),
            name: name.to_string(),
            points: Vec::new(),
            width: 0.0,
            color: Color::default(),
        }));
        PolylineId(self.slots.len() - 1)
    }

    fn update_drawable(
        &mut self,
        handle: &PolylineId,
        points: &[Point3; 8],
        width: f64,
        color: Color,
    ) {
        if let Some(Some(polyline)) = self.slots.get_mut(handle.0) {
            polyline.points.clear();
            polyline.points.extend_from_slice(points);
            polyline.width = width;
            polyline.color = color;
        }
    }

    fn release_drawable(&mut self, handle: PolylineId) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            *slot = None;
        }
    }
}
