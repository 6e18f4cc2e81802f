//! This module contains the growable 2D lattice of samples shared by the stages of the projection
//! pipeline. The lattice is indexed by (row, column), where rows follow the vertical angular steps
//! and columns follow the horizontal angular steps.
//!
//! Cells are only ever appended. When the field of view or the angular intervals change so that
//! more samples are needed, new rows and columns are added to the end of the lattice and all of
//! the existing cells keep their place, which is what lets the renderer keep one drawable per
//! cell for the lifetime of the sensor.

use crate::{Point3, UnitVec3, Vector3};
use log::debug;

/// A single sample of the lattice. The direction is in the sensor's local frame, the hit point is
/// in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatticeCell {
    pub direction: UnitVec3,
    pub hit_point: Point3,
}

impl Default for LatticeCell {
    fn default() -> Self {
        Self {
            direction: Vector3::z_axis(),
            hit_point: Point3::origin(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SampleLattice {
    rows: Vec<Vec<LatticeCell>>,
}

impl SampleLattice {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// The number of rows in the lattice
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// The length of the longest row in the lattice. Rows are grown independently, so a row
    /// which was last visited while the field of view was narrower may be shorter than this.
    pub fn columns(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, |r| r.len())
    }

    /// The total number of cells in the lattice
    pub fn len(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&LatticeCell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    pub fn get_mut(&mut self, row: usize, column: usize) -> Option<&mut LatticeCell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(column))
    }

    /// Returns a mutable reference to the cell at (row, column), appending rows and cells as
    /// needed so that it exists. Nothing already in the lattice is moved or removed.
    pub fn ensure_cell(&mut self, row: usize, column: usize) -> &mut LatticeCell {
        if self.rows.len() <= row {
            debug!("Lattice growing to {} rows", row + 1);
            self.rows.resize_with(row + 1, Vec::new);
        }

        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize_with(column + 1, LatticeCell::default);
        }

        &mut cells[column]
    }

    /// Iterate over every cell in row-major order along with its (row, column) index
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &LatticeCell)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, cells)| cells.iter().enumerate().map(move |(c, cell)| ((r, c), cell)))
    }

    /// Iterate mutably over every cell in row-major order along with its (row, column) index
    pub fn iter_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut LatticeCell)> {
        self.rows.iter_mut().enumerate().flat_map(|(r, cells)| {
            cells
                .iter_mut()
                .enumerate()
                .map(move |(c, cell)| ((r, c), cell))
        })
    }
}
