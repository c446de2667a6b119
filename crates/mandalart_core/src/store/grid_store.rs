//! Grid store.
//!
//! # Responsibility
//! - Own the canonical 9x9 matrix for the lifetime of one session.
//! - Provide single-coordinate reads/writes, full reset and snapshots.
//!
//! # Invariants
//! - `set` writes exactly one coordinate and never applies the mirror rule;
//!   the edit propagator is the single owner of that rule.
//! - Snapshots are detached copies; later writes never alter them.

use crate::model::grid::{CellPos, Grid};

/// Exclusive owner of the canonical grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridStore {
    grid: Grid,
}

impl GridStore {
    /// Creates a store holding an all-empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from a previously persisted grid.
    pub fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn get(&self, pos: CellPos) -> &str {
        self.grid.get(pos)
    }

    /// Reads by raw indices.
    ///
    /// # Panics
    /// Panics when either index is outside `[0,8]`.
    pub fn get_at(&self, block: usize, cell: usize) -> &str {
        self.grid.get(CellPos::new(block, cell))
    }

    pub fn set(&mut self, pos: CellPos, value: impl Into<String>) {
        self.grid.set(pos, value);
    }

    /// Clears every coordinate to the empty string.
    pub fn reset_all(&mut self) {
        self.grid = Grid::default();
    }

    /// Returns a detached copy for persistence or export.
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    /// Borrows the live grid (view rebuilds read through this).
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
