//! Grid coordinates and the canonical 9x9 matrix.
//!
//! # Responsibility
//! - Define typed `(block, cell)` coordinates and the cell roles they imply.
//! - Encode the mirror rule between the center block and surrounding blocks.
//! - Define the serialized grid shape (9 sequences of 9 strings).
//!
//! # Invariants
//! - Coordinates are always inside `[0,8] x [0,8]`; constructing one outside
//!   that range is a caller defect and panics.
//! - `CellPos::mirror` is the only place the mirror rule is written down.
//! - Every grid cell is present; empty string means "no content".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of blocks in the grid and cells in every block.
pub const GRID_SIZE: usize = 9;
/// Index of the center block, and of the center cell inside every block.
pub const CENTER: usize = 4;

/// Untrusted coordinate input outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateError {
    pub block: usize,
    pub cell: usize,
}

impl Display for CoordinateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cell coordinate ({}, {}) is outside the 9x9 grid",
            self.block, self.cell
        )
    }
}

impl Error for CoordinateError {}

/// Compass direction of a surrounding block (or of an overview slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Direction {
    /// Surrounding directions in block-index order (0,1,2,3,5,6,7,8).
    pub const ALL: [Direction; 8] = [
        Direction::TopLeft,
        Direction::Top,
        Direction::TopRight,
        Direction::Left,
        Direction::Right,
        Direction::BottomLeft,
        Direction::Bottom,
        Direction::BottomRight,
    ];

    /// Maps a block (or cell) index to its direction; `None` for the center.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::TopLeft),
            1 => Some(Self::Top),
            2 => Some(Self::TopRight),
            3 => Some(Self::Left),
            5 => Some(Self::Right),
            6 => Some(Self::BottomLeft),
            7 => Some(Self::Bottom),
            8 => Some(Self::BottomRight),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::Top => 1,
            Self::TopRight => 2,
            Self::Left => 3,
            Self::Right => 5,
            Self::BottomLeft => 6,
            Self::Bottom => 7,
            Self::BottomRight => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TopLeft => "Top-Left",
            Self::Top => "Top",
            Self::TopRight => "Top-Right",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::BottomLeft => "Bottom-Left",
            Self::Bottom => "Bottom",
            Self::BottomRight => "Bottom-Right",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Semantic role of one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// `(4,4)`: the single core goal.
    CoreGoal,
    /// `(4,d)`: overview slot for sub-goal `d` inside the center block.
    Overview(Direction),
    /// `(d,4)`: theme cell of surrounding block `d`.
    Theme(Direction),
    /// `(b,c)` with neither index at the center: an action item.
    Action,
}

/// Typed `(block, cell)` coordinate inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPos {
    block: usize,
    cell: usize,
}

impl CellPos {
    /// The core goal coordinate `(4,4)`.
    pub const CORE_GOAL: CellPos = CellPos {
        block: CENTER,
        cell: CENTER,
    };

    /// Builds a coordinate from trusted indices.
    ///
    /// # Panics
    /// Panics when either index is outside `[0,8]`. Correctly wired views
    /// never produce such coordinates.
    pub fn new(block: usize, cell: usize) -> Self {
        match Self::try_new(block, cell) {
            Ok(pos) => pos,
            Err(err) => panic!("{err}"),
        }
    }

    /// Builds a coordinate from untrusted input (command line, files).
    pub fn try_new(block: usize, cell: usize) -> Result<Self, CoordinateError> {
        if block >= GRID_SIZE || cell >= GRID_SIZE {
            return Err(CoordinateError { block, cell });
        }
        Ok(Self { block, cell })
    }

    pub fn block(self) -> usize {
        self.block
    }

    pub fn cell(self) -> usize {
        self.cell
    }

    /// Returns the linked coordinate that must always hold the same value.
    ///
    /// - `(4,c)` with `c != 4` mirrors to `(c,4)`.
    /// - `(b,4)` with `b != 4` mirrors to `(4,b)`.
    /// - The core goal and action cells have no mirror.
    ///
    /// A mirror target always mirrors back to its source, so applying the
    /// rule once per edit reaches a fixed point.
    pub fn mirror(self) -> Option<CellPos> {
        match (self.block, self.cell) {
            (CENTER, CENTER) => None,
            (CENTER, cell) => Some(CellPos {
                block: cell,
                cell: CENTER,
            }),
            (block, CENTER) => Some(CellPos {
                block: CENTER,
                cell: block,
            }),
            _ => None,
        }
    }

    pub fn role(self) -> CellRole {
        match (self.block, self.cell) {
            (CENTER, CENTER) => CellRole::CoreGoal,
            (CENTER, cell) => Direction::from_index(cell).map_or(CellRole::Action, CellRole::Overview),
            (block, CENTER) => Direction::from_index(block).map_or(CellRole::Action, CellRole::Theme),
            _ => CellRole::Action,
        }
    }

    /// Placeholder text shown by the grid view while the cell is empty.
    pub fn placeholder(self) -> &'static str {
        match self.role() {
            CellRole::CoreGoal => "CORE GOAL",
            CellRole::Overview(_) | CellRole::Theme(_) => "Sub Goal",
            CellRole::Action => "",
        }
    }

    /// Iterates every coordinate in block-major order.
    pub fn all() -> impl Iterator<Item = CellPos> {
        (0..GRID_SIZE).flat_map(|block| (0..GRID_SIZE).map(move |cell| CellPos { block, cell }))
    }
}

impl Display for CellPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.block, self.cell)
    }
}

/// The canonical 9x9 matrix of cell text.
///
/// Serialized as a 9-element sequence of 9-element sequences of strings.
/// Deserialization rejects any other shape and `null` elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [[String; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Builds a grid by evaluating `value` for every coordinate.
    pub fn from_fn(mut value: impl FnMut(CellPos) -> String) -> Self {
        Self {
            cells: std::array::from_fn(|block| {
                std::array::from_fn(|cell| value(CellPos { block, cell }))
            }),
        }
    }

    pub fn get(&self, pos: CellPos) -> &str {
        &self.cells[pos.block][pos.cell]
    }

    pub fn set(&mut self, pos: CellPos, value: impl Into<String>) {
        self.cells[pos.block][pos.cell] = value.into();
    }

    /// Returns the nine cells of one block.
    pub fn block(&self, block: usize) -> &[String; GRID_SIZE] {
        &self.cells[block]
    }

    /// Returns whether every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(String::is_empty)
    }

    /// Lists directions whose overview slot and theme cell disagree.
    pub fn mirror_violations(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| {
                let index = direction.index();
                self.cells[CENTER][index] != self.cells[index][CENTER]
            })
            .collect()
    }

    /// Restores the mirror invariant by copying each theme cell `(d,4)` onto
    /// its overview slot `(4,d)`. Returns the directions that were changed.
    pub fn repair_mirrors(&mut self) -> Vec<Direction> {
        let violations = self.mirror_violations();
        for direction in &violations {
            let index = direction.index();
            self.cells[CENTER][index] = self.cells[index][CENTER].clone();
        }
        violations
    }
}
