//! View adapter contract and the shared edit source.
//!
//! # Responsibility
//! - Define what the propagator may ask of a presentation: patch one
//!   coordinate, or rebuild from the canonical grid.
//! - Carry raw user edits from views to the board without re-entering
//!   propagation.
//!
//! # Invariants
//! - `patch` on an unmounted view or a coordinate with no bound element is a
//!   silent no-op.
//! - `patch` with the value already displayed is a no-op.
//! - Views queue edits on the `EditSink`; they never call the propagator.

use crate::model::grid::{CellPos, Grid};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::str::FromStr;

/// Presentation style of a view adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewKind {
    /// Spatial 3x3 arrangement of 3x3 blocks.
    Grid,
    /// Flattened core goal / sub goal / action item outline.
    List,
}

impl ViewKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }
}

impl Display for ViewKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            other => Err(format!("unknown view `{other}`; expected grid|list")),
        }
    }
}

/// Result of one `patch` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The bound element was overwritten.
    Applied,
    /// The bound element already displayed the value.
    Unchanged,
    /// The view is not mounted or has no element for the coordinate.
    Unmounted,
}

/// One raw edit reported by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub pos: CellPos,
    pub value: String,
    pub origin: ViewKind,
}

/// FIFO of raw edits shared by every view and drained by the board.
///
/// Clones share one queue. Single-threaded by construction: edits are
/// produced and drained on the interaction thread.
#[derive(Debug, Clone, Default)]
pub struct EditSink {
    queue: Rc<RefCell<VecDeque<EditEvent>>>,
}

impl EditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: EditEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    /// Takes the oldest pending edit.
    pub fn pop(&self) -> Option<EditEvent> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// Live presentation of the grid.
pub trait ViewAdapter {
    fn kind(&self) -> ViewKind;

    fn is_mounted(&self) -> bool;

    /// Updates the element bound to `pos` in place.
    fn patch(&mut self, pos: CellPos, value: &str) -> PatchOutcome;

    /// Reconstructs (and mounts) the presentation from `grid`.
    fn rebuild(&mut self, grid: &Grid);

    /// Drops the presentation; later patches are no-ops until `rebuild`.
    fn unmount(&mut self);

    /// Wires every interactive element to report edits on `sink`.
    fn bind_edit_source(&mut self, sink: EditSink);

    /// A user changed the element bound to `pos` to `value`.
    ///
    /// The element takes the value and the edit is queued on the bound sink.
    /// Returns `false` (and changes nothing) when no element is bound to
    /// `pos`, the view is unmounted, or no sink is bound.
    fn receive_input(&mut self, pos: CellPos, value: &str) -> bool;

    /// Value currently displayed for `pos`, if an element is bound to it.
    fn displayed(&self, pos: CellPos) -> Option<&str>;

    /// Plain-text rendering of the current presentation.
    fn render(&self) -> Option<String>;
}
