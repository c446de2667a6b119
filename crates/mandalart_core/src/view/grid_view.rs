//! Spatial grid view.
//!
//! # Responsibility
//! - Hold one bound text area per coordinate, addressed structurally by
//!   `[block][cell]`.
//! - Patch a single text area in place without touching the others.
//!
//! # Invariants
//! - While unmounted there are no elements and every patch is a no-op.
//! - Every coordinate has exactly one element while mounted.

use crate::model::grid::{CellPos, Grid, GRID_SIZE};
use crate::sync::view::{EditEvent, EditSink, PatchOutcome, ViewAdapter, ViewKind};
use crate::view::sheet::{render_sheet, shown, DEFAULT_CELL_WIDTH};

/// One editable cell of the grid view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArea {
    pub value: String,
    pub placeholder: &'static str,
}

type Blocks = [[TextArea; GRID_SIZE]; GRID_SIZE];

/// Headless 9x9 grid presentation.
#[derive(Debug, Default)]
pub struct GridView {
    blocks: Option<Box<Blocks>>,
    sink: Option<EditSink>,
    effective_patches: usize,
}

impl GridView {
    /// Creates an unmounted view with no edit source.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, pos: CellPos) -> Option<&TextArea> {
        self.blocks
            .as_ref()
            .map(|blocks| &blocks[pos.block()][pos.cell()])
    }

    /// Number of patches that changed a displayed value.
    pub fn effective_patches(&self) -> usize {
        self.effective_patches
    }

    fn element_mut(&mut self, pos: CellPos) -> Option<&mut TextArea> {
        self.blocks
            .as_mut()
            .map(|blocks| &mut blocks[pos.block()][pos.cell()])
    }
}

impl ViewAdapter for GridView {
    fn kind(&self) -> ViewKind {
        ViewKind::Grid
    }

    fn is_mounted(&self) -> bool {
        self.blocks.is_some()
    }

    fn patch(&mut self, pos: CellPos, value: &str) -> PatchOutcome {
        let Some(element) = self.element_mut(pos) else {
            return PatchOutcome::Unmounted;
        };
        if element.value == value {
            return PatchOutcome::Unchanged;
        }
        element.value = value.to_string();
        self.effective_patches += 1;
        PatchOutcome::Applied
    }

    fn rebuild(&mut self, grid: &Grid) {
        self.blocks = Some(Box::new(std::array::from_fn(|block| {
            std::array::from_fn(|cell| {
                let pos = CellPos::new(block, cell);
                TextArea {
                    value: grid.get(pos).to_string(),
                    placeholder: pos.placeholder(),
                }
            })
        })));
    }

    fn unmount(&mut self) {
        self.blocks = None;
    }

    fn bind_edit_source(&mut self, sink: EditSink) {
        self.sink = Some(sink);
    }

    fn receive_input(&mut self, pos: CellPos, value: &str) -> bool {
        let Some(sink) = self.sink.clone() else {
            return false;
        };
        let Some(element) = self.element_mut(pos) else {
            return false;
        };
        element.value = value.to_string();
        sink.push(EditEvent {
            pos,
            value: value.to_string(),
            origin: ViewKind::Grid,
        });
        true
    }

    fn displayed(&self, pos: CellPos) -> Option<&str> {
        self.element(pos).map(|element| element.value.as_str())
    }

    fn render(&self) -> Option<String> {
        let blocks = self.blocks.as_ref()?;
        Some(render_sheet(DEFAULT_CELL_WIDTH, |pos| {
            let element = &blocks[pos.block()][pos.cell()];
            shown(&element.value, element.placeholder)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::GridView;
    use crate::model::grid::{CellPos, Grid};
    use crate::sync::view::{EditSink, PatchOutcome, ViewAdapter};

    #[test]
    fn rebuild_binds_placeholders_per_role() {
        let mut view = GridView::new();
        view.rebuild(&Grid::default());

        assert_eq!(view.element(CellPos::CORE_GOAL).unwrap().placeholder, "CORE GOAL");
        assert_eq!(view.element(CellPos::new(4, 0)).unwrap().placeholder, "Sub Goal");
        assert_eq!(view.element(CellPos::new(3, 4)).unwrap().placeholder, "Sub Goal");
        assert_eq!(view.element(CellPos::new(3, 3)).unwrap().placeholder, "");
    }

    #[test]
    fn input_without_bound_source_is_ignored() {
        let mut view = GridView::new();
        view.rebuild(&Grid::default());

        assert!(!view.receive_input(CellPos::new(0, 0), "x"));
        assert_eq!(view.displayed(CellPos::new(0, 0)), Some(""));

        let sink = EditSink::new();
        view.bind_edit_source(sink.clone());
        assert!(view.receive_input(CellPos::new(0, 0), "x"));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn unmount_drops_elements() {
        let mut view = GridView::new();
        view.rebuild(&Grid::default());
        view.unmount();

        assert!(!view.is_mounted());
        assert_eq!(view.patch(CellPos::CORE_GOAL, "x"), PatchOutcome::Unmounted);
        assert!(view.render().is_none());
    }
}
