//! Flattened outline view.
//!
//! # Responsibility
//! - Present the core goal, then one group per surrounding block: a header
//!   input for the sub goal and eight numbered action inputs.
//! - Index bound inputs by coordinate for in-place patches.
//!
//! # Invariants
//! - The overview slots `(4,d)` have no input here; their value is shown
//!   through the header bound to `(d,4)`, so patches for `(4,d)` are no-ops.
//! - Group order is core goal, then blocks 0,1,2,3,5,6,7,8.

use crate::model::grid::{CellPos, Direction, Grid, CENTER, GRID_SIZE};
use crate::sync::view::{EditEvent, EditSink, PatchOutcome, ViewAdapter, ViewKind};
use crate::view::sheet::shown;
use std::collections::BTreeMap;

const CORE_GOAL_HEADING: &str = "Core Goal";
const CORE_GOAL_PLACEHOLDER: &str = "Enter Core Goal";
const ACTION_PLACEHOLDER: &str = "Action Item";

/// One bound input of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListField {
    /// Row label; action items are numbered `1..=9` by cell index.
    pub label: Option<String>,
    pub placeholder: String,
    pub value: String,
}

/// One section of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListGroup {
    pub heading: Option<&'static str>,
    pub header: CellPos,
    pub items: Vec<CellPos>,
}

#[derive(Debug)]
struct ListLayout {
    groups: Vec<ListGroup>,
    fields: BTreeMap<CellPos, ListField>,
}

/// Headless outline presentation.
#[derive(Debug, Default)]
pub struct ListView {
    layout: Option<ListLayout>,
    sink: Option<EditSink>,
    effective_patches: usize,
}

impl ListView {
    /// Creates an unmounted view with no edit source.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[ListGroup] {
        match &self.layout {
            Some(layout) => &layout.groups,
            None => &[],
        }
    }

    pub fn field(&self, pos: CellPos) -> Option<&ListField> {
        self.layout.as_ref()?.fields.get(&pos)
    }

    /// Number of patches that changed a displayed value.
    pub fn effective_patches(&self) -> usize {
        self.effective_patches
    }

    fn field_mut(&mut self, pos: CellPos) -> Option<&mut ListField> {
        self.layout.as_mut()?.fields.get_mut(&pos)
    }
}

impl ViewAdapter for ListView {
    fn kind(&self) -> ViewKind {
        ViewKind::List
    }

    fn is_mounted(&self) -> bool {
        self.layout.is_some()
    }

    fn patch(&mut self, pos: CellPos, value: &str) -> PatchOutcome {
        let Some(field) = self.field_mut(pos) else {
            return PatchOutcome::Unmounted;
        };
        if field.value == value {
            return PatchOutcome::Unchanged;
        }
        field.value = value.to_string();
        self.effective_patches += 1;
        PatchOutcome::Applied
    }

    fn rebuild(&mut self, grid: &Grid) {
        self.layout = Some(build_layout(grid));
    }

    fn unmount(&mut self) {
        self.layout = None;
    }

    fn bind_edit_source(&mut self, sink: EditSink) {
        self.sink = Some(sink);
    }

    fn receive_input(&mut self, pos: CellPos, value: &str) -> bool {
        let Some(sink) = self.sink.clone() else {
            return false;
        };
        let Some(field) = self.field_mut(pos) else {
            return false;
        };
        field.value = value.to_string();
        sink.push(EditEvent {
            pos,
            value: value.to_string(),
            origin: ViewKind::List,
        });
        true
    }

    fn displayed(&self, pos: CellPos) -> Option<&str> {
        self.field(pos).map(|field| field.value.as_str())
    }

    fn render(&self) -> Option<String> {
        let layout = self.layout.as_ref()?;
        let mut out = String::new();
        for group in &layout.groups {
            if !out.is_empty() {
                out.push('\n');
            }
            if let Some(heading) = group.heading {
                out.push_str(heading);
                out.push('\n');
            }
            if let Some(header) = layout.fields.get(&group.header) {
                out.push_str(&format!("# {}\n", shown(&header.value, &header.placeholder)));
            }
            for item in &group.items {
                if let Some(field) = layout.fields.get(item) {
                    out.push_str(&format!(
                        "  {}. {}\n",
                        field.label.as_deref().unwrap_or_default(),
                        shown(&field.value, &field.placeholder)
                    ));
                }
            }
        }
        Some(out)
    }
}

fn build_layout(grid: &Grid) -> ListLayout {
    let mut groups = Vec::with_capacity(GRID_SIZE);
    let mut fields = BTreeMap::new();

    fields.insert(
        CellPos::CORE_GOAL,
        ListField {
            label: None,
            placeholder: CORE_GOAL_PLACEHOLDER.to_string(),
            value: grid.get(CellPos::CORE_GOAL).to_string(),
        },
    );
    groups.push(ListGroup {
        heading: Some(CORE_GOAL_HEADING),
        header: CellPos::CORE_GOAL,
        items: Vec::new(),
    });

    for direction in Direction::ALL {
        let block = direction.index();
        // Sub goal title is read from the block's own center cell.
        let header = CellPos::new(block, CENTER);
        fields.insert(
            header,
            ListField {
                label: None,
                placeholder: format!("Sub Goal {direction}"),
                value: grid.get(header).to_string(),
            },
        );

        let items = Direction::ALL
            .iter()
            .map(|slot| CellPos::new(block, slot.index()))
            .collect::<Vec<_>>();
        for item in &items {
            fields.insert(
                *item,
                ListField {
                    label: Some((item.cell() + 1).to_string()),
                    placeholder: ACTION_PLACEHOLDER.to_string(),
                    value: grid.get(*item).to_string(),
                },
            );
        }

        groups.push(ListGroup {
            heading: None,
            header,
            items,
        });
    }

    ListLayout { groups, fields }
}
