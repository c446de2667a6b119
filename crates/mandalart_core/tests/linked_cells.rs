use mandalart_core::{
    CellPos, EditPropagator, EditSink, Grid, GridStore, KvRepository, MemoryKvRepository,
    PatchOutcome, PersistenceGateway, ViewAdapter, ViewKind, ViewRegistryError, Warning,
    GRID_RECORD_KEY,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

type PatchLog = Rc<RefCell<Vec<(CellPos, String)>>>;

/// Fake view that records every patch call and keeps its own copy of values.
struct RecordingView {
    kind: ViewKind,
    values: Option<BTreeMap<CellPos, String>>,
    patches: PatchLog,
    rebuilds: Rc<RefCell<usize>>,
}

impl RecordingView {
    fn new(kind: ViewKind) -> (Self, PatchLog, Rc<RefCell<usize>>) {
        let patches = PatchLog::default();
        let rebuilds = Rc::new(RefCell::new(0));
        let view = Self {
            kind,
            values: None,
            patches: patches.clone(),
            rebuilds: rebuilds.clone(),
        };
        (view, patches, rebuilds)
    }
}

impl ViewAdapter for RecordingView {
    fn kind(&self) -> ViewKind {
        self.kind
    }

    fn is_mounted(&self) -> bool {
        self.values.is_some()
    }

    fn patch(&mut self, pos: CellPos, value: &str) -> PatchOutcome {
        self.patches.borrow_mut().push((pos, value.to_string()));
        let Some(values) = self.values.as_mut() else {
            return PatchOutcome::Unmounted;
        };
        if values.get(&pos).map(String::as_str) == Some(value) {
            return PatchOutcome::Unchanged;
        }
        values.insert(pos, value.to_string());
        PatchOutcome::Applied
    }

    fn rebuild(&mut self, grid: &Grid) {
        *self.rebuilds.borrow_mut() += 1;
        self.values = Some(
            CellPos::all()
                .map(|pos| (pos, grid.get(pos).to_string()))
                .collect(),
        );
    }

    fn unmount(&mut self) {
        self.values = None;
    }

    fn bind_edit_source(&mut self, _sink: EditSink) {}

    fn receive_input(&mut self, _pos: CellPos, _value: &str) -> bool {
        false
    }

    fn displayed(&self, pos: CellPos) -> Option<&str> {
        self.values.as_ref()?.get(&pos).map(String::as_str)
    }

    fn render(&self) -> Option<String> {
        None
    }
}

struct Harness {
    propagator: EditPropagator<MemoryKvRepository>,
    repo: MemoryKvRepository,
    patches: PatchLog,
    rebuilds: Rc<RefCell<usize>>,
}

fn setup() -> Harness {
    let repo = MemoryKvRepository::new();
    let mut propagator =
        EditPropagator::new(GridStore::new(), PersistenceGateway::new(repo.clone()));
    let (view, patches, rebuilds) = RecordingView::new(ViewKind::Grid);
    propagator.register_view(Box::new(view)).unwrap();
    propagator.rebuild_all();
    Harness {
        propagator,
        repo,
        patches,
        rebuilds,
    }
}

fn assert_mirror_invariant(grid: &Grid) {
    assert!(
        grid.mirror_violations().is_empty(),
        "diverged directions: {:?}",
        grid.mirror_violations()
    );
}

#[test]
fn editing_overview_slot_updates_theme_cell() {
    let mut h = setup();
    let outcome = h.propagator.apply_edit(CellPos::new(4, 2), "Health");

    assert_eq!(
        outcome.written_positions(),
        vec![CellPos::new(4, 2), CellPos::new(2, 4)]
    );
    assert_eq!(h.propagator.grid().get(CellPos::new(4, 2)), "Health");
    assert_eq!(h.propagator.grid().get(CellPos::new(2, 4)), "Health");
    assert_eq!(
        *h.patches.borrow(),
        vec![
            (CellPos::new(4, 2), "Health".to_string()),
            (CellPos::new(2, 4), "Health".to_string()),
        ]
    );
}

#[test]
fn editing_theme_cell_updates_overview_slot_last_write_wins() {
    let mut h = setup();
    h.propagator.apply_edit(CellPos::new(4, 2), "Health");
    let outcome = h.propagator.apply_edit(CellPos::new(2, 4), "Fitness");

    assert_eq!(
        outcome.written_positions(),
        vec![CellPos::new(2, 4), CellPos::new(4, 2)]
    );
    assert_eq!(h.propagator.grid().get(CellPos::new(4, 2)), "Fitness");
    assert_eq!(h.propagator.grid().get(CellPos::new(2, 4)), "Fitness");
    assert_mirror_invariant(h.propagator.grid());
}

#[test]
fn action_cell_edit_touches_only_itself() {
    let mut h = setup();
    let outcome = h.propagator.apply_edit(CellPos::new(0, 0), "Read 10 pages");

    assert_eq!(outcome.written_positions(), vec![CellPos::new(0, 0)]);
    assert_eq!(h.patches.borrow().len(), 1);
    assert_eq!(h.propagator.grid().get(CellPos::new(0, 0)), "Read 10 pages");
    assert_eq!(h.propagator.grid().get(CellPos::new(4, 0)), "");
    assert_eq!(h.propagator.grid().get(CellPos::new(0, 4)), "");
}

#[test]
fn core_goal_edit_touches_only_itself() {
    let mut h = setup();
    let outcome = h.propagator.apply_edit(CellPos::CORE_GOAL, "Become fluent");

    assert_eq!(outcome.written_positions(), vec![CellPos::CORE_GOAL]);
    assert_eq!(h.patches.borrow().len(), 1);
    let changed = CellPos::all()
        .filter(|pos| !h.propagator.grid().get(*pos).is_empty())
        .collect::<Vec<_>>();
    assert_eq!(changed, vec![CellPos::CORE_GOAL]);
}

#[test]
fn every_unlinked_cell_notifies_exactly_once() {
    for pos in CellPos::all().filter(|pos| pos.mirror().is_none()) {
        let mut h = setup();
        let outcome = h.propagator.apply_edit(pos, "x");
        assert_eq!(outcome.writes.len(), 1, "edit at {pos}");
        assert_eq!(h.patches.borrow().len(), 1, "edit at {pos}");
    }
}

#[test]
fn every_linked_cell_writes_and_notifies_both_sides() {
    for pos in CellPos::all().filter(|pos| pos.mirror().is_some()) {
        let mut h = setup();
        let outcome = h.propagator.apply_edit(pos, "linked");
        let mirror = pos.mirror().unwrap();

        assert_eq!(outcome.written_positions(), vec![pos, mirror]);
        assert!(outcome.writes.iter().all(|write| write.applied_views == 1));
        assert_eq!(h.propagator.grid().get(mirror), "linked");
        assert_eq!(h.patches.borrow().len(), 2);
    }
}

#[test]
fn mirror_invariant_holds_after_mixed_edit_sequence() {
    let mut h = setup();
    let script = [
        ((4, 0), "Health"),
        ((1, 4), "Career"),
        ((3, 3), "Sleep early"),
        ((4, 1), "Work"),
        ((8, 4), "Family"),
        ((4, 4), "Good life"),
        ((4, 8), "Kids"),
        ((0, 4), ""),
    ];
    for ((block, cell), value) in script {
        h.propagator.apply_edit(CellPos::new(block, cell), value);
        assert_mirror_invariant(h.propagator.grid());
    }

    assert_eq!(h.propagator.grid().get(CellPos::new(1, 4)), "Work");
    assert_eq!(h.propagator.grid().get(CellPos::new(4, 8)), "Kids");
    assert_eq!(h.propagator.grid().get(CellPos::new(4, 0)), "");
}

#[test]
fn repeated_identical_edit_is_a_view_no_op() {
    let mut h = setup();
    let first = h.propagator.apply_edit(CellPos::new(4, 6), "Money");
    let second = h.propagator.apply_edit(CellPos::new(4, 6), "Money");

    assert!(first.writes.iter().all(|write| write.applied_views == 1));
    assert!(second.writes.iter().all(|write| write.applied_views == 0));
}

#[test]
fn unmounted_views_are_skipped_without_error() {
    let repo = MemoryKvRepository::new();
    let mut propagator = EditPropagator::new(GridStore::new(), PersistenceGateway::new(repo));
    let (view, patches, _) = RecordingView::new(ViewKind::List);
    propagator.register_view(Box::new(view)).unwrap();

    let outcome = propagator.apply_edit(CellPos::new(4, 3), "Study");
    assert!(outcome.writes.iter().all(|write| write.applied_views == 0));
    assert_eq!(patches.borrow().len(), 2);
    assert_eq!(propagator.grid().get(CellPos::new(3, 4)), "Study");
}

#[test]
fn every_edit_persists_the_full_snapshot() {
    let mut h = setup();
    h.propagator.apply_edit(CellPos::new(4, 2), "Health");

    let stored = h.repo.get(GRID_RECORD_KEY).unwrap().unwrap();
    let grid: Grid = serde_json::from_str(&stored).unwrap();
    assert_eq!(&grid, h.propagator.grid());
}

#[test]
fn storage_failure_degrades_to_warning_and_keeps_the_edit() {
    let mut h = setup();
    h.repo.set_unavailable(true);

    let outcome = h.propagator.apply_edit(CellPos::new(4, 5), "Travel");
    assert!(matches!(
        outcome.warning,
        Some(Warning::PersistenceUnavailable(_))
    ));
    assert_eq!(h.propagator.grid().get(CellPos::new(5, 4)), "Travel");
    assert_eq!(
        h.propagator.view(ViewKind::Grid).unwrap().displayed(CellPos::new(5, 4)),
        Some("Travel")
    );

    h.repo.set_unavailable(false);
    let outcome = h.propagator.apply_edit(CellPos::new(0, 0), "Walk");
    assert_eq!(outcome.warning, None);
}

#[test]
fn reset_rebuilds_mounted_views_and_persists_blank_grid() {
    let mut h = setup();
    h.propagator.apply_edit(CellPos::new(4, 2), "Health");
    let rebuilds_before = *h.rebuilds.borrow();

    assert_eq!(h.propagator.reset_all(), None);
    assert!(h.propagator.grid().is_blank());
    assert_eq!(*h.rebuilds.borrow(), rebuilds_before + 1);

    let stored = h.repo.get(GRID_RECORD_KEY).unwrap().unwrap();
    let grid: Grid = serde_json::from_str(&stored).unwrap();
    assert!(grid.is_blank());
}

#[test]
fn duplicate_view_kind_is_rejected() {
    let mut h = setup();
    let (view, _, _) = RecordingView::new(ViewKind::Grid);
    let err = h.propagator.register_view(Box::new(view)).unwrap_err();
    assert_eq!(err, ViewRegistryError::DuplicateView(ViewKind::Grid));
}
