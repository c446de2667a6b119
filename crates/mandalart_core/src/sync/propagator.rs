//! Edit propagator: the linked-cell synchronization engine.
//!
//! # Responsibility
//! - Resolve one raw edit into the canonical writes the mirror rule demands.
//! - Notify every registered view of only the written coordinates.
//! - Hand the updated snapshot to the persistence gateway.
//!
//! # Invariants
//! - After every `apply_edit`, `grid[4][d] == grid[d][4]` for every
//!   surrounding direction `d` (given it held before).
//! - One edit writes at most two coordinates and never recurses: the mirror
//!   target is written directly, not through another `apply_edit`.
//! - Persistence failure never blocks or rolls back an edit.

use crate::model::grid::{CellPos, Grid};
use crate::model::warning::Warning;
use crate::repo::gateway::PersistenceGateway;
use crate::repo::kv_repo::KvRepository;
use crate::store::grid_store::GridStore;
use crate::sync::view::{PatchOutcome, ViewAdapter, ViewKind};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// View registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRegistryError {
    DuplicateView(ViewKind),
}

impl Display for ViewRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateView(kind) => write!(f, "{kind} view already registered"),
        }
    }
}

impl Error for ViewRegistryError {}

/// One canonical write performed by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellWrite {
    pub pos: CellPos,
    /// Views whose displayed element actually changed.
    pub applied_views: usize,
}

/// Everything one `apply_edit` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The edited coordinate first, then its mirror when linked.
    pub writes: Vec<CellWrite>,
    /// Set when the snapshot could not be persisted.
    pub warning: Option<Warning>,
}

impl EditOutcome {
    pub fn written_positions(&self) -> Vec<CellPos> {
        self.writes.iter().map(|write| write.pos).collect()
    }
}

/// Owns the grid store, the live views and the gateway for one session.
pub struct EditPropagator<K: KvRepository> {
    store: GridStore,
    views: Vec<Box<dyn ViewAdapter>>,
    gateway: PersistenceGateway<K>,
}

impl<K: KvRepository> EditPropagator<K> {
    pub fn new(store: GridStore, gateway: PersistenceGateway<K>) -> Self {
        Self {
            store,
            views: Vec::new(),
            gateway,
        }
    }

    /// Registers one view; at most one view per kind.
    pub fn register_view(&mut self, view: Box<dyn ViewAdapter>) -> Result<(), ViewRegistryError> {
        let kind = view.kind();
        if self.views.iter().any(|existing| existing.kind() == kind) {
            return Err(ViewRegistryError::DuplicateView(kind));
        }
        self.views.push(view);
        Ok(())
    }

    /// Applies one user edit and propagates it.
    ///
    /// # Contract
    /// - Writes `(pos, value)`, plus `(pos.mirror(), value)` when linked.
    /// - Patches every registered view for each written coordinate.
    /// - Persists the snapshot after all views were patched.
    pub fn apply_edit(&mut self, pos: CellPos, value: &str) -> EditOutcome {
        let targets = resolve_targets(pos);
        for target in &targets {
            self.store.set(*target, value);
        }

        let writes = targets
            .into_iter()
            .map(|target| CellWrite {
                pos: target,
                applied_views: self.notify_views(target, value),
            })
            .collect::<Vec<_>>();

        let warning = self.persist_grid();
        debug!(
            "event=edit_apply module=sync status={} block={} cell={} writes={}",
            if warning.is_some() { "degraded" } else { "ok" },
            pos.block(),
            pos.cell(),
            writes.len()
        );
        EditOutcome { writes, warning }
    }

    /// Clears the grid, rebuilds every mounted view and persists the result.
    pub fn reset_all(&mut self) -> Option<Warning> {
        self.store.reset_all();
        let grid = self.store.grid();
        let mut rebuilt = 0;
        for view in self.views.iter_mut().filter(|view| view.is_mounted()) {
            view.rebuild(grid);
            rebuilt += 1;
        }
        let warning = self.persist_grid();
        info!("event=grid_reset module=sync status=ok rebuilt_views={rebuilt}");
        warning
    }

    /// Rebuilds one view from the canonical grid, mounting it if needed.
    ///
    /// Returns `false` when no view of that kind is registered.
    pub fn rebuild_view(&mut self, kind: ViewKind) -> bool {
        let grid = self.store.grid();
        match self.views.iter_mut().find(|view| view.kind() == kind) {
            Some(view) => {
                view.rebuild(grid);
                true
            }
            None => false,
        }
    }

    /// Rebuilds every registered view (initial load).
    pub fn rebuild_all(&mut self) {
        let grid = self.store.grid();
        for view in &mut self.views {
            view.rebuild(grid);
        }
    }

    pub fn view(&self, kind: ViewKind) -> Option<&dyn ViewAdapter> {
        self.views
            .iter()
            .find(|view| view.kind() == kind)
            .map(|view| view.as_ref())
    }

    pub fn view_mut(&mut self, kind: ViewKind) -> Option<&mut (dyn ViewAdapter + 'static)> {
        self.views
            .iter_mut()
            .find(|view| view.kind() == kind)
            .map(|view| view.as_mut())
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn grid(&self) -> &Grid {
        self.store.grid()
    }

    pub fn gateway(&self) -> &PersistenceGateway<K> {
        &self.gateway
    }

    fn notify_views(&mut self, pos: CellPos, value: &str) -> usize {
        let mut applied = 0;
        for view in &mut self.views {
            if view.patch(pos, value) == PatchOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }

    fn persist_grid(&self) -> Option<Warning> {
        match self.gateway.save_grid(&self.store.snapshot()) {
            Ok(()) => None,
            Err(err) => {
                warn!("event=grid_persist module=sync status=error error={err}");
                Some(Warning::PersistenceUnavailable(err.to_string()))
            }
        }
    }
}

/// Coordinates one edit must write: itself, then its mirror when linked.
pub fn resolve_targets(pos: CellPos) -> Vec<CellPos> {
    let mut targets = Vec::with_capacity(2);
    targets.push(pos);
    targets.extend(pos.mirror());
    targets
}

#[cfg(test)]
mod tests {
    use super::resolve_targets;
    use crate::model::grid::CellPos;

    #[test]
    fn core_goal_and_actions_resolve_to_one_target() {
        assert_eq!(resolve_targets(CellPos::CORE_GOAL), vec![CellPos::CORE_GOAL]);
        assert_eq!(resolve_targets(CellPos::new(0, 0)), vec![CellPos::new(0, 0)]);
    }

    #[test]
    fn linked_cells_resolve_to_themselves_then_mirror() {
        assert_eq!(
            resolve_targets(CellPos::new(4, 2)),
            vec![CellPos::new(4, 2), CellPos::new(2, 4)]
        );
        assert_eq!(
            resolve_targets(CellPos::new(6, 4)),
            vec![CellPos::new(6, 4), CellPos::new(4, 6)]
        );
    }
}
