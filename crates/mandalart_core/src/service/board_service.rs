//! Board session service.
//!
//! # Responsibility
//! - Load the persisted grid and settings once per session.
//! - Wire the grid and list views to the edit propagator.
//! - Provide reset, view switching, settings and export use-cases.
//!
//! # Invariants
//! - Every user edit goes through `EditPropagator::apply_edit`.
//! - Edits queued by views are drained one at a time, in order; an edit is
//!   fully propagated before the next one starts.
//! - Storage and export failures become warnings, never errors.

use crate::export::{ExportArtifact, ExportRequest, Exporter};
use crate::model::grid::{CellPos, Grid};
use crate::model::settings::{Settings, SettingsError, SettingsPatch};
use crate::model::warning::Warning;
use crate::repo::gateway::{PersistenceGateway, GRID_RECORD_KEY, SETTINGS_RECORD_KEY};
use crate::repo::kv_repo::{KvRepository, RepoError};
use crate::store::grid_store::GridStore;
use crate::sync::propagator::{EditOutcome, EditPropagator};
use crate::sync::view::{EditSink, ViewAdapter, ViewKind};
use crate::view::{GridView, ListView};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Prompt shown before clearing the board.
pub const RESET_PROMPT: &str = "Are you sure you want to clear your Mandalart?";

/// Confirmation collaborator for destructive actions.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Errors for board operations that reject caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    ViewNotRegistered(ViewKind),
    /// The view has no input bound to the coordinate (or is unmounted).
    NoInputAt { view: ViewKind, pos: CellPos },
    Settings(SettingsError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ViewNotRegistered(kind) => write!(f, "{kind} view is not registered"),
            Self::NoInputAt { view, pos } => write!(f, "{view} view has no input bound to {pos}"),
            Self::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Settings(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SettingsError> for BoardError {
    fn from(value: SettingsError) -> Self {
        Self::Settings(value)
    }
}

/// One editing session over a persisted board.
pub struct BoardService<K: KvRepository> {
    propagator: EditPropagator<K>,
    settings: Settings,
    sink: EditSink,
    active_view: ViewKind,
    warnings: Vec<Warning>,
}

impl<K: KvRepository> BoardService<K> {
    /// Loads persisted state and mounts both views.
    ///
    /// # Contract
    /// - Absent grid record: all-empty grid.
    /// - Unreadable records: defaults plus a warning.
    /// - Diverged linked cells: theme cell value wins and is written back,
    ///   plus a warning.
    pub fn open(gateway: PersistenceGateway<K>) -> Self {
        let mut warnings = Vec::new();
        let grid = load_grid(&gateway, &mut warnings);
        let settings = load_settings(&gateway, &mut warnings);

        let sink = EditSink::new();
        let mut propagator = EditPropagator::new(GridStore::from_grid(grid), gateway);
        let views: [Box<dyn ViewAdapter>; 2] = [Box::new(GridView::new()), Box::new(ListView::new())];
        for mut view in views {
            view.bind_edit_source(sink.clone());
            if let Err(err) = propagator.register_view(view) {
                warn!("event=view_register module=service status=error error={err}");
            }
        }
        propagator.rebuild_all();

        info!(
            "event=board_open module=service status=ok warnings={}",
            warnings.len()
        );
        Self {
            propagator,
            settings,
            sink,
            active_view: ViewKind::Grid,
            warnings,
        }
    }

    /// A user typed `value` into the element bound to `pos` in `view`.
    ///
    /// Returns one outcome per edit drained from the edit source.
    pub fn type_into(
        &mut self,
        view: ViewKind,
        pos: CellPos,
        value: &str,
    ) -> Result<Vec<EditOutcome>, BoardError> {
        let target = self
            .propagator
            .view_mut(view)
            .ok_or(BoardError::ViewNotRegistered(view))?;
        if !target.receive_input(pos, value) {
            return Err(BoardError::NoInputAt { view, pos });
        }
        Ok(self.drain_edits())
    }

    /// Applies an edit that did not originate from a view.
    pub fn apply_edit(&mut self, pos: CellPos, value: &str) -> EditOutcome {
        let outcome = self.propagator.apply_edit(pos, value);
        self.collect(outcome.warning.clone());
        outcome
    }

    /// Propagates every pending edit reported by the views.
    pub fn drain_edits(&mut self) -> Vec<EditOutcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = self.sink.pop() {
            outcomes.push(self.apply_edit(event.pos, &event.value));
        }
        outcomes
    }

    /// Makes `kind` the active view and rebuilds it from the canonical grid.
    pub fn switch_view(&mut self, kind: ViewKind) -> Result<(), BoardError> {
        if !self.propagator.rebuild_view(kind) {
            return Err(BoardError::ViewNotRegistered(kind));
        }
        self.active_view = kind;
        Ok(())
    }

    /// Hides one view; it is rebuilt lazily on the next `switch_view`.
    pub fn unmount_view(&mut self, kind: ViewKind) -> Result<(), BoardError> {
        let view = self
            .propagator
            .view_mut(kind)
            .ok_or(BoardError::ViewNotRegistered(kind))?;
        view.unmount();
        Ok(())
    }

    /// Clears the whole board after confirmation.
    ///
    /// Returns `false` and changes nothing when the user declines.
    pub fn reset(&mut self, confirm: &mut impl Confirm) -> bool {
        if !confirm.confirm(RESET_PROMPT) {
            info!("event=grid_reset module=service status=declined");
            return false;
        }
        let warning = self.propagator.reset_all();
        self.collect(warning);
        true
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validates and applies a settings change, then persists it.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<&Settings, BoardError> {
        let next = self.settings.apply(patch)?;
        self.settings = next;
        if let Err(err) = self.propagator.gateway().save_settings(&self.settings) {
            warn!("event=settings_persist module=service status=error error={err}");
            self.collect(Some(Warning::PersistenceUnavailable(err.to_string())));
        }
        Ok(&self.settings)
    }

    /// Hands the current board to an exporter.
    ///
    /// Returns `None` (with a warning queued) when the export fails.
    pub fn export(&mut self, exporter: &impl Exporter) -> Option<ExportArtifact> {
        let request = ExportRequest::from_settings(&self.settings);
        match exporter.export(&request, self.propagator.grid()) {
            Ok(artifact) => Some(artifact),
            Err(err) => {
                warn!("event=board_export module=service status=error error={err}");
                self.collect(Some(Warning::ExportFailed(err.to_string())));
                None
            }
        }
    }

    pub fn grid(&self) -> &Grid {
        self.propagator.grid()
    }

    pub fn view(&self, kind: ViewKind) -> Option<&dyn ViewAdapter> {
        self.propagator.view(kind)
    }

    pub fn active_view(&self) -> ViewKind {
        self.active_view
    }

    /// Drains queued user-visible warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    fn collect(&mut self, warning: Option<Warning>) {
        if let Some(warning) = warning {
            self.warnings.push(warning);
        }
    }
}

fn load_grid<K: KvRepository>(gateway: &PersistenceGateway<K>, warnings: &mut Vec<Warning>) -> Grid {
    match gateway.load_grid() {
        Ok(Some(mut grid)) => {
            let repaired = grid.repair_mirrors();
            if !repaired.is_empty() {
                warn!(
                    "event=grid_load module=service status=repaired directions={}",
                    repaired.len()
                );
                warnings.push(Warning::MirrorRepaired(repaired));
                if let Err(err) = gateway.save_grid(&grid) {
                    warn!("event=grid_save module=service status=error error={err}");
                    warnings.push(Warning::PersistenceUnavailable(err.to_string()));
                }
            }
            grid
        }
        Ok(None) => Grid::default(),
        Err(err) => {
            warn!("event=grid_load module=service status=error error={err}");
            warnings.push(load_warning(GRID_RECORD_KEY, err));
            Grid::default()
        }
    }
}

fn load_settings<K: KvRepository>(
    gateway: &PersistenceGateway<K>,
    warnings: &mut Vec<Warning>,
) -> Settings {
    match gateway.load_settings() {
        Ok(Some(settings)) => match settings.validate() {
            Ok(()) => settings,
            Err(err) => {
                warn!("event=settings_load module=service status=invalid error={err}");
                warnings.push(Warning::StoredRecordDiscarded {
                    key: SETTINGS_RECORD_KEY,
                    reason: err.to_string(),
                });
                Settings::default()
            }
        },
        Ok(None) => Settings::default(),
        Err(err) => {
            warn!("event=settings_load module=service status=error error={err}");
            warnings.push(load_warning(SETTINGS_RECORD_KEY, err));
            Settings::default()
        }
    }
}

fn load_warning(key: &'static str, err: RepoError) -> Warning {
    match err {
        RepoError::InvalidData { message, .. } => Warning::StoredRecordDiscarded {
            key,
            reason: message,
        },
        other => Warning::PersistenceUnavailable(other.to_string()),
    }
}
