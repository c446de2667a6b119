//! Core domain logic for the mandalart goal-planning board.
//! This crate is the single source of truth for the linked-cell invariant.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod sync;
pub mod view;

pub use export::{ExportArtifact, ExportError, ExportRequest, Exporter, TextExporter};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::grid::{CellPos, CellRole, CoordinateError, Direction, Grid, CENTER, GRID_SIZE};
pub use model::settings::{Settings, SettingsError, SettingsPatch};
pub use model::warning::Warning;
pub use repo::gateway::{PersistenceGateway, GRID_RECORD_KEY, SETTINGS_RECORD_KEY};
pub use repo::kv_repo::{KvRepository, MemoryKvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use service::board_service::{BoardError, BoardService, Confirm, RESET_PROMPT};
pub use store::grid_store::GridStore;
pub use sync::propagator::{CellWrite, EditOutcome, EditPropagator, ViewRegistryError};
pub use sync::view::{EditEvent, EditSink, PatchOutcome, ViewAdapter, ViewKind};
pub use view::{GridView, ListView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
