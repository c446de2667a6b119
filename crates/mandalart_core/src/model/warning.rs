//! User-visible, non-fatal warnings.
//!
//! I/O-adjacent failures (storage, export) and load-time repairs degrade to
//! one of these instead of aborting the interaction.

use crate::model::grid::Direction;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Storage rejected a write; the in-memory grid stays authoritative.
    PersistenceUnavailable(String),
    /// A stored record could not be read and was replaced by defaults.
    StoredRecordDiscarded { key: &'static str, reason: String },
    /// Loaded grid had diverged linked cells; theme cells were kept.
    MirrorRepaired(Vec<Direction>),
    /// The export collaborator failed; the grid is unaffected.
    ExportFailed(String),
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersistenceUnavailable(reason) => {
                write!(f, "changes could not be saved: {reason}")
            }
            Self::StoredRecordDiscarded { key, reason } => {
                write!(f, "stored `{key}` was unreadable and has been reset: {reason}")
            }
            Self::MirrorRepaired(directions) => {
                let labels = directions
                    .iter()
                    .map(|direction| direction.label())
                    .collect::<Vec<_>>();
                write!(
                    f,
                    "sub goal titles were out of sync and have been restored: {}",
                    labels.join(", ")
                )
            }
            Self::ExportFailed(reason) => write!(f, "export failed: {reason}"),
        }
    }
}
