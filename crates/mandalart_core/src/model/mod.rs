//! Board domain model.
//!
//! # Responsibility
//! - Define grid coordinates, the canonical grid matrix and the settings record.
//! - Keep the mirror rule in one place (`CellPos::mirror`).
//!
//! # Invariants
//! - The grid is always fully populated; empty string is "no content".
//! - Settings are independent of grid content.

pub mod grid;
pub mod settings;
pub mod warning;
