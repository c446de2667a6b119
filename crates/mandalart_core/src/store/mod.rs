//! In-session owner of the canonical grid.

pub mod grid_store;
