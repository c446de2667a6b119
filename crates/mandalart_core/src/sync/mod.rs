//! Linked-cell synchronization.
//!
//! # Responsibility
//! - Define the view adapter contract and the edit source views report on.
//! - Resolve edits against the mirror rule and fan them out to views.
//!
//! # Invariants
//! - The propagator depends only on `ViewAdapter`, never on concrete views.

pub mod propagator;
pub mod view;
