//! Headless view adapters.
//!
//! Each view keeps its own bound elements (the presentation state a
//! rendering layer would draw) and implements `ViewAdapter`.

pub mod grid_view;
pub mod list_view;
pub mod sheet;

pub use grid_view::{GridView, TextArea};
pub use list_view::{ListField, ListGroup, ListView};
