//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate load, edit, reset, settings and export for one session.
//! - Keep hosts (CLI, UI shells) decoupled from storage and view wiring.

pub mod board_service;
