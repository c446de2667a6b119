//! Durable key-value storage and the typed persistence gateway.
//!
//! # Responsibility
//! - Define the key-value contract the board persists through.
//! - Keep SQLite details and JSON record encoding out of the edit path.
//!
//! # Invariants
//! - Records are stored whole (write-through, last write wins).
//! - Malformed stored records surface as `RepoError::InvalidData`.

pub mod gateway;
pub mod kv_repo;
