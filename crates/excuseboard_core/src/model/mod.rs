//! Domain model for the excuse board.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep vote semantics in one place, independent of storage.
//!
//! # Invariants
//! - Every domain object is identified by a stable `i64` id.
//! - Post deletion is represented by a status flip, not a hard delete.

pub mod comment;
pub mod member;
pub mod page;
pub mod post;
pub mod vote;
