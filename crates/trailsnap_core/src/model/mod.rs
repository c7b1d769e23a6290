//! Domain model for the photo-task lifecycle.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep enum fields closed (difficulty, submission status) with explicit
//!   storage mapping at the repository boundary.
//!
//! # Invariants
//! - Every domain object is identified by a stable uuid.
//! - Timestamps are Unix epoch milliseconds assigned by storage.

pub mod achievement;
pub mod feed;
pub mod profile;
pub mod submission;
pub mod task;
