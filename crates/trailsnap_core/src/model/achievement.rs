//! Achievement catalog model.
//!
//! # Responsibility
//! - Define the administratively created achievement catalog entry.
//!
//! # Invariants
//! - `name` is unique across the catalog.
//! - Catalog entries are immutable after creation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an achievement definition.
pub type AchievementId = Uuid;

/// Sentinel achievement granted on a user's first completed submission.
pub const FIRST_STEPS_ACHIEVEMENT: &str = "First Steps";

/// An achievement definition with its bonus point value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub points: i64,
}
