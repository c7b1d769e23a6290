//! Public profile and account model.
//!
//! # Responsibility
//! - Define the public profile carrying the point balance.
//! - Keep the account→profile indirection explicit: submissions reference
//!   accounts, while points and achievement grants attach to profiles.
//!
//! # Invariants
//! - `points` is only ever mutated by additive awards in this core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a user account.
pub type UserId = Uuid;

/// Stable identifier for a public profile.
pub type ProfileId = Uuid;

/// Public-facing profile with the point accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfilePublic {
    pub id: ProfileId,
    pub name: String,
    pub points: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub avatar_url: String,
}

/// Ids produced by registering a new user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredUser {
    pub user_id: UserId,
    pub profile_id: ProfileId,
}
