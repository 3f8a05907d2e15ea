//! Member domain model.
//!
//! # Responsibility
//! - Define member identity used by posts, comments and votes.
//! - Provide the author summary projection embedded in list records.
//!
//! # Invariants
//! - `MemberId` values are stable and never reused.
//! - Members are referenced by content, never owned by it.

use serde::{Deserialize, Serialize};

/// Stable identifier for a registered member.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type MemberId = i64;

/// Registered member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub nickname: String,
    /// Registration timestamp in epoch milliseconds.
    pub created_at: i64,
}

/// Author projection embedded in post/comment read models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub member_id: MemberId,
    pub nickname: String,
}
