//! Post and excuse domain model.
//!
//! # Responsibility
//! - Define the post aggregate shape and its read model.
//! - Own tag set cleanup used at excuse creation time.
//!
//! # Invariants
//! - An excuse is created together with its post and is immutable afterwards.
//! - `upvote_count`/`downvote_count` mirror the post's vote set exactly.
//! - Deletion is a status flip, never a row delete.

use crate::model::member::MemberSummary;
use crate::model::vote::VoteType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable identifier for a post.
pub type PostId = i64;

/// Stable identifier for an excuse row.
pub type ExcuseId = i64;

/// Visibility lifecycle of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Active,
    Deleted,
}

/// Excuse payload owned by exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excuse {
    /// The situation the excuse applies to.
    pub situation: String,
    /// The excuse text itself.
    pub excuse: String,
    /// Cleaned tag set, see [`clean_tags`].
    pub tags: Vec<String>,
}

/// Creation command for a post plus its owned excuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub member_id: crate::model::member::MemberId,
    pub excuse: Excuse,
}

/// Decorated post read model returned by detail and list use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub post_id: PostId,
    pub author: MemberSummary,
    pub situation: String,
    pub excuse: String,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub upvote_count: i64,
    pub downvote_count: i64,
    pub comment_count: i64,
    /// The requesting viewer's own vote; never another member's.
    pub my_vote: Option<VoteType>,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    /// Last content mutation in epoch milliseconds. Vote traffic does not
    /// touch it, so list order stays creation-based.
    pub modified_at: i64,
}

/// Trims tag values, drops blanks and removes duplicates.
///
/// Set semantics only; tags keep their original casing.
pub fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        let trimmed = tag.trim();
        if !trimmed.is_empty() {
            unique.insert(trimmed.to_string());
        }
    }
    unique.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::clean_tags;

    #[test]
    fn clean_tags_trims_dedupes_and_drops_blanks() {
        let tags = vec![
            " work ".to_string(),
            "work".to_string(),
            "   ".to_string(),
            "late".to_string(),
        ];
        assert_eq!(clean_tags(&tags), vec!["late".to_string(), "work".to_string()]);
    }
}
