//! Comment domain model.
//!
//! # Responsibility
//! - Define the comment shape and its decorated read model.
//!
//! # Invariants
//! - Comments reference their post and author; they own their vote set.
//! - Comment counters follow the same vote-set mirror invariant as posts.

use crate::model::member::{MemberId, MemberSummary};
use crate::model::post::PostId;
use crate::model::vote::VoteType;
use serde::{Deserialize, Serialize};

/// Stable identifier for a comment.
pub type CommentId = i64;

/// Creation command for one comment on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub member_id: MemberId,
    pub content: String,
    /// Marker for comments written in reply to another comment. Plain data
    /// field; no reply-tree semantics attach to it.
    pub is_reply: bool,
}

/// Decorated comment read model returned by list use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author: MemberSummary,
    pub content: String,
    pub is_reply: bool,
    pub upvote_count: i64,
    pub downvote_count: i64,
    /// The requesting viewer's own vote; never another member's.
    pub my_vote: Option<VoteType>,
    pub created_at: i64,
    pub modified_at: i64,
}
