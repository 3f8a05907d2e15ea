//! Core domain logic for the excuse board.
//!
//! Members post excuses for situations, tag them, comment on each other's
//! posts and upvote/downvote posts and comments. This crate is the single
//! source of truth for the business invariants: one vote per member per
//! target, counters that mirror the vote set, and list views that only ever
//! expose the requesting viewer's own vote.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::comment::{CommentId, CommentRecord, NewComment};
pub use model::member::{Member, MemberId, MemberSummary};
pub use model::page::{Page, PageRequest};
pub use model::post::{Excuse, ExcuseId, NewPost, PostId, PostRecord, PostStatus};
pub use model::vote::{
    decide_vote, VoteConflict, VoteDecision, VoteLedger, VoteOutcome, VoteTarget, VoteType,
};
pub use repo::comment_repo::{CommentListQuery, CommentRepository, SqliteCommentRepository};
pub use repo::member_repo::{MemberRepository, SqliteMemberRepository};
pub use repo::post_repo::{PostListQuery, PostRepository, SqlitePostRepository};
pub use repo::vote_repo::{SqliteVoteRepository, VoteCommand, VoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::comment_service::CommentService;
pub use service::member_service::MemberService;
pub use service::post_service::PostService;
pub use service::validation::ValidationError;
pub use service::vote_service::{VotePolicy, VoteService};
pub use service::ServiceError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
