//! Vote use-case service.
//!
//! # Responsibility
//! - Apply member vote actions on posts and comments under the active policy.
//!
//! # Invariants
//! - The apply itself is atomic at the repository layer; the service only
//!   resolves the policy and target addressing.

use crate::model::comment::CommentId;
use crate::model::member::MemberId;
use crate::model::post::PostId;
use crate::model::vote::{VoteOutcome, VoteTarget, VoteType};
use crate::repo::vote_repo::{VoteCommand, VoteRepository};
use crate::service::ServiceError;

/// Configurable vote rules.
///
/// The self-vote restriction ships disabled; flipping it on makes authors
/// unable to vote on their own posts/comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePolicy {
    pub allow_self_vote: bool,
}

impl Default for VotePolicy {
    fn default() -> Self {
        Self {
            allow_self_vote: true,
        }
    }
}

/// Vote service facade over repository implementations.
pub struct VoteService<R: VoteRepository> {
    repo: R,
    policy: VotePolicy,
}

impl<R: VoteRepository> VoteService<R> {
    /// Creates a service with the default policy.
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, VotePolicy::default())
    }

    /// Creates a service with an explicit policy.
    pub fn with_policy(repo: R, policy: VotePolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> VotePolicy {
        self.policy
    }

    /// Applies one vote action on a post.
    ///
    /// Returns `Created` or `Cancelled`; a direction conflict fails with
    /// `AlreadyVoted` carrying the existing type.
    pub fn vote_on_post(
        &mut self,
        post_id: PostId,
        member_id: MemberId,
        requested: VoteType,
    ) -> Result<VoteOutcome, ServiceError> {
        self.apply(VoteTarget::Post(post_id), member_id, requested)
    }

    /// Applies one vote action on a comment.
    pub fn vote_on_comment(
        &mut self,
        comment_id: CommentId,
        member_id: MemberId,
        requested: VoteType,
    ) -> Result<VoteOutcome, ServiceError> {
        self.apply(VoteTarget::Comment(comment_id), member_id, requested)
    }

    /// Returns the vote the member currently holds on a target.
    pub fn find_vote(
        &self,
        target: VoteTarget,
        member_id: MemberId,
    ) -> Result<Option<VoteType>, ServiceError> {
        Ok(self.repo.find_vote(target, member_id)?)
    }

    fn apply(
        &mut self,
        target: VoteTarget,
        member_id: MemberId,
        requested: VoteType,
    ) -> Result<VoteOutcome, ServiceError> {
        let outcome = self.repo.apply_vote(&VoteCommand {
            target,
            member_id,
            requested,
            allow_self_vote: self.policy.allow_self_vote,
        })?;
        Ok(outcome)
    }
}
