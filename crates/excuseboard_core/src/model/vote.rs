//! Vote domain model and ledger logic.
//!
//! # Responsibility
//! - Define vote direction, apply outcome and target addressing types.
//! - Own the create/cancel/reject decision shared by every vote apply path.
//! - Provide an in-memory ledger with counters derived incrementally.
//!
//! # Invariants
//! - At most one vote per (target, member) pair at any time.
//! - `upvote_count == |votes with Upvote|`, symmetrically for downvotes.
//! - Switching direction requires an explicit cancel first; a conflicting
//!   request is rejected and leaves the existing vote untouched.

use crate::model::comment::CommentId;
use crate::model::member::MemberId;
use crate::model::post::PostId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Direction of a vote on a post or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Upvote,
    Downvote,
}

/// Result of a successfully applied vote action.
///
/// Conflicting requests do not produce an outcome; they fail with
/// [`VoteConflict`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// A new vote record was created.
    Created,
    /// The member's existing same-direction vote was removed (toggle-off).
    Cancelled,
}

impl VoteOutcome {
    /// Boundary response shape: `true` when a vote was created.
    pub fn created(&self) -> bool {
        matches!(self, Self::Created)
    }
}

/// Addressing for anything that can receive votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTarget {
    Post(PostId),
    Comment(CommentId),
}

/// Rejected vote action: the member already voted the other direction.
///
/// Carries the existing direction so callers can prompt for an explicit
/// cancel before switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteConflict {
    pub existing: VoteType,
}

impl Display for VoteConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "already voted {:?}; cancel the existing vote before switching",
            self.existing
        )
    }
}

impl Error for VoteConflict {}

/// Mutation to perform for a non-conflicting vote action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDecision {
    Create,
    Cancel,
}

/// Decides how a vote action applies against the member's existing vote.
///
/// This is the single source of truth for vote semantics; the in-memory
/// ledger and the SQLite apply path both route through it.
///
/// - no existing vote: create one of `requested` direction;
/// - existing vote of the same direction: cancel it (toggle-off);
/// - existing vote of the other direction: reject with the existing type.
pub fn decide_vote(
    existing: Option<VoteType>,
    requested: VoteType,
) -> Result<VoteDecision, VoteConflict> {
    match existing {
        None => Ok(VoteDecision::Create),
        Some(current) if current == requested => Ok(VoteDecision::Cancel),
        Some(current) => Err(VoteConflict { existing: current }),
    }
}

/// One target's vote collection with incrementally maintained counters.
///
/// Votes are indexed by member id, so existing-vote lookup is O(log n)
/// instead of a linear scan over an unordered collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteLedger {
    votes: BTreeMap<MemberId, VoteType>,
    upvote_count: u64,
    downvote_count: u64,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one vote action for `member_id` and adjusts counters.
    ///
    /// All three outcomes mutate (or refuse to mutate) atomically: a
    /// rejected action leaves the ledger exactly as it was.
    pub fn apply(
        &mut self,
        member_id: MemberId,
        requested: VoteType,
    ) -> Result<VoteOutcome, VoteConflict> {
        match decide_vote(self.vote_of(member_id), requested)? {
            VoteDecision::Create => {
                self.votes.insert(member_id, requested);
                match requested {
                    VoteType::Upvote => self.upvote_count += 1,
                    VoteType::Downvote => self.downvote_count += 1,
                }
                Ok(VoteOutcome::Created)
            }
            VoteDecision::Cancel => {
                self.votes.remove(&member_id);
                match requested {
                    VoteType::Upvote => self.upvote_count -= 1,
                    VoteType::Downvote => self.downvote_count -= 1,
                }
                Ok(VoteOutcome::Cancelled)
            }
        }
    }

    /// Returns the vote a specific member holds on this target.
    pub fn vote_of(&self, member_id: MemberId) -> Option<VoteType> {
        self.votes.get(&member_id).copied()
    }

    /// View decoration contract: a viewer sees only their own vote.
    ///
    /// Anonymous viewers short-circuit to `None` without any lookup.
    pub fn my_vote(&self, viewer: Option<MemberId>) -> Option<VoteType> {
        viewer.and_then(|member_id| self.vote_of(member_id))
    }

    pub fn upvote_count(&self) -> u64 {
        self.upvote_count
    }

    pub fn downvote_count(&self) -> u64 {
        self.downvote_count
    }

    /// Total number of vote records currently held.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Recomputes counters from the vote set. Repair/debug path only;
    /// normal operation maintains counters incrementally in `apply`.
    pub fn recounted(&self) -> (u64, u64) {
        let upvotes = self
            .votes
            .values()
            .filter(|vote| **vote == VoteType::Upvote)
            .count() as u64;
        (upvotes, self.votes.len() as u64 - upvotes)
    }
}
