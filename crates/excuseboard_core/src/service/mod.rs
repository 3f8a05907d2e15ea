//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass repository persistence contracts.
//! - Repository errors surface unchanged; nothing is swallowed or retried.

use crate::model::comment::CommentId;
use crate::model::member::MemberId;
use crate::model::post::PostId;
use crate::model::vote::VoteType;
use crate::repo::RepoError;
use crate::service::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment_service;
pub mod member_service;
pub mod post_service;
pub mod validation;
pub mod vote_service;

/// Use-case error shared by board services.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed caller input.
    Validation(ValidationError),
    MemberNotFound(MemberId),
    PostNotFound(PostId),
    CommentNotFound(CommentId),
    /// Conflicting vote direction; carries the existing type so clients can
    /// prompt for an explicit cancel.
    AlreadyVoted(VoteType),
    SelfVoteNotAllowed,
    /// Persistence-layer failure without a more specific meaning.
    Repo(RepoError),
    /// Internal mismatch between a write and its read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::CommentNotFound(id) => write!(f, "comment not found: {id}"),
            Self::AlreadyVoted(existing) => write!(
                f,
                "already voted {existing:?}; cancel the existing vote before switching"
            ),
            Self::SelfVoteNotAllowed => write!(f, "voting on own content is not allowed"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::MemberNotFound(id) => Self::MemberNotFound(id),
            RepoError::PostNotFound(id) => Self::PostNotFound(id),
            RepoError::CommentNotFound(id) => Self::CommentNotFound(id),
            RepoError::AlreadyVoted(existing) => Self::AlreadyVoted(existing),
            RepoError::SelfVoteNotAllowed => Self::SelfVoteNotAllowed,
            other => Self::Repo(other),
        }
    }
}
