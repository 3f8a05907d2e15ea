//! Member use-case service.
//!
//! # Responsibility
//! - Register members with validated nicknames.
//! - Resolve member identity for callers.
//!
//! # Invariants
//! - Nickname validation runs before persistence.

use crate::model::member::{Member, MemberId};
use crate::repo::member_repo::MemberRepository;
use crate::service::validation::validate_nickname;
use crate::service::ServiceError;
use log::info;

/// Member service facade over repository implementations.
pub struct MemberService<R: MemberRepository> {
    repo: R,
}

impl<R: MemberRepository> MemberService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one member with a validated nickname.
    pub fn register(&self, nickname: &str) -> Result<Member, ServiceError> {
        let nickname = nickname.trim();
        validate_nickname(nickname)?;

        let member_id = self.repo.create_member(nickname)?;
        info!("event=member_register module=member status=ok member_id={member_id}");

        self.repo
            .get_member(member_id)?
            .ok_or(ServiceError::InconsistentState(
                "registered member not found in read-back",
            ))
    }

    /// Gets one member by stable id.
    pub fn get_member(&self, id: MemberId) -> Result<Option<Member>, ServiceError> {
        Ok(self.repo.get_member(id)?)
    }

    /// Gets one member by unique nickname.
    pub fn get_member_by_nickname(&self, nickname: &str) -> Result<Option<Member>, ServiceError> {
        Ok(self.repo.get_member_by_nickname(nickname.trim())?)
    }

    /// Resolves a member or fails with `MemberNotFound`.
    pub fn require_member(&self, id: MemberId) -> Result<Member, ServiceError> {
        self.get_member(id)?
            .ok_or(ServiceError::MemberNotFound(id))
    }
}
