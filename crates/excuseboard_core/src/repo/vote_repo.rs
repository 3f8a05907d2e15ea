//! Vote apply over SQLite storage.
//!
//! # Responsibility
//! - Apply one vote action (create / toggle-off / reject) against a post or
//!   comment and keep the target's counters in step with its vote set.
//!
//! # Invariants
//! - The whole apply runs in one IMMEDIATE transaction per target, so
//!   concurrent actions on the same target serialize and readers only ever
//!   see committed counter states.
//! - A rejected or failed action leaves storage exactly as it was.
//! - The `votes` UNIQUE constraint backs up the at-most-one-vote rule.

use crate::model::member::MemberId;
use crate::model::vote::{decide_vote, VoteDecision, VoteOutcome, VoteTarget, VoteType};
use crate::repo::{
    ensure_connection_ready, member_exists, parse_vote_type, vote_type_to_db, RepoError,
    RepoResult, TableRequirement,
};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

const VOTE_REQUIREMENTS: &[TableRequirement] = &[
    TableRequirement {
        table: "votes",
        columns: &["target_type", "target_id", "member_id", "vote_type"],
    },
    TableRequirement {
        table: "posts",
        columns: &["id", "member_id", "status", "upvote_count", "downvote_count"],
    },
    TableRequirement {
        table: "comments",
        columns: &["id", "member_id", "upvote_count", "downvote_count"],
    },
];

/// One vote action, resolved by the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteCommand {
    pub target: VoteTarget,
    pub member_id: MemberId,
    pub requested: VoteType,
    /// Active policy value; when `false`, the target's author may not vote
    /// on it.
    pub allow_self_vote: bool,
}

/// Repository interface for vote mutations and lookups.
pub trait VoteRepository {
    /// Applies one vote action atomically and returns the outcome.
    fn apply_vote(&mut self, command: &VoteCommand) -> RepoResult<VoteOutcome>;
    /// Returns the vote a member currently holds on a target.
    fn find_vote(&self, target: VoteTarget, member_id: MemberId)
        -> RepoResult<Option<VoteType>>;
}

/// SQLite-backed vote repository.
pub struct SqliteVoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteVoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, VOTE_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl VoteRepository for SqliteVoteRepository<'_> {
    fn apply_vote(&mut self, command: &VoteCommand) -> RepoResult<VoteOutcome> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let author_id = target_author(&tx, command.target)?;
        if !member_exists(&tx, command.member_id)? {
            return Err(RepoError::MemberNotFound(command.member_id));
        }
        if !command.allow_self_vote && author_id == command.member_id {
            return Err(RepoError::SelfVoteNotAllowed);
        }

        let existing = existing_vote(&tx, command.target, command.member_id)?;
        let decision = decide_vote(existing, command.requested)
            .map_err(|conflict| RepoError::AlreadyVoted(conflict.existing))?;

        let (type_label, target_id) = target_key(command.target);
        let outcome = match decision {
            VoteDecision::Create => {
                tx.execute(
                    "INSERT INTO votes (target_type, target_id, member_id, vote_type)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        type_label,
                        target_id,
                        command.member_id,
                        vote_type_to_db(command.requested),
                    ],
                )?;
                adjust_counter(&tx, command.target, command.requested, 1)?;
                VoteOutcome::Created
            }
            VoteDecision::Cancel => {
                tx.execute(
                    "DELETE FROM votes
                     WHERE target_type = ?1
                       AND target_id = ?2
                       AND member_id = ?3;",
                    params![type_label, target_id, command.member_id],
                )?;
                adjust_counter(&tx, command.target, command.requested, -1)?;
                VoteOutcome::Cancelled
            }
        };

        tx.commit()?;
        info!(
            "event=vote_apply module=vote status=ok target={type_label} target_id={target_id} member_id={} outcome={}",
            command.member_id,
            match outcome {
                VoteOutcome::Created => "created",
                VoteOutcome::Cancelled => "cancelled",
            }
        );
        Ok(outcome)
    }

    fn find_vote(
        &self,
        target: VoteTarget,
        member_id: MemberId,
    ) -> RepoResult<Option<VoteType>> {
        existing_vote(self.conn, target, member_id)
    }
}

fn target_key(target: VoteTarget) -> (&'static str, i64) {
    match target {
        VoteTarget::Post(id) => ("post", id),
        VoteTarget::Comment(id) => ("comment", id),
    }
}

/// Resolves the target's author, failing with the matching not-found error
/// for missing or deleted targets.
fn target_author(tx: &Transaction<'_>, target: VoteTarget) -> RepoResult<MemberId> {
    match target {
        VoteTarget::Post(id) => tx
            .query_row(
                "SELECT member_id FROM posts WHERE id = ?1 AND status = 'active';",
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(RepoError::PostNotFound(id)),
        VoteTarget::Comment(id) => tx
            .query_row(
                "SELECT member_id FROM comments WHERE id = ?1;",
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(RepoError::CommentNotFound(id)),
    }
}

fn existing_vote(
    conn: &Connection,
    target: VoteTarget,
    member_id: MemberId,
) -> RepoResult<Option<VoteType>> {
    let (type_label, target_id) = target_key(target);
    let value: Option<String> = conn
        .query_row(
            "SELECT vote_type
             FROM votes
             WHERE target_type = ?1
               AND target_id = ?2
               AND member_id = ?3;",
            params![type_label, target_id, member_id],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(None),
        Some(text) => parse_vote_type(&text).map(Some).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid vote type `{text}` in votes.vote_type"))
        }),
    }
}

fn adjust_counter(
    tx: &Transaction<'_>,
    target: VoteTarget,
    vote_type: VoteType,
    delta: i64,
) -> RepoResult<()> {
    let table = match target {
        VoteTarget::Post(_) => "posts",
        VoteTarget::Comment(_) => "comments",
    };
    let column = match vote_type {
        VoteType::Upvote => "upvote_count",
        VoteType::Downvote => "downvote_count",
    };
    let (_, target_id) = target_key(target);

    tx.execute(
        &format!("UPDATE {table} SET {column} = {column} + ?1 WHERE id = ?2;"),
        params![delta, target_id],
    )?;
    Ok(())
}
