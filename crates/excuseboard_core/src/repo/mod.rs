//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`PostNotFound`, `AlreadyVoted`)
//!   in addition to DB transport errors.
//! - Implementations verify connection readiness at construction time.

use crate::db::{migrations, DbError};
use crate::model::comment::CommentId;
use crate::model::member::MemberId;
use crate::model::post::{PostId, PostStatus};
use crate::model::vote::VoteType;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment_repo;
pub mod member_repo;
pub mod post_repo;
pub mod vote_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for excuse board persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    PostNotFound(PostId),
    CommentNotFound(CommentId),
    MemberNotFound(MemberId),
    /// The member already voted the other direction on this target.
    AlreadyVoted(VoteType),
    /// Self-vote blocked by the active vote policy.
    SelfVoteNotAllowed,
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::CommentNotFound(id) => write!(f, "comment not found: {id}"),
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::AlreadyVoted(existing) => write!(
                f,
                "already voted {existing:?}; cancel the existing vote before switching"
            ),
            Self::SelfVoteNotAllowed => write!(f, "voting on own content is not allowed"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is not migrated (expected {expected_version})"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Table/column shape one repository depends on.
pub(crate) struct TableRequirement {
    pub table: &'static str,
    pub columns: &'static [&'static str],
}

/// Verifies a connection is migrated and carries the required schema shape.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    requirements: &[TableRequirement],
) -> RepoResult<()> {
    let actual_version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    if actual_version == 0 {
        return Err(RepoError::UninitializedConnection {
            expected_version: migrations::latest_version(),
            actual_version,
        });
    }

    for requirement in requirements {
        if !table_exists(conn, requirement.table)? {
            return Err(RepoError::MissingRequiredTable(requirement.table));
        }
        for column in requirement.columns {
            if !table_has_column(conn, requirement.table, column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: requirement.table,
                    column,
                });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

pub(crate) fn vote_type_to_db(vote_type: VoteType) -> &'static str {
    match vote_type {
        VoteType::Upvote => "upvote",
        VoteType::Downvote => "downvote",
    }
}

pub(crate) fn parse_vote_type(value: &str) -> Option<VoteType> {
    match value {
        "upvote" => Some(VoteType::Upvote),
        "downvote" => Some(VoteType::Downvote),
        _ => None,
    }
}

pub(crate) fn parse_optional_vote_type(value: Option<String>) -> RepoResult<Option<VoteType>> {
    match value {
        None => Ok(None),
        Some(text) => parse_vote_type(&text)
            .map(Some)
            .ok_or_else(|| {
                RepoError::InvalidData(format!("invalid vote type `{text}` in votes.vote_type"))
            }),
    }
}

pub(crate) fn post_status_to_db(status: PostStatus) -> &'static str {
    match status {
        PostStatus::Active => "active",
        PostStatus::Deleted => "deleted",
    }
}

pub(crate) fn parse_post_status(value: &str) -> Option<PostStatus> {
    match value {
        "active" => Some(PostStatus::Active),
        "deleted" => Some(PostStatus::Deleted),
        _ => None,
    }
}

pub(crate) fn member_exists(conn: &Connection, member_id: MemberId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM members WHERE id = ?1);",
        [member_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
