//! Member repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist member registration and identity lookups.
//!
//! # Invariants
//! - Nicknames are unique at the storage level.
//! - Callers validate nickname shape before persistence.

use crate::model::member::{Member, MemberId};
use crate::repo::{ensure_connection_ready, RepoResult, TableRequirement};
use rusqlite::{Connection, OptionalExtension};

const MEMBER_REQUIREMENTS: &[TableRequirement] = &[TableRequirement {
    table: "members",
    columns: &["id", "nickname", "created_at"],
}];

/// Repository interface for member identity operations.
pub trait MemberRepository {
    /// Creates one member and returns its stable id.
    fn create_member(&self, nickname: &str) -> RepoResult<MemberId>;
    /// Gets one member by id.
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    /// Gets one member by unique nickname.
    fn get_member_by_nickname(&self, nickname: &str) -> RepoResult<Option<Member>>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, MEMBER_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, nickname: &str) -> RepoResult<MemberId> {
        self.conn.execute(
            "INSERT INTO members (nickname) VALUES (?1);",
            [nickname],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                "SELECT id, nickname, created_at FROM members WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Member {
                        id: row.get("id")?,
                        nickname: row.get("nickname")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(member)
    }

    fn get_member_by_nickname(&self, nickname: &str) -> RepoResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                "SELECT id, nickname, created_at FROM members WHERE nickname = ?1;",
                [nickname],
                |row| {
                    Ok(Member {
                        id: row.get("id")?,
                        nickname: row.get("nickname")?,
                        created_at: row.get("created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(member)
    }
}
