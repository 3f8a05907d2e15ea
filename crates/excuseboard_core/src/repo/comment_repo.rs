//! Comment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist comments scoped to one post.
//! - Produce decorated comment read models in a single batched query.
//!
//! # Invariants
//! - Comment creation verifies the post is active and the member exists
//!   inside the same transaction.
//! - Viewer decoration joins only the viewer's own vote row.
//! - Comment lists are ordered `created_at ASC, id ASC` (conversation order).

use crate::model::comment::{CommentId, CommentRecord, NewComment};
use crate::model::member::{MemberId, MemberSummary};
use crate::model::post::PostId;
use crate::repo::{
    ensure_connection_ready, member_exists, parse_optional_vote_type, RepoError, RepoResult,
    TableRequirement,
};
use rusqlite::{params, Connection, Row, TransactionBehavior};

const COMMENT_REQUIREMENTS: &[TableRequirement] = &[
    TableRequirement {
        table: "comments",
        columns: &[
            "id",
            "post_id",
            "member_id",
            "content",
            "is_reply",
            "upvote_count",
            "downvote_count",
            "created_at",
            "modified_at",
        ],
    },
    TableRequirement {
        table: "votes",
        columns: &["target_type", "target_id", "member_id", "vote_type"],
    },
];

const COMMENT_RECORD_SQL: &str = "SELECT
    c.id AS comment_id,
    c.post_id AS post_id,
    c.member_id AS member_id,
    m.nickname AS nickname,
    c.content AS content,
    c.is_reply AS is_reply,
    c.upvote_count AS upvote_count,
    c.downvote_count AS downvote_count,
    v.vote_type AS my_vote,
    c.created_at AS created_at,
    c.modified_at AS modified_at
FROM comments c
INNER JOIN members m ON m.id = c.member_id
LEFT JOIN votes v
    ON v.target_type = 'comment'
   AND v.target_id = c.id
   AND v.member_id = ?1";

/// Query options for the comment list use-case.
#[derive(Debug, Clone, Copy)]
pub struct CommentListQuery {
    pub post_id: PostId,
    /// Viewer whose own vote decorates each record; `None` for anonymous.
    pub viewer: Option<MemberId>,
    pub limit: u32,
    pub offset: u32,
}

/// Repository interface for comment operations.
pub trait CommentRepository {
    /// Creates one comment after verifying post and member.
    fn create_comment(&mut self, new_comment: &NewComment) -> RepoResult<CommentId>;
    /// Gets one comment decorated with the viewer's own vote.
    fn get_comment(
        &self,
        id: CommentId,
        viewer: Option<MemberId>,
    ) -> RepoResult<Option<CommentRecord>>;
    /// Lists one post's comments in conversation order, decorated for the viewer.
    fn list_comments(&self, query: &CommentListQuery) -> RepoResult<Vec<CommentRecord>>;
    /// Counts one post's comments, for page math.
    fn count_comments(&self, post_id: PostId) -> RepoResult<u64>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, COMMENT_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(&mut self, new_comment: &NewComment) -> RepoResult<CommentId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !active_post_exists(&tx, new_comment.post_id)? {
            return Err(RepoError::PostNotFound(new_comment.post_id));
        }
        if !member_exists(&tx, new_comment.member_id)? {
            return Err(RepoError::MemberNotFound(new_comment.member_id));
        }

        tx.execute(
            "INSERT INTO comments (post_id, member_id, content, is_reply)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                new_comment.post_id,
                new_comment.member_id,
                new_comment.content.as_str(),
                new_comment.is_reply as i64,
            ],
        )?;
        let comment_id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(comment_id)
    }

    fn get_comment(
        &self,
        id: CommentId,
        viewer: Option<MemberId>,
    ) -> RepoResult<Option<CommentRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMMENT_RECORD_SQL} WHERE c.id = ?2;"))?;

        let mut rows = stmt.query(params![viewer, id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comment_row(row)?));
        }

        Ok(None)
    }

    fn list_comments(&self, query: &CommentListQuery) -> RepoResult<Vec<CommentRecord>> {
        if !active_post_exists(self.conn, query.post_id)? {
            return Err(RepoError::PostNotFound(query.post_id));
        }

        let mut stmt = self.conn.prepare(&format!(
            "{COMMENT_RECORD_SQL}
             WHERE c.post_id = ?2
             ORDER BY c.created_at ASC, c.id ASC
             LIMIT ?3 OFFSET ?4;"
        ))?;

        let mut rows = stmt.query(params![query.viewer, query.post_id, query.limit, query.offset])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }

        Ok(comments)
    }

    fn count_comments(&self, post_id: PostId) -> RepoResult<u64> {
        if !active_post_exists(self.conn, post_id)? {
            return Err(RepoError::PostNotFound(post_id));
        }

        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE post_id = ?1;",
            [post_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<CommentRecord> {
    let is_reply = match row.get::<_, i64>("is_reply")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_reply value `{other}` in comments.is_reply"
            )));
        }
    };

    let my_vote = parse_optional_vote_type(row.get::<_, Option<String>>("my_vote")?)?;

    Ok(CommentRecord {
        comment_id: row.get("comment_id")?,
        post_id: row.get("post_id")?,
        author: MemberSummary {
            member_id: row.get("member_id")?,
            nickname: row.get("nickname")?,
        },
        content: row.get("content")?,
        is_reply,
        upvote_count: row.get("upvote_count")?,
        downvote_count: row.get("downvote_count")?,
        my_vote,
        created_at: row.get("created_at")?,
        modified_at: row.get("modified_at")?,
    })
}

pub(crate) fn active_post_exists(conn: &Connection, post_id: PostId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM posts
            WHERE id = ?1
              AND status = 'active'
        );",
        [post_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
