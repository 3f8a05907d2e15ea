//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the post aggregate (post + owned excuse + tag links) atomically.
//! - Produce decorated post read models in a single batched query.
//!
//! # Invariants
//! - All read paths are constrained to `status = 'active'`.
//! - Viewer decoration joins only the viewer's own vote row; an anonymous
//!   viewer binds NULL and the join matches nothing.
//! - Post deletion flips status inside the same guard as the lookup.

use crate::model::member::{MemberId, MemberSummary};
use crate::model::post::{NewPost, PostId, PostRecord};
use crate::repo::{
    ensure_connection_ready, member_exists, parse_optional_vote_type, parse_post_status,
    RepoError, RepoResult, TableRequirement,
};
use rusqlite::{params, Connection, Row, TransactionBehavior};

const POST_REQUIREMENTS: &[TableRequirement] = &[
    TableRequirement {
        table: "posts",
        columns: &[
            "id",
            "member_id",
            "excuse_id",
            "status",
            "upvote_count",
            "downvote_count",
            "created_at",
            "modified_at",
        ],
    },
    TableRequirement {
        table: "excuses",
        columns: &["id", "situation", "excuse"],
    },
    TableRequirement {
        table: "tags",
        columns: &["id", "name"],
    },
    TableRequirement {
        table: "excuse_tags",
        columns: &["excuse_id", "tag_id"],
    },
    TableRequirement {
        table: "votes",
        columns: &["target_type", "target_id", "member_id", "vote_type"],
    },
];

const POST_RECORD_SQL: &str = "SELECT
    p.id AS post_id,
    p.excuse_id AS excuse_id,
    p.member_id AS member_id,
    m.nickname AS nickname,
    e.situation AS situation,
    e.excuse AS excuse,
    p.status AS status,
    p.upvote_count AS upvote_count,
    p.downvote_count AS downvote_count,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
    v.vote_type AS my_vote,
    p.created_at AS created_at,
    p.modified_at AS modified_at
FROM posts p
INNER JOIN members m ON m.id = p.member_id
INNER JOIN excuses e ON e.id = p.excuse_id
LEFT JOIN votes v
    ON v.target_type = 'post'
   AND v.target_id = p.id
   AND v.member_id = ?1";

/// Query options for the post list use-case.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostListQuery {
    /// Viewer whose own vote decorates each record; `None` for anonymous.
    pub viewer: Option<MemberId>,
    pub limit: u32,
    pub offset: u32,
}

/// Repository interface for post aggregate operations.
pub trait PostRepository {
    /// Creates post, owned excuse and tag links in one transaction.
    fn create_post(&mut self, new_post: &NewPost) -> RepoResult<PostId>;
    /// Gets one active post decorated with the viewer's own vote.
    fn get_post(&self, id: PostId, viewer: Option<MemberId>) -> RepoResult<Option<PostRecord>>;
    /// Lists active posts newest-first, each decorated for the viewer.
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<PostRecord>>;
    /// Counts active posts, for page math.
    fn count_active_posts(&self) -> RepoResult<u64>;
    /// Flips an active post to deleted status.
    fn delete_post(&mut self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, POST_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&mut self, new_post: &NewPost) -> RepoResult<PostId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if !member_exists(&tx, new_post.member_id)? {
            return Err(RepoError::MemberNotFound(new_post.member_id));
        }

        tx.execute(
            "INSERT INTO excuses (situation, excuse) VALUES (?1, ?2);",
            params![
                new_post.excuse.situation.as_str(),
                new_post.excuse.excuse.as_str()
            ],
        )?;
        let excuse_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO posts (member_id, excuse_id) VALUES (?1, ?2);",
            params![new_post.member_id, excuse_id],
        )?;
        let post_id = tx.last_insert_rowid();

        for tag in &new_post.excuse.tags {
            tx.execute(
                "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
                [tag.as_str()],
            )?;
            tx.execute(
                "INSERT INTO excuse_tags (excuse_id, tag_id)
                 SELECT ?1, id FROM tags WHERE name = ?2;",
                params![excuse_id, tag.as_str()],
            )?;
        }

        tx.commit()?;
        Ok(post_id)
    }

    fn get_post(&self, id: PostId, viewer: Option<MemberId>) -> RepoResult<Option<PostRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POST_RECORD_SQL}
             WHERE p.id = ?2
               AND p.status = 'active';"
        ))?;

        let mut rows = stmt.query(params![viewer, id])?;
        if let Some(row) = rows.next()? {
            let excuse_id: i64 = row.get("excuse_id")?;
            let tags = load_tags_for_excuse(self.conn, excuse_id)?;
            return Ok(Some(parse_post_row(row, tags)?));
        }

        Ok(None)
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<PostRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{POST_RECORD_SQL}
             WHERE p.status = 'active'
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT ?2 OFFSET ?3;"
        ))?;

        let mut rows = stmt.query(params![query.viewer, query.limit, query.offset])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            let excuse_id: i64 = row.get("excuse_id")?;
            let tags = load_tags_for_excuse(self.conn, excuse_id)?;
            posts.push(parse_post_row(row, tags)?);
        }

        Ok(posts)
    }

    fn count_active_posts(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM posts WHERE status = 'active';",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn delete_post(&mut self, id: PostId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE posts
             SET
                status = 'deleted',
                modified_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND status = 'active';",
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::PostNotFound(id));
        }

        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>, tags: Vec<String>) -> RepoResult<PostRecord> {
    let status_text: String = row.get("status")?;
    let status = parse_post_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid post status `{status_text}` in posts.status"))
    })?;

    let my_vote = parse_optional_vote_type(row.get::<_, Option<String>>("my_vote")?)?;

    Ok(PostRecord {
        post_id: row.get("post_id")?,
        author: MemberSummary {
            member_id: row.get("member_id")?,
            nickname: row.get("nickname")?,
        },
        situation: row.get("situation")?,
        excuse: row.get("excuse")?,
        tags,
        status,
        upvote_count: row.get("upvote_count")?,
        downvote_count: row.get("downvote_count")?,
        comment_count: row.get("comment_count")?,
        my_vote,
        created_at: row.get("created_at")?,
        modified_at: row.get("modified_at")?,
    })
}

fn load_tags_for_excuse(conn: &Connection, excuse_id: i64) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM excuse_tags et
         INNER JOIN tags t ON t.id = et.tag_id
         WHERE et.excuse_id = ?1
         ORDER BY t.name ASC;",
    )?;
    let mut rows = stmt.query([excuse_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get::<_, String>(0)?);
    }
    Ok(tags)
}
