//! Comment use-case service.
//!
//! # Responsibility
//! - Create comments on active posts.
//! - Produce decorated, paginated comment list views for a given viewer.
//!
//! # Invariants
//! - Content validation runs before persistence.
//! - Comment lists keep conversation order (`created_at ASC, id ASC`).

use crate::model::comment::{CommentRecord, NewComment};
use crate::model::member::MemberId;
use crate::model::page::{Page, PageRequest};
use crate::model::post::PostId;
use crate::repo::comment_repo::{CommentListQuery, CommentRepository};
use crate::service::validation::validate_comment_content;
use crate::service::ServiceError;
use log::info;

/// Comment service facade over repository implementations.
pub struct CommentService<R: CommentRepository> {
    repo: R,
}

impl<R: CommentRepository> CommentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one comment on an active post.
    pub fn create_comment(
        &mut self,
        post_id: PostId,
        member_id: MemberId,
        content: impl Into<String>,
        is_reply: bool,
    ) -> Result<CommentRecord, ServiceError> {
        let content = content.into();
        validate_comment_content(&content)?;

        let comment_id = self.repo.create_comment(&NewComment {
            post_id,
            member_id,
            content,
            is_reply,
        })?;
        info!(
            "event=comment_create module=comment status=ok comment_id={comment_id} post_id={post_id} member_id={member_id}"
        );

        self.repo
            .get_comment(comment_id, Some(member_id))?
            .ok_or(ServiceError::InconsistentState(
                "created comment not found in read-back",
            ))
    }

    /// Lists one post's comments as one decorated page.
    pub fn list_comments(
        &self,
        post_id: PostId,
        request: &PageRequest,
        viewer: Option<MemberId>,
    ) -> Result<Page<CommentRecord>, ServiceError> {
        let normalized = request.normalized();
        let items = self.repo.list_comments(&CommentListQuery {
            post_id,
            viewer,
            limit: normalized.size,
            offset: normalized.offset(),
        })?;
        let total = self.repo.count_comments(post_id)?;
        Ok(Page::new(items, &normalized, total))
    }
}
