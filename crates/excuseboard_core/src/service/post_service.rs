//! Post use-case service.
//!
//! # Responsibility
//! - Create posts from (member, situation, excuse, tags) input.
//! - Produce decorated, paginated post list views for a given viewer.
//!
//! # Invariants
//! - Situation/excuse validation runs before persistence.
//! - List order is `created_at DESC, id DESC` (newest first).
//! - Each record carries only the requesting viewer's own vote.

use crate::model::member::MemberId;
use crate::model::page::{Page, PageRequest};
use crate::model::post::{clean_tags, Excuse, NewPost, PostId, PostRecord};
use crate::repo::post_repo::{PostListQuery, PostRepository};
use crate::service::validation::{validate_excuse, validate_situation};
use crate::service::ServiceError;
use log::info;

/// Post service facade over repository implementations.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one post together with its owned excuse and tag set.
    ///
    /// The whole aggregate persists in one transaction; the returned record
    /// is the decorated read-back as the author would see it.
    pub fn create_post(
        &mut self,
        member_id: MemberId,
        situation: impl Into<String>,
        excuse: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<PostRecord, ServiceError> {
        let situation = situation.into();
        let excuse = excuse.into();
        validate_situation(&situation)?;
        validate_excuse(&excuse)?;

        let new_post = NewPost {
            member_id,
            excuse: Excuse {
                situation,
                excuse,
                tags: clean_tags(&tags),
            },
        };

        let post_id = self.repo.create_post(&new_post)?;
        info!("event=post_create module=post status=ok post_id={post_id} member_id={member_id}");

        self.repo
            .get_post(post_id, Some(member_id))?
            .ok_or(ServiceError::InconsistentState(
                "created post not found in read-back",
            ))
    }

    /// Gets one active post decorated with the viewer's own vote.
    pub fn get_post(
        &self,
        post_id: PostId,
        viewer: Option<MemberId>,
    ) -> Result<Option<PostRecord>, ServiceError> {
        Ok(self.repo.get_post(post_id, viewer)?)
    }

    /// Lists active posts newest-first as one decorated page.
    pub fn list_posts(
        &self,
        request: &PageRequest,
        viewer: Option<MemberId>,
    ) -> Result<Page<PostRecord>, ServiceError> {
        let normalized = request.normalized();
        let items = self.repo.list_posts(&PostListQuery {
            viewer,
            limit: normalized.size,
            offset: normalized.offset(),
        })?;
        let total = self.repo.count_active_posts()?;
        Ok(Page::new(items, &normalized, total))
    }

    /// Soft-deletes one active post.
    pub fn delete_post(&mut self, post_id: PostId) -> Result<(), ServiceError> {
        self.repo.delete_post(post_id)?;
        info!("event=post_delete module=post status=ok post_id={post_id}");
        Ok(())
    }
}
