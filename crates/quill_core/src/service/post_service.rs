//! Post use-case service.
//!
//! # Responsibility
//! - Provide create/edit/list/delete entry points for posts.
//! - Apply partial edits field by field through the model setters.
//!
//! # Invariants
//! - An edit is all-or-nothing: the first rejected field aborts it before
//!   anything is written.

use crate::model::post::{Category, NewPost, Post, PostId};
use crate::repo::post_repo::{PostListQuery, PostRepository};
use crate::repo::POST_ENTITY;
use crate::service::{log_outcome, ServiceError, ServiceResult};

/// Partial post edit. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub category: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.summary.is_none()
            && self.category.is_none()
    }
}

/// Use-case service wrapper for post operations.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates, persists and reads back a new post.
    pub fn create_post(&self, input: NewPost) -> ServiceResult<Post> {
        let result = self.insert(input);
        log_outcome(
            "post_create",
            result.as_ref().ok().and_then(Post::id),
            &result,
        );
        result
    }

    pub fn get_post(&self, id: PostId) -> ServiceResult<Option<Post>> {
        Ok(self.repo.get_post(id)?)
    }

    /// Lists posts, optionally restricted to one category.
    pub fn list_posts(&self, category: Option<Category>) -> ServiceResult<Vec<Post>> {
        Ok(self.repo.list_posts(&PostListQuery { category })?)
    }

    /// Applies `patch` in title, content, summary, category order.
    ///
    /// An empty patch is a no-op read.
    pub fn update_post(&self, id: PostId, patch: PostPatch) -> ServiceResult<Post> {
        let result = self.apply_patch(id, patch);
        log_outcome("post_update", Some(id), &result);
        result
    }

    pub fn delete_post(&self, id: PostId) -> ServiceResult<()> {
        let result = self.repo.delete_post(id).map_err(ServiceError::from);
        log_outcome("post_delete", Some(id), &result);
        result
    }

    fn insert(&self, input: NewPost) -> ServiceResult<Post> {
        let post = Post::new(input)?;
        let id = self.repo.create_post(&post)?;
        self.read_back(id, "post missing after create")
    }

    fn apply_patch(&self, id: PostId, patch: PostPatch) -> ServiceResult<Post> {
        let mut post = self.repo.get_post(id)?.ok_or(ServiceError::NotFound {
            entity: POST_ENTITY,
            id,
        })?;
        if patch.is_empty() {
            return Ok(post);
        }

        if let Some(title) = patch.title {
            post.set_title(title)?;
        }
        if let Some(content) = patch.content {
            post.set_content(content)?;
        }
        if let Some(summary) = patch.summary {
            post.set_summary(summary)?;
        }
        if let Some(category) = patch.category {
            post.set_category(&category)?;
        }

        self.repo.update_post(&post)?;
        self.read_back(id, "post missing after update")
    }

    fn read_back(&self, id: PostId, details: &'static str) -> ServiceResult<Post> {
        self.repo
            .get_post(id)?
            .ok_or(ServiceError::InconsistentState(details))
    }
}
