#[cfg(test)]
pub mod memory;
pub mod postgres;

use axum::async_trait;
use thiserror::Error;

use crate::models::{
    comment::{Comment, NewComment},
    follow::Follow,
    group::{Group, GroupFilter},
    post::{NewPost, Post, PostFilter},
    user::User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Slice of a listing, applied after filtering and ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

/// Persistence operations used by the routes.
///
/// Listing methods that accept a [`Window`] return the page together with
/// the total number of rows matching the filter.
#[async_trait]
pub trait Store: Send + Sync {
    async fn user_by_token(&self, token: &str) -> StoreResult<Option<User>>;
    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn list_posts(
        &self,
        filter: &PostFilter,
        window: Option<Window>,
    ) -> StoreResult<(Vec<Post>, i64)>;
    async fn get_post(&self, id: i64) -> StoreResult<Option<Post>>;
    async fn insert_post(&self, post: NewPost) -> StoreResult<Post>;
    async fn update_post(&self, id: i64, text: &str, group_id: Option<i64>) -> StoreResult<Post>;
    /// Also removes the comments of the post
    async fn delete_post(&self, id: i64) -> StoreResult<()>;

    async fn list_groups(
        &self,
        filter: &GroupFilter,
        window: Option<Window>,
    ) -> StoreResult<(Vec<Group>, i64)>;
    async fn get_group(&self, id: i64) -> StoreResult<Option<Group>>;

    async fn list_comments(&self, post_id: i64) -> StoreResult<Vec<Comment>>;
    async fn get_comment(&self, post_id: i64, id: i64) -> StoreResult<Option<Comment>>;
    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment>;
    async fn update_comment(&self, id: i64, text: &str) -> StoreResult<Comment>;
    async fn delete_comment(&self, id: i64) -> StoreResult<()>;

    /// Outgoing edges of `user_id`, narrowed to followees whose username
    /// contains every `search` term (case-insensitive)
    async fn list_follows(&self, user_id: i64, search: &[String]) -> StoreResult<Vec<Follow>>;
    async fn follow_exists(&self, user_id: i64, following_id: i64) -> StoreResult<bool>;
    /// Fails with [`StoreError::UniqueViolation`] when the edge already exists
    async fn insert_follow(&self, user_id: i64, following_id: i64) -> StoreResult<Follow>;
}
