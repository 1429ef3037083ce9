use axum::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::models::{
    comment::{Comment, NewComment},
    follow::Follow,
    group::{Group, GroupFilter},
    post::{NewPost, Post, PostFilter},
    user::User,
};

use super::{Store, StoreError, StoreResult, Window};

const POST_COLUMNS: &str = "p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.group_id";
const COMMENT_COLUMNS: &str =
    "c.id, c.text, c.created, c.author_id, u.username AS author, c.post_id";
const FOLLOW_COLUMNS: &str =
    r#"fo.id, fo.user_id, u.username AS "user", fo.following_id, f.username AS following"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build an ILIKE pattern matching `search` anywhere, with wildcards escaped
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
            warn!("Unique violation : {db_error}");
            StoreError::UniqueViolation
        }
        e => StoreError::Database(e),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        window: Option<Window>,
    ) -> StoreResult<(Vec<Post>, i64)> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id \
             WHERE ($1::BIGINT IS NULL OR p.group_id = $1) \
             AND ($2::TIMESTAMPTZ IS NULL OR p.pub_date = $2) \
             ORDER BY p.pub_date, p.id LIMIT $3 OFFSET $4"
        ))
        .bind(filter.group_id)
        .bind(filter.pub_date)
        .bind(window.map(|w| w.limit))
        .bind(window.map_or(0, |w| w.offset))
        .fetch_all(&self.pool)
        .await?;

        let count = match window {
            None => posts.len() as i64,
            Some(_) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM posts p \
                     WHERE ($1::BIGINT IS NULL OR p.group_id = $1) \
                     AND ($2::TIMESTAMPTZ IS NULL OR p.pub_date = $2)",
                )
                .bind(filter.group_id)
                .bind(filter.pub_date)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok((posts, count))
    }

    async fn get_post(&self, id: i64) -> StoreResult<Option<Post>> {
        Ok(sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_post(&self, post: NewPost) -> StoreResult<Post> {
        Ok(sqlx::query_as::<_, Post>(&format!(
            "WITH changed AS ( \
                INSERT INTO posts (author_id, text, group_id) VALUES ($1, $2, $3) RETURNING * \
             ) SELECT {POST_COLUMNS} FROM changed p JOIN users u ON u.id = p.author_id"
        ))
        .bind(post.author_id)
        .bind(post.text)
        .bind(post.group_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_post(&self, id: i64, text: &str, group_id: Option<i64>) -> StoreResult<Post> {
        sqlx::query_as::<_, Post>(&format!(
            "WITH changed AS ( \
                UPDATE posts SET text = $2, group_id = $3 WHERE id = $1 RETURNING * \
             ) SELECT {POST_COLUMNS} FROM changed p JOIN users u ON u.id = p.author_id"
        ))
        .bind(id)
        .bind(text)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_post(&self, id: i64) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_groups(
        &self,
        filter: &GroupFilter,
        window: Option<Window>,
    ) -> StoreResult<(Vec<Group>, i64)> {
        let search: Vec<String> = filter.search.iter().map(|term| like_pattern(term)).collect();

        let groups = sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups \
             WHERE ($1::TEXT IS NULL OR title = $1) \
             AND title ILIKE ALL($2::TEXT[]) \
             ORDER BY id LIMIT $3 OFFSET $4",
        )
        .bind(filter.title.as_deref())
        .bind(&search)
        .bind(window.map(|w| w.limit))
        .bind(window.map_or(0, |w| w.offset))
        .fetch_all(&self.pool)
        .await?;

        let count = match window {
            None => groups.len() as i64,
            Some(_) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM groups \
                     WHERE ($1::TEXT IS NULL OR title = $1) \
                     AND title ILIKE ALL($2::TEXT[])",
                )
                .bind(filter.title.as_deref())
                .bind(&search)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok((groups, count))
    }

    async fn get_group(&self, id: i64) -> StoreResult<Option<Group>> {
        Ok(sqlx::query_as::<_, Group>(
            "SELECT id, title, slug, description FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_comments(&self, post_id: i64) -> StoreResult<Vec<Comment>> {
        Ok(sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 ORDER BY c.created, c.id"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_comment(&self, post_id: i64, id: i64) -> StoreResult<Option<Comment>> {
        Ok(sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 AND c.id = $2"
        ))
        .bind(post_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        Ok(sqlx::query_as::<_, Comment>(&format!(
            "WITH changed AS ( \
                INSERT INTO comments (author_id, post_id, text) VALUES ($1, $2, $3) RETURNING * \
             ) SELECT {COMMENT_COLUMNS} FROM changed c JOIN users u ON u.id = c.author_id"
        ))
        .bind(comment.author_id)
        .bind(comment.post_id)
        .bind(comment.text)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_comment(&self, id: i64, text: &str) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>(&format!(
            "WITH changed AS ( \
                UPDATE comments SET text = $2 WHERE id = $1 RETURNING * \
             ) SELECT {COMMENT_COLUMNS} FROM changed c JOIN users u ON u.id = c.author_id"
        ))
        .bind(id)
        .bind(text)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<()> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_follows(&self, user_id: i64, search: &[String]) -> StoreResult<Vec<Follow>> {
        let search: Vec<String> = search.iter().map(|term| like_pattern(term)).collect();
        Ok(sqlx::query_as::<_, Follow>(&format!(
            "SELECT {FOLLOW_COLUMNS} FROM follows fo \
             JOIN users u ON u.id = fo.user_id \
             JOIN users f ON f.id = fo.following_id \
             WHERE fo.user_id = $1 AND f.username ILIKE ALL($2::TEXT[]) \
             ORDER BY fo.id"
        ))
        .bind(user_id)
        .bind(&search)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn follow_exists(&self, user_id: i64, following_id: i64) -> StoreResult<bool> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND following_id = $2)",
        )
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn insert_follow(&self, user_id: i64, following_id: i64) -> StoreResult<Follow> {
        sqlx::query_as::<_, Follow>(&format!(
            "WITH fo AS ( \
                INSERT INTO follows (user_id, following_id) VALUES ($1, $2) \
                RETURNING id, user_id, following_id \
             ) SELECT {FOLLOW_COLUMNS} FROM fo \
             JOIN users u ON u.id = fo.user_id \
             JOIN users f ON f.id = fo.following_id"
        ))
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }
}
