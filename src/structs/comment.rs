use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::comment::Comment;

/// Only `text` is writable, `author` and `post` come from the request
#[derive(Debug, Default, Deserialize)]
pub struct CommentPayload {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicComment {
    pub id: i64,
    pub author: String,
    pub post: i64,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

impl From<Comment> for PublicComment {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author,
            post: comment.post_id,
            text: comment.text,
            created: comment.created,
        }
    }
}
