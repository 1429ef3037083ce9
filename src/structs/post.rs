use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::post::Post;

/// Body of `POST`, `PUT` and `PATCH` on posts. Any `author`, `id` or
/// `pub_date` sent by the client is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PostPayload {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub group: Option<Option<i64>>,
}

#[derive(Debug, Serialize)]
pub struct PublicPost {
    pub id: i64,
    pub author: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub pub_date: OffsetDateTime,
    pub group: Option<i64>,
}

impl From<Post> for PublicPost {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author: post.author,
            text: post.text,
            pub_date: post.pub_date,
            group: post.group_id,
        }
    }
}
