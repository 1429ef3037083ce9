use serde::{Deserialize, Serialize};

use crate::models::follow::Follow;

/// Both sides are usernames. `user` defaults to the requester and is
/// overwritten by it anyway.
#[derive(Debug, Default, Deserialize)]
pub struct FollowPayload {
    pub user: Option<String>,
    pub following: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublicFollow {
    pub id: i64,
    pub user: String,
    pub following: String,
}

impl From<Follow> for PublicFollow {
    fn from(follow: Follow) -> Self {
        Self {
            id: follow.id,
            user: follow.user,
            following: follow.following,
        }
    }
}
