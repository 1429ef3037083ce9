use serde::Serialize;

use crate::models::group::Group;

#[derive(Debug, Serialize)]
pub struct PublicGroup {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl From<Group> for PublicGroup {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}
