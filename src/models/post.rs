use time::OffsetDateTime;

/// A post joined with the username of its author
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: OffsetDateTime,
    pub author_id: i64,
    pub author: String,
    pub group_id: Option<i64>,
}

pub struct NewPost {
    pub author_id: i64,
    pub text: String,
    pub group_id: Option<i64>,
}

#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub group_id: Option<i64>,
    pub pub_date: Option<OffsetDateTime>,
}
