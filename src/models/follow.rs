/// Directed edge `user -> following`, with both usernames resolved
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub user: String,
    pub following_id: i64,
    pub following: String,
}
