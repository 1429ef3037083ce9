#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Query filters accepted by the group listing.
#[derive(Debug, Default, Clone)]
pub struct GroupFilter {
    /// Exact title match
    pub title: Option<String>,
    /// Case-insensitive substrings that must all appear in the title
    pub search: Vec<String>,
}
