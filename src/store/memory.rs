use std::collections::BTreeMap;

use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::models::{
    comment::{Comment, NewComment},
    follow::Follow,
    group::{Group, GroupFilter},
    post::{NewPost, Post, PostFilter},
    user::User,
};

use super::{Store, StoreError, StoreResult, Window};

struct UserRow {
    user: User,
    token: String,
}

struct PostRow {
    id: i64,
    text: String,
    pub_date: OffsetDateTime,
    author_id: i64,
    group_id: Option<i64>,
}

struct CommentRow {
    id: i64,
    text: String,
    created: OffsetDateTime,
    author_id: i64,
    post_id: i64,
}

struct FollowRow {
    id: i64,
    user_id: i64,
    following_id: i64,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<UserRow>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, PostRow>,
    comments: BTreeMap<i64, CommentRow>,
    follows: BTreeMap<i64, FollowRow>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn username(&self, id: i64) -> StoreResult<String> {
        self.users
            .iter()
            .find(|row| row.user.id == id)
            .map(|row| row.user.username.clone())
            .ok_or(StoreError::NotFound)
    }

    fn post(&self, row: &PostRow) -> StoreResult<Post> {
        Ok(Post {
            id: row.id,
            text: row.text.clone(),
            pub_date: row.pub_date,
            author_id: row.author_id,
            author: self.username(row.author_id)?,
            group_id: row.group_id,
        })
    }

    fn comment(&self, row: &CommentRow) -> StoreResult<Comment> {
        Ok(Comment {
            id: row.id,
            text: row.text.clone(),
            created: row.created,
            author_id: row.author_id,
            author: self.username(row.author_id)?,
            post_id: row.post_id,
        })
    }

    fn follow(&self, row: &FollowRow) -> StoreResult<Follow> {
        Ok(Follow {
            id: row.id,
            user_id: row.user_id,
            user: self.username(row.user_id)?,
            following_id: row.following_id,
            following: self.username(row.following_id)?,
        })
    }

    fn check_group(&self, group_id: Option<i64>) -> StoreResult<()> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }
}

/// Case-insensitive match of every term, an empty term list matches anything
fn contains_all(value: &str, terms: &[String]) -> bool {
    let value = value.to_lowercase();
    terms
        .iter()
        .all(|term| value.contains(term.to_lowercase().as_str()))
}

fn apply_window<T>(rows: Vec<T>, window: Option<Window>) -> (Vec<T>, i64) {
    let count = rows.len() as i64;
    let rows = match window {
        None => rows,
        Some(window) => rows
            .into_iter()
            .skip(window.offset.max(0) as usize)
            .take(window.limit.max(0) as usize)
            .collect(),
    };
    (rows, count)
}

/// Store kept entirely in process memory, used to drive the router in tests
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub async fn add_user(&self, username: &str, token: &str) -> User {
        let mut tables = self.tables.write().await;
        let user = User {
            id: tables.next_id(),
            username: username.to_string(),
        };
        tables.users.push(UserRow {
            user: user.clone(),
            token: token.to_string(),
        });
        user
    }

    pub async fn add_group(&self, title: &str, slug: &str, description: &str) -> Group {
        let mut tables = self.tables.write().await;
        let group = Group {
            id: tables.next_id(),
            title: title.to_string(),
            slug: slug.to_string(),
            description: description.to_string(),
        };
        tables.groups.insert(group.id, group.clone());
        group
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn user_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.token == token)
            .map(|row| row.user.clone()))
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|row| row.user.username == username)
            .map(|row| row.user.clone()))
    }

    async fn list_posts(
        &self,
        filter: &PostFilter,
        window: Option<Window>,
    ) -> StoreResult<(Vec<Post>, i64)> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&PostRow> = tables
            .posts
            .values()
            .filter(|row| filter.group_id.map_or(true, |id| row.group_id == Some(id)))
            .filter(|row| filter.pub_date.map_or(true, |date| row.pub_date == date))
            .collect();
        rows.sort_by_key(|row| (row.pub_date, row.id));
        let posts = rows
            .into_iter()
            .map(|row| tables.post(row))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(apply_window(posts, window))
    }

    async fn get_post(&self, id: i64) -> StoreResult<Option<Post>> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|row| tables.post(row)).transpose()
    }

    async fn insert_post(&self, post: NewPost) -> StoreResult<Post> {
        let mut tables = self.tables.write().await;
        tables.username(post.author_id)?;
        tables.check_group(post.group_id)?;
        let row = PostRow {
            id: tables.next_id(),
            text: post.text,
            pub_date: OffsetDateTime::now_utc(),
            author_id: post.author_id,
            group_id: post.group_id,
        };
        let post = tables.post(&row)?;
        tables.posts.insert(row.id, row);
        Ok(post)
    }

    async fn update_post(&self, id: i64, text: &str, group_id: Option<i64>) -> StoreResult<Post> {
        let mut tables = self.tables.write().await;
        tables.check_group(group_id)?;
        let row = tables.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        row.text = text.to_string();
        row.group_id = group_id;
        let tables = &*tables;
        tables.post(&tables.posts[&id])
    }

    async fn delete_post(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(StoreError::NotFound)?;
        tables.comments.retain(|_, row| row.post_id != id);
        Ok(())
    }

    async fn list_groups(
        &self,
        filter: &GroupFilter,
        window: Option<Window>,
    ) -> StoreResult<(Vec<Group>, i64)> {
        let tables = self.tables.read().await;
        let groups = tables
            .groups
            .values()
            .filter(|group| filter.title.as_deref().map_or(true, |title| group.title == title))
            .filter(|group| contains_all(&group.title, &filter.search))
            .cloned()
            .collect();
        Ok(apply_window(groups, window))
    }

    async fn get_group(&self, id: i64) -> StoreResult<Option<Group>> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn list_comments(&self, post_id: i64) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        tables
            .comments
            .values()
            .filter(|row| row.post_id == post_id)
            .map(|row| tables.comment(row))
            .collect()
    }

    async fn get_comment(&self, post_id: i64, id: i64) -> StoreResult<Option<Comment>> {
        let tables = self.tables.read().await;
        tables
            .comments
            .get(&id)
            .filter(|row| row.post_id == post_id)
            .map(|row| tables.comment(row))
            .transpose()
    }

    async fn insert_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        tables.username(comment.author_id)?;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(StoreError::NotFound);
        }
        let row = CommentRow {
            id: tables.next_id(),
            text: comment.text,
            created: OffsetDateTime::now_utc(),
            author_id: comment.author_id,
            post_id: comment.post_id,
        };
        let comment = tables.comment(&row)?;
        tables.comments.insert(row.id, row);
        Ok(comment)
    }

    async fn update_comment(&self, id: i64, text: &str) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        let row = tables.comments.get_mut(&id).ok_or(StoreError::NotFound)?;
        row.text = text.to_string();
        let tables = &*tables;
        tables.comment(&tables.comments[&id])
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn list_follows(&self, user_id: i64, search: &[String]) -> StoreResult<Vec<Follow>> {
        let tables = self.tables.read().await;
        let follows = tables
            .follows
            .values()
            .filter(|row| row.user_id == user_id)
            .map(|row| tables.follow(row))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(follows
            .into_iter()
            .filter(|follow| contains_all(&follow.following, search))
            .collect())
    }

    async fn follow_exists(&self, user_id: i64, following_id: i64) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .values()
            .any(|row| row.user_id == user_id && row.following_id == following_id))
    }

    async fn insert_follow(&self, user_id: i64, following_id: i64) -> StoreResult<Follow> {
        let mut tables = self.tables.write().await;
        if tables
            .follows
            .values()
            .any(|row| row.user_id == user_id && row.following_id == following_id)
        {
            return Err(StoreError::UniqueViolation);
        }
        let row = FollowRow {
            id: tables.next_id(),
            user_id,
            following_id,
        };
        let follow = tables.follow(&row)?;
        tables.follows.insert(row.id, row);
        Ok(follow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deleting_a_post_drops_its_comments() {
        let store = MemoryStore::default();
        let author = store.add_user("leo", "leo-token").await;
        let post = store
            .insert_post(NewPost {
                author_id: author.id,
                text: "hello".to_string(),
                group_id: None,
            })
            .await
            .unwrap();
        store
            .insert_comment(NewComment {
                author_id: author.id,
                post_id: post.id,
                text: "first".to_string(),
            })
            .await
            .unwrap();

        store.delete_post(post.id).await.unwrap();

        assert!(store.list_comments(post.id).await.unwrap().is_empty());
        assert!(matches!(
            store.delete_post(post.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_follow_is_a_unique_violation() {
        let store = MemoryStore::default();
        let leo = store.add_user("leo", "leo-token").await;
        let tom = store.add_user("tom", "tom-token").await;

        let follow = store.insert_follow(leo.id, tom.id).await.unwrap();
        assert_eq!(follow.user, "leo");
        assert_eq!(follow.following, "tom");

        assert!(matches!(
            store.insert_follow(leo.id, tom.id).await,
            Err(StoreError::UniqueViolation)
        ));
        assert_eq!(store.list_follows(leo.id, &[]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn windowed_listing_reports_total_count() {
        let store = MemoryStore::default();
        for title in ["cats", "dogs", "Cat owners"] {
            store.add_group(title, &title.replace(' ', "-"), "").await;
        }

        let filter = GroupFilter {
            title: None,
            search: vec!["CAT".to_string()],
        };
        let (groups, count) = store
            .list_groups(&filter, Some(Window { limit: 1, offset: 1 }))
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "Cat owners");
    }
}
