use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use hyper::StatusCode;
use tracing::info;

use crate::{
    extractors::{auth_extractor::AuthUser, json_extractor::JsonBody},
    models::{comment::NewComment, user::User},
    store::Store,
    structs::comment::{CommentPayload, PublicComment},
    utils::{
        app_error::AppError,
        comment::check_comment_data,
        permission::{check_owner, require_auth},
    },
};

use super::parse_id;

/// Comments of an unknown post are simply an empty list
pub async fn list_comments_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(_): AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<PublicComment>>, AppError> {
    let comments = store.list_comments(parse_id(&post_id)?).await?;
    Ok(Json(comments.into_iter().map(PublicComment::from).collect()))
}

/// `author` and `post` always come from the requester and the path
pub async fn create_comment_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<String>,
    JsonBody(payload): JsonBody<CommentPayload>,
) -> Result<(StatusCode, Json<PublicComment>), AppError> {
    let auth_user = require_auth(auth_user)?;
    let text = check_comment_data(payload, false)?;

    let post = store
        .get_post(parse_id(&post_id)?)
        .await?
        .ok_or_else(AppError::not_found_error)?;

    let comment = store
        .insert_comment(NewComment {
            author_id: auth_user.id,
            post_id: post.id,
            text: text.unwrap_or_default(),
        })
        .await?;

    info!(
        "User {} commented post {} ({})",
        auth_user.id, post.id, comment.id
    );
    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn get_comment_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(_): AuthUser,
    Path((post_id, id)): Path<(String, String)>,
) -> Result<Json<PublicComment>, AppError> {
    let comment = store
        .get_comment(parse_id(&post_id)?, parse_id(&id)?)
        .await?
        .ok_or_else(AppError::not_found_error)?;
    Ok(Json(comment.into()))
}

pub async fn put_comment_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    Path((post_id, id)): Path<(String, String)>,
    JsonBody(payload): JsonBody<CommentPayload>,
) -> Result<Json<PublicComment>, AppError> {
    update_comment(store.as_ref(), auth_user, &post_id, &id, payload, false).await
}

pub async fn patch_comment_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    Path((post_id, id)): Path<(String, String)>,
    JsonBody(payload): JsonBody<CommentPayload>,
) -> Result<Json<PublicComment>, AppError> {
    update_comment(store.as_ref(), auth_user, &post_id, &id, payload, true).await
}

async fn update_comment(
    store: &dyn Store,
    auth_user: Option<Arc<User>>,
    post_id: &str,
    id: &str,
    payload: CommentPayload,
    partial: bool,
) -> Result<Json<PublicComment>, AppError> {
    let auth_user = require_auth(auth_user)?;
    let comment = store
        .get_comment(parse_id(post_id)?, parse_id(id)?)
        .await?
        .ok_or_else(AppError::not_found_error)?;
    check_owner(&auth_user, comment.author_id)?;

    let Some(text) = check_comment_data(payload, partial)? else {
        return Ok(Json(comment.into()));
    };

    let comment = store.update_comment(comment.id, &text).await?;
    info!("User {} updated comment {}", auth_user.id, comment.id);
    Ok(Json(comment.into()))
}

pub async fn delete_comment_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    Path((post_id, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let auth_user = require_auth(auth_user)?;
    let comment = store
        .get_comment(parse_id(&post_id)?, parse_id(&id)?)
        .await?
        .ok_or_else(AppError::not_found_error)?;
    check_owner(&auth_user, comment.author_id)?;

    store.delete_comment(comment.id).await?;
    info!("User {} deleted comment {}", auth_user.id, comment.id);
    Ok(StatusCode::NO_CONTENT)
}
