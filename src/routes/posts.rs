use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use hyper::StatusCode;
use tracing::info;

use crate::{
    extractors::{auth_extractor::AuthUser, json_extractor::JsonBody},
    models::{post::NewPost, user::User},
    store::Store,
    structs::post::{PostPayload, PublicPost},
    utils::{
        app_error::AppError,
        pagination::{limit_offset_page, PaginationParams},
        permission::{check_owner, require_auth},
        post::{check_post_data, check_post_filter, PostFilterParams},
    },
};

use super::parse_id;

pub async fn list_posts_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(_): AuthUser,
    OriginalUri(uri): OriginalUri,
    Query(filter_params): Query<PostFilterParams>,
    Query(pagination_params): Query<PaginationParams>,
) -> Result<Response, AppError> {
    let filter = check_post_filter(store.as_ref(), filter_params).await?;
    let window = pagination_params.window();

    let (posts, count) = store.list_posts(&filter, window).await?;
    let posts: Vec<PublicPost> = posts.into_iter().map(PublicPost::from).collect();

    Ok(match window {
        Some(window) => Json(limit_offset_page(&uri, window, count, posts)).into_response(),
        None => Json(posts).into_response(),
    })
}

pub async fn create_post_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    JsonBody(payload): JsonBody<PostPayload>,
) -> Result<(StatusCode, Json<PublicPost>), AppError> {
    let auth_user = require_auth(auth_user)?;

    let post = check_post_data(store.as_ref(), auth_user.id, payload, false).await?;

    let post = store
        .insert_post(NewPost {
            author_id: auth_user.id,
            text: post.text.unwrap_or_default(),
            group_id: post.group_id.flatten(),
        })
        .await?;

    info!("User {} published post {}", auth_user.id, post.id);
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn get_post_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PublicPost>, AppError> {
    let post = store
        .get_post(parse_id(&id)?)
        .await?
        .ok_or_else(AppError::not_found_error)?;
    Ok(Json(post.into()))
}

pub async fn put_post_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<PostPayload>,
) -> Result<Json<PublicPost>, AppError> {
    update_post(store.as_ref(), auth_user, &id, payload, false).await
}

pub async fn patch_post_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<PostPayload>,
) -> Result<Json<PublicPost>, AppError> {
    update_post(store.as_ref(), auth_user, &id, payload, true).await
}

async fn update_post(
    store: &dyn Store,
    auth_user: Option<Arc<User>>,
    id: &str,
    payload: PostPayload,
    partial: bool,
) -> Result<Json<PublicPost>, AppError> {
    let auth_user = require_auth(auth_user)?;
    let post = store
        .get_post(parse_id(id)?)
        .await?
        .ok_or_else(AppError::not_found_error)?;
    check_owner(&auth_user, post.author_id)?;

    let changes = check_post_data(store, auth_user.id, payload, partial).await?;
    let text = changes.text.unwrap_or(post.text);
    let group_id = changes.group_id.unwrap_or(post.group_id);

    let post = store.update_post(post.id, &text, group_id).await?;
    info!("User {} updated post {}", auth_user.id, post.id);
    Ok(Json(post.into()))
}

pub async fn delete_post_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let auth_user = require_auth(auth_user)?;
    let post = store
        .get_post(parse_id(&id)?)
        .await?
        .ok_or_else(AppError::not_found_error)?;
    check_owner(&auth_user, post.author_id)?;

    store.delete_post(post.id).await?;
    info!("User {} deleted post {}", auth_user.id, post.id);
    Ok(StatusCode::NO_CONTENT)
}
