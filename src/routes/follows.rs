use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use hyper::StatusCode;
use serde::Deserialize;
use tracing::info;

use crate::{
    extractors::{auth_extractor::AuthUser, json_extractor::JsonBody},
    store::{Store, StoreError},
    structs::follow::{FollowPayload, PublicFollow},
    utils::{
        app_error::{AppError, NON_FIELD_ERRORS},
        follow::{check_new_follow, ALREADY_FOLLOWING},
        permission::require_auth,
        search::search_terms,
    },
};

#[derive(Debug, Default, Deserialize)]
pub struct FollowSearchParams {
    pub search: Option<String>,
}

/// Only the requester's own subscriptions are listed
pub async fn list_follows_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    Query(params): Query<FollowSearchParams>,
) -> Result<Json<Vec<PublicFollow>>, AppError> {
    let auth_user = require_auth(auth_user)?;
    let search = search_terms(params.search.as_deref());

    let follows = store.list_follows(auth_user.id, &search).await?;
    Ok(Json(follows.into_iter().map(PublicFollow::from).collect()))
}

pub async fn create_follow_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(auth_user): AuthUser,
    JsonBody(payload): JsonBody<FollowPayload>,
) -> Result<(StatusCode, Json<PublicFollow>), AppError> {
    let auth_user = require_auth(auth_user)?;
    let following = check_new_follow(store.as_ref(), &auth_user, &payload).await?;

    let follow = match store.insert_follow(auth_user.id, following.id).await {
        Ok(follow) => follow,
        Err(StoreError::UniqueViolation) => {
            return Err(AppError::validation_error(
                NON_FIELD_ERRORS,
                ALREADY_FOLLOWING,
            ))
        }
        Err(e) => return Err(e.into()),
    };

    info!("User {} now follows user {}", auth_user.id, following.id);
    Ok((StatusCode::CREATED, Json(follow.into())))
}
