use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    config::Config,
    extractors::auth_extractor::AuthUser,
    models::group::GroupFilter,
    store::Store,
    structs::group::PublicGroup,
    utils::{
        app_error::AppError,
        pagination::{page_number_page, PageParams},
        search::search_terms,
    },
};

use super::parse_id;

#[derive(Debug, Default, Deserialize)]
pub struct GroupFilterParams {
    pub title: Option<String>,
    pub search: Option<String>,
}

impl From<GroupFilterParams> for GroupFilter {
    fn from(params: GroupFilterParams) -> Self {
        Self {
            title: params.title.filter(|title| !title.is_empty()),
            search: search_terms(params.search.as_deref()),
        }
    }
}

/// Without a configured page size `?page=` is ignored and every group is returned
pub async fn list_groups_route(
    State(store): State<Arc<dyn Store>>,
    State(config): State<Arc<Config>>,
    AuthUser(_): AuthUser,
    OriginalUri(uri): OriginalUri,
    Query(filter_params): Query<GroupFilterParams>,
    Query(page_params): Query<PageParams>,
) -> Result<Response, AppError> {
    let filter = GroupFilter::from(filter_params);
    let page = match config.groups_page_size {
        Some(page_size) => Some((page_size, page_params.window(page_size)?)),
        None => None,
    };

    let (groups, count) = store
        .list_groups(&filter, page.map(|(_, (_, window))| window))
        .await?;
    let groups: Vec<PublicGroup> = groups.into_iter().map(PublicGroup::from).collect();

    Ok(match page {
        Some((page_size, (page, _))) => {
            Json(page_number_page(&uri, page, page_size, count, groups)?).into_response()
        }
        None => Json(groups).into_response(),
    })
}

pub async fn get_group_route(
    State(store): State<Arc<dyn Store>>,
    AuthUser(_): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PublicGroup>, AppError> {
    let group = store
        .get_group(parse_id(&id)?)
        .await?
        .ok_or_else(AppError::not_found_error)?;
    Ok(Json(group.into()))
}
