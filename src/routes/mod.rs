pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;


use axum::{middleware as axum_middleware, routing::get, Router};
use hyper::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{middleware::logger_middleware::logger_middleware, utils::app_error::AppError, AppState};

use comments::{
    create_comment_route, delete_comment_route, get_comment_route, list_comments_route,
    patch_comment_route, put_comment_route,
};
use follows::{create_follow_route, list_follows_route};
use groups::{get_group_route, list_groups_route};
use posts::{
    create_post_route, delete_post_route, get_post_route, list_posts_route, patch_post_route,
    put_post_route,
};

/// Ids in paths that are not integers match nothing
pub fn parse_id(id: &str) -> Result<i64, AppError> {
    id.parse().map_err(|_| AppError::not_found_error())
}

pub fn router(app_state: AppState) -> Router {
    let api: Router<AppState> = Router::new()
        .route("/posts/", get(list_posts_route).post(create_post_route))
        .route(
            "/posts/:id/",
            get(get_post_route)
                .put(put_post_route)
                .patch(patch_post_route)
                .delete(delete_post_route),
        )
        .route(
            "/posts/:post_id/comments/",
            get(list_comments_route).post(create_comment_route),
        )
        .route(
            "/posts/:post_id/comments/:id/",
            get(get_comment_route)
                .put(put_comment_route)
                .patch(patch_comment_route)
                .delete(delete_comment_route),
        )
        .route("/groups/", get(list_groups_route))
        .route("/groups/:id/", get(get_group_route))
        .route("/follows/", get(list_follows_route).post(create_follow_route));

    let allow_origin = match &app_state.config.front_url {
        Some(front_url) => AllowOrigin::exact(front_url.clone()),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(allow_origin);

    let router = match app_state.config.api_prefix.as_str() {
        "" => Router::new().merge(api),
        prefix => Router::new().nest(prefix, api),
    };

    router
        .layer(cors)
        .layer(axum_middleware::from_fn(logger_middleware))
        .with_state(app_state)
}
