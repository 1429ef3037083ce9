use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest},
    http::Request,
    Json,
};
use hyper::StatusCode;
use tracing::warn;

use crate::utils::app_error::AppError;

/// `Json` whose rejections are rendered like every other [`AppError`]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for JsonBody<T>
where
    Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
    S: Send + Sync,
    B: Send + 'static,
{
    type Rejection = AppError;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                warn!("Rejected JSON body : {rejection}");
                Err(match rejection {
                    JsonRejection::MissingJsonContentType(_) => AppError::detail(
                        StatusCode::UNSUPPORTED_MEDIA_TYPE,
                        "Unsupported media type in request.",
                    ),
                    rejection => AppError::bad_request_error(&format!(
                        "JSON parse error - {}",
                        rejection.body_text()
                    )),
                })
            }
        }
    }
}
