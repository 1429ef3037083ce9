use std::collections::BTreeMap;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use hyper::StatusCode;
use serde_json::{json, Value};
use tracing::warn;

use crate::store::StoreError;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Error returned by every route, rendered as a JSON body
#[derive(Debug)]
pub struct AppError {
    status_code: StatusCode,
    body: Option<Value>,
}

impl AppError {
    pub fn new(status_code: StatusCode, body: Option<Value>) -> Self {
        Self { status_code, body }
    }

    /// `{"detail": "<message>"}`
    pub fn detail(status_code: StatusCode, message: &str) -> Self {
        Self::new(status_code, Some(json!({ "detail": message })))
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, None)
    }

    pub fn not_found_error() -> Self {
        Self::detail(StatusCode::NOT_FOUND, "Not found.")
    }

    pub fn not_authenticated_error() -> Self {
        Self::detail(
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        )
    }

    pub fn invalid_token_error() -> Self {
        Self::detail(StatusCode::UNAUTHORIZED, "Invalid token.")
    }

    pub fn forbidden_error() -> Self {
        Self::detail(
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action.",
        )
    }

    pub fn bad_request_error(message: &str) -> Self {
        Self::detail(StatusCode::BAD_REQUEST, message)
    }

    /// Single-field validation failure
    pub fn validation_error(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        errors.into()
    }

    #[cfg(test)]
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

/// Validation failures grouped by field, rendered as `{"field": ["msg", ...]}`
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            return Ok(());
        }
        Err(self.into())
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(json!(errors.0)))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::not_found_error(),
            e => {
                warn!("Store error : {e}");
                AppError::internal_server_error()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status_code, Json(body)).into_response(),
            None => self.status_code.into_response(),
        }
    }
}
