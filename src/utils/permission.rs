use std::sync::Arc;

use tracing::warn;

use crate::models::user::User;

use super::app_error::AppError;

/// Mutating requests need an authenticated user
pub fn require_auth(auth_user: Option<Arc<User>>) -> Result<Arc<User>, AppError> {
    auth_user.ok_or_else(|| {
        warn!("Anonymous user tried to perform an authenticated action");
        AppError::not_authenticated_error()
    })
}

/// Only the author of an object may change or delete it
pub fn check_owner(auth_user: &User, owner_id: i64) -> Result<(), AppError> {
    if auth_user.id != owner_id {
        warn!(
            "User {} tried to modify an object owned by {owner_id}",
            auth_user.id
        );
        return Err(AppError::forbidden_error());
    }
    Ok(())
}
