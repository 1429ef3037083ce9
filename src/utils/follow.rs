use tracing::warn;

use crate::{models::user::User, store::Store, structs::follow::FollowPayload};

use super::{
    app_error::{AppError, FieldErrors, NON_FIELD_ERRORS},
    fields::{resolve_username, REQUIRED},
};

pub const SELF_FOLLOW: &str = "Невозможно оформить подписку на самого себя.";
pub const USER_NOT_FOUND: &str = "Пользователь не найден";
pub const USER_DOES_NOT_EXIST: &str = "Пользователь не существует";
pub const ALREADY_FOLLOWING: &str = "Вы уже подписаны!";

/// Validate a follow request from `auth_user` and return the user to follow.
///
/// Checks run in order: `following` present, not the requester, an existing
/// user, and finally not already followed.
pub async fn check_new_follow(
    store: &dyn Store,
    auth_user: &User,
    payload: &FollowPayload,
) -> Result<User, AppError> {
    let mut errors = FieldErrors::default();

    if let Some(username) = payload.user.as_deref() {
        resolve_username(store, &mut errors, "user", username, USER_DOES_NOT_EXIST).await?;
    }

    let following = match payload.following.as_deref() {
        None => {
            errors.add("following", REQUIRED);
            None
        }
        Some(username) if username == auth_user.username => {
            warn!("User {} tried to follow themselves", auth_user.id);
            errors.add("following", SELF_FOLLOW);
            None
        }
        Some(username) => {
            resolve_username(store, &mut errors, "following", username, USER_NOT_FOUND).await?
        }
    };

    let following = match following {
        Some(following) if errors.is_empty() => following,
        _ => return Err(errors.into()),
    };

    if store.follow_exists(auth_user.id, following.id).await? {
        warn!(
            "User {} already follows user {}",
            auth_user.id, following.id
        );
        return Err(AppError::validation_error(NON_FIELD_ERRORS, ALREADY_FOLLOWING));
    }

    Ok(following)
}
