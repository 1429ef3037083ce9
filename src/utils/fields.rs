use tracing::warn;

use crate::{models::user::User, store::Store};

use super::app_error::{AppError, FieldErrors};

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

/// Trimmed value of a text field.
///
/// Records `REQUIRED` when the value is missing and `required` is set, and
/// `BLANK` when it is only whitespace.
pub fn clean_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    required: bool,
) -> Option<String> {
    let Some(value) = value else {
        if required {
            errors.add(field, REQUIRED);
        }
        return None;
    };
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    Some(value.to_string())
}

/// Look a user up by username, recording `message` on `field` instead of
/// failing the request when nobody has that name
pub async fn resolve_username(
    store: &dyn Store,
    errors: &mut FieldErrors,
    field: &str,
    username: &str,
    message: &str,
) -> Result<Option<User>, AppError> {
    let user = store.user_by_username(username).await?;
    if user.is_none() {
        warn!("Unknown username `{username}` in field `{field}`");
        errors.add(field, message);
    }
    Ok(user)
}
