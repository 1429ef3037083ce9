use crate::structs::comment::CommentPayload;

use super::{
    app_error::{AppError, FieldErrors},
    fields::clean_text,
};

/// Validated comment text, `None` when a partial update left it out
pub fn check_comment_data(payload: CommentPayload, partial: bool) -> Result<Option<String>, AppError> {
    let mut errors = FieldErrors::default();
    let text = clean_text(&mut errors, "text", payload.text.as_deref(), !partial);
    errors.into_result()?;
    Ok(text)
}
