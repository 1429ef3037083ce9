use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::warn;

use crate::{models::post::PostFilter, store::Store, structs::post::PostPayload};

use super::{
    app_error::{AppError, FieldErrors},
    fields::clean_text,
};

/// Post fields that passed validation. `None` means "not sent".
pub struct CheckedPost {
    pub text: Option<String>,
    pub group_id: Option<Option<i64>>,
}

/// Validate a post body. `partial` is set for `PATCH`, where `text` may be omitted.
pub async fn check_post_data(
    store: &dyn Store,
    auth_user_id: i64,
    payload: PostPayload,
    partial: bool,
) -> Result<CheckedPost, AppError> {
    let mut errors = FieldErrors::default();

    let text = clean_text(&mut errors, "text", payload.text.as_deref(), !partial);

    if let Some(Some(group_id)) = payload.group {
        if store.get_group(group_id).await?.is_none() {
            warn!("User {auth_user_id} tried to post in unknown group {group_id}");
            errors.add(
                "group",
                &format!("Invalid pk \"{group_id}\" - object does not exist."),
            );
        }
    }

    errors.into_result()?;

    Ok(CheckedPost {
        text,
        group_id: payload.group,
    })
}

/// Raw `?group=&pub_date=` query of the post listing
#[derive(Debug, Default, serde::Deserialize)]
pub struct PostFilterParams {
    pub group: Option<String>,
    pub pub_date: Option<String>,
}

/// Turn the listing query into a store filter. Empty values are ignored.
pub async fn check_post_filter(
    store: &dyn Store,
    params: PostFilterParams,
) -> Result<PostFilter, AppError> {
    let mut errors = FieldErrors::default();
    let mut filter = PostFilter::default();

    if let Some(group) = params.group.as_deref().filter(|group| !group.is_empty()) {
        let group = match group.parse::<i64>() {
            Ok(id) => store.get_group(id).await?,
            Err(_) => None,
        };
        match group {
            Some(group) => filter.group_id = Some(group.id),
            None => errors.add(
                "group",
                "Select a valid choice. That choice is not one of the available choices.",
            ),
        }
    }

    if let Some(pub_date) = params.pub_date.as_deref().filter(|date| !date.is_empty()) {
        match OffsetDateTime::parse(pub_date, &Rfc3339) {
            Ok(pub_date) => filter.pub_date = Some(pub_date),
            Err(e) => {
                warn!("Invalid pub_date filter `{pub_date}` : {e}");
                errors.add("pub_date", "Enter a valid date/time.");
            }
        }
    }

    errors.into_result()?;
    Ok(filter)
}
