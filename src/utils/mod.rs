pub mod app_error;
pub mod comment;
pub mod fields;
pub mod follow;
pub mod pagination;
pub mod permission;
pub mod post;
pub mod search;
