pub mod auth_extractor;
pub mod json_extractor;
