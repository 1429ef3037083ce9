use serde::{Deserialize, Deserializer};

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;

/// Tells an explicit `null` apart from an absent field: absent stays `None`
/// (through `#[serde(default)]`), `null` becomes `Some(None)`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
