use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value.
///
/// Older documents write `null` for empty descriptions, prerequisite lists
/// and metadata maps.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Distinguish an absent field from an explicit `null`.
///
/// Absent fields hit `#[serde(default)]` and stay `None`; a present field,
/// including `null`, becomes `Some(..)`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
