// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Treats blank strings as absent and validates invalidation path lists.

use nonempty::NonEmpty;
use serde::Deserialize;

use crate::types::PathPattern;

/// Deserialize an optional string, mapping blank input to `None` so it
/// never overrides a lower-precedence layer with an empty value.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty()))
}

pub fn deserialize_paths<'de, D>(deserializer: D) -> Result<NonEmpty<PathPattern>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<String> = Vec::deserialize(deserializer)?;
    let paths = values
        .iter()
        .map(|v| PathPattern::new(v))
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)?;

    NonEmpty::from_vec(paths)
        .ok_or_else(|| serde::de::Error::custom("at least one invalidation path is required"))
}
