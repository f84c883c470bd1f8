use serde::{Deserialize, Deserializer};

/// A deserializer for the std::time::Duration type.
/// Serde includes a default deserializer, but it expects a struct.
pub fn duration_milliseconds_deserializer<'de, D>(
    deserializer: D,
) -> Result<std::time::Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(std::time::Duration::from_millis(
        u64::deserialize(deserializer).map_err(serde::de::Error::custom)?,
    ))
}

/// A deserializer for the API path prefix. The result always starts with a
/// `/` and never ends with one, so that it can be joined with endpoint paths.
/// A root prefix becomes the empty string.
pub fn api_prefix_deserializer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize_api_prefix(&String::deserialize(deserializer)?))
}

pub fn normalize_api_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }

    format!("/{trimmed}")
}
