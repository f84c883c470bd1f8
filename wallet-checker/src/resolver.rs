//! Resolution of the origin the wallet API is served from.

/// Origin used when nothing else is known about the API location.
pub const FALLBACK_BASE_URL: &str = "http://localhost:8000";

/// Origin used by development builds.
pub const DEV_BASE_URL: &str = "http://localhost:8000";

/// Resolve the API origin. The first match wins:
///
/// 1. an explicitly configured, non-empty value;
/// 2. the development default when `dev` is set;
/// 3. the origin of the hosting page;
/// 4. [`FALLBACK_BASE_URL`].
///
/// Trailing slashes are stripped from configured values and page origins.
pub fn resolve_base_url(configured: Option<&str>, dev: bool, page_origin: Option<&str>) -> String {
    if let Some(configured) = configured.filter(|value| !value.trim().is_empty()) {
        return strip_trailing_slashes(configured.trim());
    }

    if dev {
        return DEV_BASE_URL.to_string();
    }

    if let Some(origin) = page_origin.filter(|value| !value.trim().is_empty()) {
        return strip_trailing_slashes(origin.trim());
    }

    FALLBACK_BASE_URL.to_string()
}

fn strip_trailing_slashes(value: &str) -> String {
    value.trim_end_matches('/').to_string()
}
