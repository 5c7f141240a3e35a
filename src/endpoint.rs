//! Endpoint path normalization
//!
//! Table endpoints are copied from the web UI in several forms. They are all
//! reduced to a path relative to the `api/v1/` root before a request is made.

/// API version root every request path is resolved against
pub const API_ROOT: &str = "api/v1/";

/// Reduce an endpoint to a path relative to the API root
///
/// Accepts a bare path (`tables/inventory/sites`), an absolute path
/// (`/api/v1/tables/inventory/sites`) or a full URL
/// (`https://host/api/v1/tables/inventory/sites`).
///
/// # Examples
///
/// ```
/// use ipfabric_client::endpoint::normalize_endpoint;
///
/// assert_eq!(normalize_endpoint("/tables/inventory/sites"), "tables/inventory/sites");
/// assert_eq!(
///     normalize_endpoint("https://demo.example.com/api/v1/tables/wireless/controllers"),
///     "tables/wireless/controllers"
/// );
/// ```
pub fn normalize_endpoint(endpoint: &str) -> String {
    let path = match url::Url::parse(endpoint) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_string(),
        _ => endpoint.to_string(),
    };

    let relative = match path.rfind(API_ROOT) {
        Some(idx) => &path[idx + API_ROOT.len()..],
        None => path.as_str(),
    };

    relative.trim_start_matches('/').to_string()
}

/// Last path segment of an endpoint, used as a display name
pub fn endpoint_name(endpoint: &str) -> &str {
    endpoint
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(endpoint)
}

/// Append the API root to a base URL
///
/// Ensures exactly one `/` between the base and `api/v1/`, so that relative
/// request paths resolve under the versioned root. A base that already ends
/// in `api/v1` is left alone.
pub fn api_base(base_url: &str) -> std::result::Result<url::Url, url::ParseError> {
    let trimmed = base_url.trim_end_matches('/');
    let with_root = if trimmed.ends_with("api/v1") {
        format!("{}/", trimmed)
    } else {
        format!("{}/{}", trimmed, API_ROOT)
    };
    url::Url::parse(&with_root)
}
