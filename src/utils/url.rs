//! Helpers for building endpoint URLs from a configured base URL.

/// Strip surrounding whitespace and trailing slashes from a base URL.
///
/// ```
/// use ollama_chat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url(" http://adapter:8000// "), "http://adapter:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// ```
/// use ollama_chat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/v1/models"),
///     "http://localhost:8000/v1/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalize_base_url(base_url), endpoint)
}

/// Reject base URLs that reqwest could never reach.
pub fn validate_base_url(base_url: &str) -> Result<String, String> {
    let normalized = normalize_base_url(base_url);
    let rest = normalized
        .strip_prefix("http://")
        .or_else(|| normalized.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(normalized),
        Some(_) => Err(format!("base URL '{base_url}' has no host")),
        None => Err(format!(
            "base URL '{base_url}' must start with http:// or https://"
        )),
    }
}
