/// Default base URL for a locally running answering service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Service endpoints consumed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Ask,
    History,
    Health,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Ask => "/ask",
            Self::History => "/history",
            Self::Health => "/health",
        }
    }
}

/// Normalize a base URL for endpoint joining.
///
/// Normalization rules:
/// 1) blank input falls back to [`DEFAULT_BASE_URL`]
/// 2) surrounding whitespace and trailing slashes are removed
/// 3) a trailing known endpoint path is stripped so `/ask` is never doubled
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        input.trim()
    };

    let mut trimmed = base.trim_end_matches('/');
    for endpoint in [Endpoint::Ask, Endpoint::History, Endpoint::Health] {
        if let Some(stripped) = trimmed.strip_suffix(endpoint.path()) {
            trimmed = stripped.trim_end_matches('/');
            break;
        }
    }

    trimmed.to_string()
}

/// Full URL for `endpoint` under `base_url`.
pub fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}{}", normalize_base_url(base_url), endpoint.path())
}
