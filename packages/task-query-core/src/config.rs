//! Query service configuration.

/// Response shape produced for a page of variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `application/json`: `list.entries` + `list.pagination`
    Flat,
    /// `application/hal+json`: `_embedded` + `_links` + `page`
    Linked,
}

impl ResponseFormat {
    /// Media type written to the `Content-Type` header.
    pub fn media_type(&self) -> &'static str {
        match self {
            ResponseFormat::Flat => "application/json",
            ResponseFormat::Linked => "application/hal+json",
        }
    }
}

impl std::str::FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flat" | "json" | "application/json" => Ok(ResponseFormat::Flat),
            "linked" | "hal" | "application/hal+json" => Ok(ResponseFormat::Linked),
            other => Err(format!("unknown response format '{}'", other)),
        }
    }
}

/// Query service configuration.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Page size used when the request names none
    pub default_page_size: u32,
    /// Upper bound applied to requested page sizes
    pub max_page_size: u32,
    /// Format chosen for `*/*` or a missing `Accept` header
    pub default_format: ResponseFormat,
    /// Base URL for HAL links; derived from the `Host` header when unset
    pub public_base_url: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Roles allowed to read variables of every task
    pub admin_roles: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 1000,
            default_format: ResponseFormat::Linked,
            public_base_url: None,
            request_timeout_ms: 5000, // 5 seconds default
            admin_roles: vec!["ACTIVITI_ADMIN".to_string()],
        }
    }
}
