//! Request utilities for HTTP endpoints.

use hyper::header::{HeaderMap, HOST};
use hyper::{body::Bytes, Response};
use percent_encoding::percent_decode_str;
use task_query_core::{CallerContext, QueryConfig, QueryError};

use crate::router::RouterError;

/// Type alias for matchit parameters with explicit lifetimes
pub type MatchitParams<'a, 'b> = matchit::Params<'a, 'b>;

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's groups, comma separated
pub const USER_GROUPS_HEADER: &str = "x-user-groups";
/// Header carrying the caller's roles, comma separated
pub const USER_ROLES_HEADER: &str = "x-user-roles";

/// Helper to build HTTP response with proper error handling
pub fn build_response(
    status: u16,
    content_type: &str,
    json: Vec<u8>,
) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Percent-decodes a single path parameter.
pub fn decode_path_param(raw: &str) -> Result<String, RouterError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| {
            RouterError::Query(QueryError::InvalidTaskId(format!(
                "task id is not valid UTF-8: {}",
                e
            )))
        })
}

/// Splits a URL query string into decoded key/value pairs.
///
/// `+` is treated as a space. Pairs without `=` get an empty value.
pub fn parse_query_pairs(query_str: Option<&str>) -> Vec<(String, String)> {
    let Some(query_str) = query_str else {
        return Vec::new();
    };
    query_str
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds the caller context from identity headers set by the gateway.
pub fn caller_context(headers: &HeaderMap) -> CallerContext {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    CallerContext {
        user_id: header(USER_ID_HEADER)
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string),
        groups: header(USER_GROUPS_HEADER).map(split_list).unwrap_or_default(),
        roles: header(USER_ROLES_HEADER).map(split_list).unwrap_or_default(),
    }
}

/// Base URL for links: configured value, else `http://{Host}`.
pub fn base_url(config: &QueryConfig, headers: &HeaderMap) -> String {
    if let Some(url) = &config.public_base_url {
        return url.trim_end_matches('/').to_string();
    }
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or("localhost");
    format!("http://{}", host)
}
