//! `Accept` header parsing and response format selection.

use hyper::header::{HeaderMap, ACCEPT};
use task_query_core::{QueryError, ResponseFormat};

/// One media range from an `Accept` header.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    pub main_type: String,
    pub subtype: String,
    pub quality: f32,
}

impl MediaRange {
    /// Parses `type/subtype; q=0.8`. Parameters other than `q` are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (main_type, subtype) = parts.next()?.trim().split_once('/')?;
        let (main_type, subtype) = (main_type.trim(), subtype.trim());
        if main_type.is_empty() || subtype.is_empty() {
            return None;
        }

        let mut quality = 1.0;
        for param in parts {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse::<f32>().ok()?.clamp(0.0, 1.0);
                }
            }
        }

        Some(Self {
            main_type: main_type.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            quality,
        })
    }

    fn is_wildcard_for_application(&self) -> bool {
        self.main_type == "*" || (self.main_type == "application" && self.subtype == "*")
    }

    fn is_refused(&self) -> bool {
        self.quality <= 0.0
    }

    /// Format named by this range; `None` for wildcards and unsupported types.
    fn format(&self) -> Option<ResponseFormat> {
        match (self.main_type.as_str(), self.subtype.as_str()) {
            ("application", "json") => Some(ResponseFormat::Flat),
            ("application", "hal+json") => Some(ResponseFormat::Linked),
            _ => None,
        }
    }
}

/// Parses a full `Accept` value into ranges ordered by quality, highest first.
///
/// Ranges of equal quality keep their header order. Ranges with `q=0` are
/// dropped.
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    let mut ranges: Vec<MediaRange> = header
        .split(',')
        .filter_map(MediaRange::parse)
        .filter(|r| r.quality > 0.0)
        .collect();
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

/// Selects the response format for the request headers.
///
/// A missing or empty `Accept` header, or a wildcard range, selects `default`.
/// A format named with `q=0` is never chosen through a wildcard; the other
/// format is served instead when it is not refused as well.
///
/// # Errors
/// `QueryError::NotAcceptable` if no range matches a supported format.
pub fn negotiate(
    headers: &HeaderMap,
    default: ResponseFormat,
) -> Result<ResponseFormat, QueryError> {
    let values: Vec<&str> = headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    let header = values.join(",");
    if header.trim().is_empty() {
        return Ok(default);
    }

    let refused: Vec<ResponseFormat> = header
        .split(',')
        .filter_map(MediaRange::parse)
        .filter(MediaRange::is_refused)
        .filter_map(|r| r.format())
        .collect();

    for range in parse_accept(&header) {
        if let Some(format) = range.format() {
            return Ok(format);
        }
        if range.is_wildcard_for_application() {
            if let Some(format) = [default, alternate(default)]
                .into_iter()
                .find(|f| !refused.contains(f))
            {
                return Ok(format);
            }
        }
    }
    Err(QueryError::NotAcceptable(header))
}

fn alternate(format: ResponseFormat) -> ResponseFormat {
    match format {
        ResponseFormat::Flat => ResponseFormat::Linked,
        ResponseFormat::Linked => ResponseFormat::Flat,
    }
}
