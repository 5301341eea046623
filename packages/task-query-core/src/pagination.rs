//! Pagination request normalization and page results.
//!
//! Two request styles are understood:
//! - `skipCount` / `maxItems` (offset and count)
//! - `page` / `size` (zero-based page index and page size)
//!
//! Both are normalized into a single [`PageQuery`] window before the store is
//! consulted. Mixing parameters of both styles is rejected.

use std::cmp::Ordering;

use crate::config::QueryConfig;
use crate::error::QueryError;
use crate::model::VariableRecord;

const SKIP_COUNT: &str = "skipCount";
const MAX_ITEMS: &str = "maxItems";
const PAGE: &str = "page";
const SIZE: &str = "size";
const SORT: &str = "sort";

/// Pagination parameters as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Offset/count style; missing halves fall back to defaults
    SkipCount {
        skip_count: Option<u64>,
        max_items: Option<u32>,
    },
    /// Page/size style; missing halves fall back to defaults
    PageNumber { page: Option<u64>, size: Option<u32> },
    /// No pagination parameters
    Unspecified,
}

impl PageRequest {
    /// Parses decoded query pairs into a page request and optional sort.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    /// `QueryError::InvalidPageRequest` when values are not integers, sizes are
    /// zero, a key is repeated, or both styles are mixed.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Result<(Self, Option<Sort>), QueryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut skip_count = None;
        let mut max_items = None;
        let mut page = None;
        let mut size = None;
        let mut sort = None;

        for (key, value) in pairs {
            match key {
                SKIP_COUNT => set_once(&mut skip_count, key, parse_offset(key, value)?)?,
                MAX_ITEMS => set_once(&mut max_items, key, parse_size(key, value)?)?,
                PAGE => set_once(&mut page, key, parse_offset(key, value)?)?,
                SIZE => set_once(&mut size, key, parse_size(key, value)?)?,
                SORT => set_once(&mut sort, key, Sort::parse(value)?)?,
                _ => {}
            }
        }

        let skip_style = skip_count.is_some() || max_items.is_some();
        let page_style = page.is_some() || size.is_some();
        let request = match (skip_style, page_style) {
            (true, true) => {
                return Err(QueryError::InvalidPageRequest(format!(
                    "'{}'/'{}' cannot be combined with '{}'/'{}'",
                    SKIP_COUNT, MAX_ITEMS, PAGE, SIZE
                )))
            }
            (true, false) => PageRequest::SkipCount {
                skip_count,
                max_items,
            },
            (false, true) => PageRequest::PageNumber { page, size },
            (false, false) => PageRequest::Unspecified,
        };
        Ok((request, sort))
    }
}

fn set_once<T>(slot: &mut Option<T>, key: &str, value: T) -> Result<(), QueryError> {
    if slot.is_some() {
        return Err(QueryError::InvalidPageRequest(format!(
            "parameter '{}' given more than once",
            key
        )));
    }
    *slot = Some(value);
    Ok(())
}

fn parse_offset(key: &str, value: &str) -> Result<u64, QueryError> {
    value.trim().parse().map_err(|e| {
        QueryError::InvalidPageRequest(format!("Invalid {} value '{}': {}", key, value, e))
    })
}

fn parse_size(key: &str, value: &str) -> Result<u32, QueryError> {
    let size: u32 = value.trim().parse().map_err(|e| {
        QueryError::InvalidPageRequest(format!("Invalid {} value '{}': {}", key, value, e))
    })?;
    if size == 0 {
        return Err(QueryError::InvalidPageRequest(format!(
            "{} must be at least 1",
            key
        )));
    }
    Ok(size)
}

/// Field a page of variables can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    CreateTime,
    LastUpdatedTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Ordering applied by the store before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: SortField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl Sort {
    /// Parses `field` or `field,asc|desc`.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let mut parts = raw.split(',').map(str::trim);
        let field = match parts.next().unwrap_or_default() {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "createTime" => SortField::CreateTime,
            "lastUpdatedTime" => SortField::LastUpdatedTime,
            other => {
                return Err(QueryError::InvalidPageRequest(format!(
                    "cannot sort by '{}'",
                    other
                )))
            }
        };
        let direction = match parts.next() {
            None => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(d) => {
                return Err(QueryError::InvalidPageRequest(format!(
                    "unknown sort direction '{}'",
                    d
                )))
            }
        };
        if parts.next().is_some() {
            return Err(QueryError::InvalidPageRequest(format!(
                "malformed sort '{}'",
                raw
            )));
        }
        Ok(Self { field, direction })
    }

    /// Compares two records; ties are broken by ascending id.
    pub fn compare(&self, a: &VariableRecord, b: &VariableRecord) -> Ordering {
        let ordering = match self.field {
            SortField::Id => a.id().cmp(&b.id()),
            SortField::Name => a.name().cmp(b.name()),
            SortField::CreateTime => a.create_time().cmp(&b.create_time()),
            SortField::LastUpdatedTime => a.last_updated_time().cmp(&b.last_updated_time()),
        };
        let ordering = match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id().cmp(&b.id()))
    }
}

/// Normalized window handed to the variable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Zero-based number of records to skip
    pub offset: u64,
    /// Maximum number of records to return, always at least 1
    pub limit: u32,
    pub sort: Sort,
}

impl PageQuery {
    /// Normalizes a page request using the configured defaults and bounds.
    pub fn normalize(
        request: PageRequest,
        sort: Option<Sort>,
        config: &QueryConfig,
    ) -> Result<Self, QueryError> {
        let max = config.max_page_size.max(1);
        let default = config.default_page_size.clamp(1, max);
        let clamp = |size: Option<u32>| size.map_or(default, |s| s.min(max));

        let (offset, limit) = match request {
            PageRequest::SkipCount {
                skip_count,
                max_items,
            } => (skip_count.unwrap_or(0), clamp(max_items)),
            PageRequest::PageNumber { page, size } => {
                let limit = clamp(size);
                let offset = page
                    .unwrap_or(0)
                    .checked_mul(u64::from(limit))
                    .ok_or_else(|| {
                        QueryError::InvalidPageRequest(format!(
                            "page {} of size {} is out of range",
                            page.unwrap_or(0),
                            limit
                        ))
                    })?;
                (offset, limit)
            }
            PageRequest::Unspecified => (0, default),
        };

        Ok(Self {
            offset,
            limit,
            sort: sort.unwrap_or_default(),
        })
    }
}

/// One window of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    items: Vec<T>,
    offset: u64,
    limit: u32,
    total_items: u64,
}

impl<T> PageResult<T> {
    /// Builds a page, truncating `items` to `limit` and raising `total_items`
    /// to cover a non-empty returned window.
    pub fn new(mut items: Vec<T>, offset: u64, limit: u32, total_items: u64) -> Self {
        items.truncate(limit as usize);
        let total_items = if items.is_empty() {
            total_items
        } else {
            total_items.max(offset.saturating_add(items.len() as u64))
        };
        Self {
            items,
            offset,
            limit,
            total_items,
        }
    }

    pub fn empty(query: &PageQuery) -> Self {
        Self::new(Vec::new(), query.offset, query.limit, 0)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of items in this window.
    pub fn count(&self) -> u64 {
        self.items.len() as u64
    }

    /// True iff items remain beyond this window.
    pub fn has_more_items(&self) -> bool {
        self.offset.saturating_add(self.count()) < self.total_items
    }

    /// Zero-based page index of this window.
    pub fn page_number(&self) -> u64 {
        self.offset / u64::from(self.limit.max(1))
    }

    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(u64::from(self.limit.max(1)))
    }
}
