//! Response envelopes for a page of variables.
//!
//! - Flat (`application/json`): `list.entries[].entry` plus `list.pagination`
//! - Linked (`application/hal+json`): `_embedded.variables`, `_links`, `page`
//!
//! Both preserve the order of the page exactly.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use task_query_core::{PageResult, ResponseFormat, VariableRecord};

/// Characters escaped when a task id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Serialize)]
pub struct FlatEnvelope<'a> {
    pub list: FlatList<'a>,
}

#[derive(Debug, Serialize)]
pub struct FlatList<'a> {
    pub entries: Vec<FlatEntry<'a>>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct FlatEntry<'a> {
    pub entry: &'a VariableRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub skip_count: u64,
    pub max_items: u32,
    pub count: u64,
    pub has_more_items: bool,
    pub total_items: u64,
}

impl Pagination {
    pub fn of<T>(page: &PageResult<T>) -> Self {
        Self {
            skip_count: page.offset(),
            max_items: page.limit(),
            count: page.count(),
            has_more_items: page.has_more_items(),
            total_items: page.total_items(),
        }
    }
}

/// Builds the flat envelope.
pub fn flat_envelope(page: &PageResult<VariableRecord>) -> FlatEnvelope<'_> {
    FlatEnvelope {
        list: FlatList {
            entries: page.items().iter().map(|entry| FlatEntry { entry }).collect(),
            pagination: Pagination::of(page),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct LinkedEnvelope<'a> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<'a>,
    #[serde(rename = "_links")]
    pub links: PageLinks,
    pub page: PageMetadata,
}

#[derive(Debug, Serialize)]
pub struct Embedded<'a> {
    pub variables: Vec<VariableResource<'a>>,
}

#[derive(Debug, Serialize)]
pub struct VariableResource<'a> {
    #[serde(flatten)]
    pub variable: &'a VariableRecord,
    #[serde(rename = "_links")]
    pub links: VariableLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableLinks {
    pub task: Link,
    pub home: Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub first: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    pub last: Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
}

impl PageMetadata {
    pub fn of<T>(page: &PageResult<T>) -> Self {
        Self {
            size: page.limit(),
            total_elements: page.total_items(),
            total_pages: page.total_pages(),
            number: page.page_number(),
        }
    }
}

/// Absolute URLs used when rendering links.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
    task_id: String,
}

impl LinkBuilder {
    pub fn new(base_url: &str, task_id: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            task_id: utf8_percent_encode(task_id, PATH_SEGMENT).to_string(),
        }
    }

    pub fn home(&self) -> Link {
        Link {
            href: format!("{}/v1", self.base_url),
        }
    }

    pub fn task(&self) -> Link {
        Link {
            href: format!("{}/v1/tasks/{}", self.base_url, self.task_id),
        }
    }

    /// Link to the window starting at `offset`; page style when aligned.
    pub fn window(&self, offset: u64, limit: u32) -> Link {
        let limit_u64 = u64::from(limit.max(1));
        let query = if offset % limit_u64 == 0 {
            format!("page={}&size={}", offset / limit_u64, limit)
        } else {
            format!("skipCount={}&maxItems={}", offset, limit)
        };
        Link {
            href: format!(
                "{}/v1/tasks/{}/variables?{}",
                self.base_url, self.task_id, query
            ),
        }
    }

    pub fn page_links<T>(&self, page: &PageResult<T>) -> PageLinks {
        let offset = page.offset();
        let limit = page.limit();
        let last_page = page.total_pages().saturating_sub(1);

        let prev = (offset > 0)
            .then(|| self.window(offset.saturating_sub(u64::from(limit)), limit));
        let next_offset = offset.saturating_add(u64::from(limit));
        let next = (next_offset < page.total_items()).then(|| self.window(next_offset, limit));

        PageLinks {
            first: self.window(0, limit),
            prev,
            self_link: self.window(offset, limit),
            next,
            last: self.window(last_page.saturating_mul(u64::from(limit)), limit),
        }
    }
}

/// Builds the linked envelope.
pub fn linked_envelope<'a>(
    page: &'a PageResult<VariableRecord>,
    links: &LinkBuilder,
) -> LinkedEnvelope<'a> {
    let variable_links = VariableLinks {
        task: links.task(),
        home: links.home(),
    };
    LinkedEnvelope {
        embedded: Embedded {
            variables: page
                .items()
                .iter()
                .map(|variable| VariableResource {
                    variable,
                    links: variable_links.clone(),
                })
                .collect(),
        },
        links: links.page_links(page),
        page: PageMetadata::of(page),
    }
}

/// Serializes `page` in the given format.
pub fn render(
    format: ResponseFormat,
    page: &PageResult<VariableRecord>,
    links: &LinkBuilder,
) -> Result<Vec<u8>, serde_json::Error> {
    match format {
        ResponseFormat::Flat => serde_json::to_vec(&flat_envelope(page)),
        ResponseFormat::Linked => serde_json::to_vec(&linked_envelope(page, links)),
    }
}
