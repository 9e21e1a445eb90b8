use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved id meaning "no such page". Never stored.
pub const NOT_FOUND_ID: i64 = -1;

/// Parent value of top-level pages.
pub const ROOT_PARENT: i64 = 0;

pub const TEMPLATE_PAGE: &str = "page";
pub const TEMPLATE_POST: &str = "post";
pub const TEMPLATE_CATEGORY: &str = "category";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Status {
    #[default]
    Draft,
    Published,
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        match status {
            Status::Draft => 0,
            Status::Published => 1,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Status::Draft),
            1 => Ok(Status::Published),
            other => Err(format!("unknown status {}", other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Draft => write!(f, "draft"),
            Status::Published => write!(f, "published"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PageType {
    #[default]
    Page,
    Post,
}

impl From<PageType> for u8 {
    fn from(kind: PageType) -> u8 {
        match kind {
            PageType::Page => 0,
            PageType::Post => 1,
        }
    }
}

impl TryFrom<u8> for PageType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PageType::Page),
            1 => Ok(PageType::Post),
            other => Err(format!("unknown page type {}", other)),
        }
    }
}

/// One page or post.
///
/// Field names in the metadata document match the struct's declared names
/// (`ID`, `Parent`, `PubDate`, ...). The body is kept in its own file and is
/// only filled in when a lookup asks for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Page {
    #[serde(rename = "ID")]
    pub id: i64,
    pub parent: i64,
    /// Distance from the root. Callers keep this consistent with `parent`.
    pub depth: i64,
    pub title: String,
    pub description: String,
    pub route: String,
    pub author: String,
    pub status: Status,
    pub category: i64,
    #[serde(rename = "Type")]
    pub page_type: PageType,
    pub template: String,
    pub pub_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
    #[serde(skip)]
    pub content: String,
}

impl Page {
    pub fn new(id: i64, title: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            route: route.into(),
            ..Default::default()
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_parent(mut self, parent: i64, depth: i64) -> Self {
        self.parent = parent;
        self.depth = depth;
        self
    }

    pub fn with_category(mut self, category: i64) -> Self {
        self.category = category;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Pages and posts show up in parent listings; categories do not.
    pub fn is_listed(&self) -> bool {
        self.template == TEMPLATE_PAGE || self.template == TEMPLATE_POST
    }

    pub fn is_category(&self) -> bool {
        self.template == TEMPLATE_CATEGORY
    }
}
