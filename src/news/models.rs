//! News Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted news article
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64, // fixed at creation
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert an article; the store assigns id and timestamps
#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

/// Partial update. A field that is absent, empty or whitespace-only is left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewsPatch {
    /// Overwrite the fields this patch actually carries
    pub fn apply_to(&self, news: &mut News) {
        if let Some(title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            news.title = title.to_string();
        }
        if let Some(content) = self.content.as_deref().filter(|c| !c.trim().is_empty()) {
            news.content = content.to_string();
        }
    }
}

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalized, 1-indexed page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Clamp raw caller input: page below 1 becomes 1, a non-positive size becomes
    /// the default and oversize requests are capped.
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = page.max(DEFAULT_PAGE);
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// One page of articles plus the total matching the filter
#[derive(Debug, Clone)]
pub struct NewsPage {
    pub items: Vec<News>,
    pub total: u64,
    pub page: PageRequest,
}

/// Create request body
#[derive(Debug, Deserialize)]
pub struct CreateNewsRequest {
    pub title: String,
    pub content: String,
}

/// List query string: `?title=&page=&pageSize=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNewsQuery {
    #[serde(default)]
    pub title: Option<String>,
    // Kept as text so an empty `page=` falls back to the default
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsListResponse {
    pub data: Vec<News>,
    pub total: u64,
    pub page: i64,
    pub page_size: i64,
}

impl From<NewsPage> for NewsListResponse {
    fn from(page: NewsPage) -> Self {
        Self {
            data: page.items,
            total: page.total,
            page: page.page.page,
            page_size: page.page.page_size,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}
