//! # Article Store
//!
//! The persistence seam for articles. The engine never talks to a database
//! itself: the [`ArticleStore`] trait describes what the CMS needs from one,
//! and [`InMemoryArticleStore`] implements it for tests and the CLI.
//!
//! An article keeps its body as raw JSON. The document model is only applied
//! when the body is read through [`Article::document`], so content written by
//! other tools is stored untouched.
//!
//! ## Modules
//!
//! - [`memory`]: the in-memory store

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::normalize::normalize;

pub use memory::InMemoryArticleStore;

/// Minimum length of an article's title and slug.
pub const MIN_TITLE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("no article with id `{0}`")]
    NotFound(String),
    #[error("slug `{0}` is already used by another article")]
    SlugTaken(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Review,
    Published,
    Archived,
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Review => "review",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub status: ArticleStatus,
    pub category_slug: Option<String>,
    pub topic: Option<String>,
    /// Body as stored, not yet normalized.
    pub content_json: Value,
    pub cover_image_url: Option<String>,
    pub author_name: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub og_image_url: Option<String>,
    pub is_featured: bool,
    pub is_editors_pick: bool,
    pub pinned_at: Option<DateTime<Utc>>,
    pub view_count: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Normalized tag slugs, sorted.
    pub tags: Vec<String>,
}

impl Article {
    /// The body as a document. Never fails; see [`normalize`].
    pub fn document(&self) -> Document {
        normalize(&self.content_json)
    }

    /// The stored excerpt, or one taken from the body.
    pub fn display_excerpt(&self, max_chars: usize) -> Option<String> {
        self.excerpt
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| self.document().excerpt(max_chars))
    }
}

/// Fields an author supplies when creating or updating an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    /// Defaults to [`ArticleStatus::Draft`].
    pub status: Option<ArticleStatus>,
    pub category_slug: Option<String>,
    pub topic: Option<String>,
    /// Defaults to [`Document::empty_now`].
    pub content_json: Option<Value>,
    pub is_featured: bool,
    pub is_editors_pick: bool,
    pub author_name: Option<String>,
    pub cover_image_url: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub og_image_url: Option<String>,
    /// Replaces the article's tags when present.
    pub tag_slugs: Option<Vec<String>>,
    pub pinned_at: Option<DateTime<Utc>>,
}

impl ArticleInput {
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        for (field, value) in [("title", &self.title), ("slug", &self.slug)] {
            if value.chars().count() < MIN_TITLE_LEN {
                return Err(StoreError::Invalid {
                    field,
                    reason: format!("must be at least {MIN_TITLE_LEN} characters"),
                });
            }
        }
        Ok(())
    }

    /// The body to store: the given content, or a fresh empty document.
    pub fn content_or_empty(&self) -> Value {
        self.content_json
            .clone()
            .unwrap_or_else(|| Document::empty_now().to_value())
    }

    /// Normalized, deduplicated tag slugs, or `None` to keep existing tags.
    pub fn normalized_tags(&self) -> Option<Vec<String>> {
        self.tag_slugs.as_ref().map(|slugs| {
            let mut tags: Vec<String> = slugs
                .iter()
                .map(|s| normalize_tag_slug(s))
                .filter(|s| !s.is_empty())
                .collect();
            tags.sort();
            tags.dedup();
            tags
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleFilter {
    pub status: Option<ArticleStatus>,
    pub category_slug: Option<String>,
    pub topic: Option<String>,
    pub take: usize,
    pub skip: usize,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            status: None,
            category_slug: None,
            topic: None,
            take: 20,
            skip: 0,
        }
    }
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        self.status.is_none_or(|s| s == article.status)
            && self
                .category_slug
                .as_ref()
                .is_none_or(|c| article.category_slug.as_ref() == Some(c))
            && self
                .topic
                .as_ref()
                .is_none_or(|t| article.topic.as_ref() == Some(t))
    }
}

/// Article persistence.
///
/// Implementations must be `Send + Sync` so a store can be shared between
/// tasks behind an `Arc`.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Articles matching `filter`, newest publication first; unpublished
    /// articles follow, newest first.
    async fn fetch(&self, filter: &ArticleFilter) -> Result<Vec<Article>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError>;

    /// Creates an article, or replaces the fields of the article `id`.
    async fn upsert(&self, id: Option<&str>, input: ArticleInput) -> Result<Article, StoreError>;

    /// Changes status. Publishing stamps `published_at`; any other status
    /// clears it.
    async fn set_status(&self, id: &str, status: ArticleStatus) -> Result<Article, StoreError>;

    /// Counts a view of the article with `slug`, if there is one.
    async fn increment_view(&self, slug: &str) -> Result<(), StoreError>;
}

/// Trim, lowercase, whitespace runs to `-`, then drop anything outside
/// `[a-z0-9-]`.
pub fn normalize_tag_slug(slug: &str) -> String {
    slug.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}
