use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{Article, ArticleFilter, ArticleInput, ArticleStatus, ArticleStore, StoreError};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// An [`ArticleStore`] held in memory.
#[derive(Clone)]
pub struct InMemoryArticleStore {
    articles: Arc<RwLock<HashMap<String, Article>>>,
    clock: Clock,
}

impl Default for InMemoryArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// A store that reads the time from `clock`.
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            articles: Arc::new(RwLock::new(HashMap::new())),
            clock: Arc::new(clock),
        }
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

impl std::fmt::Debug for InMemoryArticleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryArticleStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn fetch(&self, filter: &ArticleFilter) -> Result<Vec<Article>, StoreError> {
        let articles = self.articles.read().await;
        let mut matching: Vec<&Article> =
            articles.values().filter(|a| filter.matches(a)).collect();
        matching.sort_by_key(|a| {
            (
                a.published_at.is_none(),
                Reverse(a.published_at),
                Reverse(a.created_at),
            )
        });
        Ok(matching
            .into_iter()
            .skip(filter.skip)
            .take(filter.take)
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>, StoreError> {
        let articles = self.articles.read().await;
        Ok(articles.values().find(|a| a.slug == slug).cloned())
    }

    async fn upsert(&self, id: Option<&str>, input: ArticleInput) -> Result<Article, StoreError> {
        input.validate()?;
        let now = (self.clock)();
        let mut articles = self.articles.write().await;

        if articles
            .values()
            .any(|a| a.slug == input.slug && Some(a.id.as_str()) != id)
        {
            return Err(StoreError::SlugTaken(input.slug));
        }

        let status = input.status.unwrap_or_default();
        let content_json = input.content_or_empty();
        let tags = input.normalized_tags();

        let article = match id {
            Some(id) => {
                let article = articles
                    .get_mut(id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                article.title = input.title;
                article.slug = input.slug;
                article.excerpt = input.excerpt;
                article.status = status;
                article.category_slug = input.category_slug;
                article.topic = input.topic;
                article.content_json = content_json;
                article.cover_image_url = input.cover_image_url;
                article.author_name = input.author_name;
                article.seo_title = input.seo_title;
                article.seo_description = input.seo_description;
                article.og_image_url = input.og_image_url;
                article.is_featured = input.is_featured;
                article.is_editors_pick = input.is_editors_pick;
                article.pinned_at = input.pinned_at;
                if let Some(tags) = tags {
                    article.tags = tags;
                }
                article.updated_at = now;
                article.clone()
            }
            None => {
                let article = Article {
                    id: uuid::Uuid::new_v4().to_string(),
                    title: input.title,
                    slug: input.slug,
                    excerpt: input.excerpt,
                    status,
                    category_slug: input.category_slug,
                    topic: input.topic,
                    content_json,
                    cover_image_url: input.cover_image_url,
                    author_name: input.author_name,
                    seo_title: input.seo_title,
                    seo_description: input.seo_description,
                    og_image_url: input.og_image_url,
                    is_featured: input.is_featured,
                    is_editors_pick: input.is_editors_pick,
                    pinned_at: input.pinned_at,
                    view_count: 0,
                    published_at: (status == ArticleStatus::Published).then_some(now),
                    created_at: now,
                    updated_at: now,
                    tags: tags.unwrap_or_default(),
                };
                articles.insert(article.id.clone(), article.clone());
                article
            }
        };

        log::debug!("stored article {} ({})", article.slug, article.status);
        Ok(article)
    }

    async fn set_status(&self, id: &str, status: ArticleStatus) -> Result<Article, StoreError> {
        let now = (self.clock)();
        let mut articles = self.articles.write().await;
        let article = articles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        article.status = status;
        article.published_at = (status == ArticleStatus::Published).then_some(now);
        article.updated_at = now;
        Ok(article.clone())
    }

    async fn increment_view(&self, slug: &str) -> Result<(), StoreError> {
        let mut articles = self.articles.write().await;
        for article in articles.values_mut().filter(|a| a.slug == slug) {
            article.view_count += 1;
        }
        Ok(())
    }
}
