//! News Service
//! Mission: CRUD orchestration over the article store with author-or-admin access control

use crate::auth::models::Role;
use crate::error::ServiceError;
use crate::news::models::{NewNews, News, NewsPage, NewsPatch, PageRequest};
use crate::news::store::NewsStore;
use std::sync::Arc;
use tracing::{info, warn};

/// The single authorization rule for mutating an article.
/// Every update and delete path goes through this check.
pub fn can_modify(requester_id: i64, requester_role: Role, news: &News) -> bool {
    requester_id == news.author_id || requester_role.is_admin()
}

pub struct NewsService {
    store: Arc<dyn NewsStore>,
}

impl NewsService {
    pub fn new(store: Arc<dyn NewsStore>) -> Self {
        Self { store }
    }

    /// Persist a new article. `author_id` must come from the caller's validated session.
    pub fn create(&self, title: &str, content: &str, author_id: i64) -> Result<News, ServiceError> {
        if title.trim().is_empty() {
            return Err(ServiceError::validation("Title is required"));
        }
        if content.trim().is_empty() {
            return Err(ServiceError::validation("Content is required"));
        }

        let news = self.store.create(NewNews {
            title: title.to_string(),
            content: content.to_string(),
            author_id,
        })?;

        info!("📰 News {} created by user {}", news.id, author_id);
        Ok(news)
    }

    pub fn get(&self, id: i64) -> Result<News, ServiceError> {
        self.store.get(id)?.ok_or(ServiceError::NotFound)
    }

    /// Page through articles whose title contains `title_filter` (empty = no filter)
    pub fn list(&self, title_filter: &str, page: PageRequest) -> Result<NewsPage, ServiceError> {
        let (items, total) = self.store.search(title_filter, page)?;
        Ok(NewsPage { items, total, page })
    }

    /// Load an article and confirm the requester may modify it
    fn authorize(&self, id: i64, requester_id: i64, requester_role: Role) -> Result<News, ServiceError> {
        let news = self.get(id)?;

        if !can_modify(requester_id, requester_role, &news) {
            warn!(
                news_id = id,
                requester_id,
                role = requester_role.as_str(),
                "🚫 Modification denied"
            );
            return Err(ServiceError::Forbidden);
        }

        Ok(news)
    }

    pub fn update(
        &self,
        id: i64,
        patch: &NewsPatch,
        requester_id: i64,
        requester_role: Role,
    ) -> Result<News, ServiceError> {
        let mut news = self.authorize(id, requester_id, requester_role)?;
        patch.apply_to(&mut news);

        let updated = self.store.update(&news)?.ok_or(ServiceError::NotFound)?;

        info!("✏️  News {} updated by user {}", id, requester_id);
        Ok(updated)
    }

    pub fn delete(&self, id: i64, requester_id: i64, requester_role: Role) -> Result<(), ServiceError> {
        self.authorize(id, requester_id, requester_role)?;

        if !self.store.delete(id)? {
            return Err(ServiceError::NotFound);
        }

        info!("🗑️  News {} deleted by user {}", id, requester_id);
        Ok(())
    }
}
