//! News Storage
//! Mission: Persist articles with SQLite behind a swappable trait
//!
//! Title search is a case-sensitive substring match (`instr`), so `%` and `_`
//! in the filter are matched literally.

use crate::auth::user_store::parse_timestamp;
use crate::db::Database;
use crate::error::StoreError;
use crate::news::models::{NewNews, News, PageRequest};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use tracing::debug;

/// Article store capability set
pub trait NewsStore: Send + Sync {
    fn create(&self, news: NewNews) -> Result<News, StoreError>;

    fn get(&self, id: i64) -> Result<Option<News>, StoreError>;

    /// Persist title/content and refresh `updated_at`; `None` if the row is gone
    fn update(&self, news: &News) -> Result<Option<News>, StoreError>;

    /// Remove permanently; `false` if nothing was deleted
    fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// One page of articles whose title contains `title` (empty = all), plus the matching total
    fn search(&self, title: &str, page: PageRequest) -> Result<(Vec<News>, u64), StoreError>;
}

#[derive(Clone)]
pub struct SqliteNewsStore {
    db: Database,
}

const NEWS_COLUMNS: &str = "id, title, content, author_id, created_at, updated_at";

struct NewsRow {
    id: i64,
    title: String,
    content: String,
    author_id: i64,
    created_at: String,
    updated_at: String,
}

impl NewsRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            author_id: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_news(self) -> Result<News, StoreError> {
        Ok(News {
            id: self.id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl SqliteNewsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl NewsStore for SqliteNewsStore {
    fn create(&self, news: NewNews) -> Result<News, StoreError> {
        let now = Utc::now();

        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO news (title, content, author_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![news.title, news.content, news.author_id, now.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();

        debug!("Created news {} by user {}", id, news.author_id);

        Ok(News {
            id,
            title: news.title,
            content: news.content,
            author_id: news.author_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: i64) -> Result<Option<News>, StoreError> {
        let conn = self.db.lock();
        let row = conn
            .query_row(
                &format!("SELECT {} FROM news WHERE id = ?1", NEWS_COLUMNS),
                params![id],
                NewsRow::from_row,
            )
            .optional()?;

        row.map(NewsRow::into_news).transpose()
    }

    fn update(&self, news: &News) -> Result<Option<News>, StoreError> {
        let now = Utc::now();

        let conn = self.db.lock();
        let changed = conn.execute(
            "UPDATE news SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
            params![news.title, news.content, now.to_rfc3339(), news.id],
        )?;

        if changed == 0 {
            return Ok(None);
        }

        Ok(Some(News {
            updated_at: now,
            ..news.clone()
        }))
    }

    fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.db.lock();
        let changed = conn.execute("DELETE FROM news WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn search(&self, title: &str, page: PageRequest) -> Result<(Vec<News>, u64), StoreError> {
        let mut conn = self.db.lock();

        // Count and page fetch share one read transaction so the total matches the page
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;

        let filter = "(?1 = '' OR instr(title, ?1) > 0)";
        let total: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM news WHERE {}", filter),
            params![title],
            |row| row.get(0),
        )?;

        let mut stmt = tx.prepare(&format!(
            "SELECT {} FROM news WHERE {} ORDER BY id ASC LIMIT ?2 OFFSET ?3",
            NEWS_COLUMNS, filter
        ))?;
        let rows = stmt
            .query_map(params![title, page.page_size, page.offset()], NewsRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        tx.commit()?;

        let items = rows
            .into_iter()
            .map(NewsRow::into_news)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, total as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> (SqliteNewsStore, i64) {
        let db = Database::open_in_memory().unwrap();
        let author_id = {
            let conn = db.lock();
            conn.execute(
                "INSERT INTO users (username, password_hash, created_at, updated_at)
                 VALUES ('author', 'x', ?1, ?1)",
                params![Utc::now().to_rfc3339()],
            )
            .unwrap();
            conn.last_insert_rowid()
        };
        (SqliteNewsStore::new(db), author_id)
    }

    fn draft(title: &str, author_id: i64) -> NewNews {
        NewNews {
            title: title.to_string(),
            content: format!("Body of {}", title),
            author_id,
        }
    }

    #[test]
    fn test_create_get_round_trip() {
        let (store, author) = create_test_store();
        let created = store.create(draft("Launch day", author)).unwrap();

        let fetched = store.get(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(store.get(created.id + 100).unwrap().is_none());
    }

    #[test]
    fn test_unknown_author_rejected() {
        let (store, author) = create_test_store();
        assert!(store.create(draft("Orphan", author + 1)).is_err());
    }

    #[test]
    fn test_update_refreshes_timestamp() {
        let (store, author) = create_test_store();
        let mut news = store.create(draft("Draft", author)).unwrap();

        news.title = "Final".to_string();
        let updated = store.update(&news).unwrap().unwrap();
        assert_eq!(updated.title, "Final");
        assert!(updated.updated_at >= news.created_at);
        assert_eq!(store.get(news.id).unwrap().unwrap().title, "Final");

        news.id += 100;
        assert!(store.update(&news).unwrap().is_none());
    }

    #[test]
    fn test_delete_is_permanent() {
        let (store, author) = create_test_store();
        let news = store.create(draft("Short lived", author)).unwrap();

        assert!(store.delete(news.id).unwrap());
        assert!(store.get(news.id).unwrap().is_none());
        assert!(!store.delete(news.id).unwrap());
    }

    #[test]
    fn test_search_paginates_with_total() {
        let (store, author) = create_test_store();
        for i in 0..15 {
            store.create(draft(&format!("Story {}", i), author)).unwrap();
        }

        let (first, total) = store.search("", PageRequest::new(1, 10)).unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(total, 15);

        let (second, total) = store.search("", PageRequest::new(2, 10)).unwrap();
        assert_eq!(second.len(), 5);
        assert_eq!(total, 15);
        assert_eq!(second[0].title, "Story 10");

        let (beyond, _) = store.search("", PageRequest::new(5, 10)).unwrap();
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_search_is_case_sensitive_substring() {
        let (store, author) = create_test_store();
        store.create(draft("Foo fighters", author)).unwrap();
        store.create(draft("All about Foobar", author)).unwrap();
        store.create(draft("food trucks", author)).unwrap();
        store.create(draft("100% real", author)).unwrap();

        let (items, total) = store.search("Foo", PageRequest::default()).unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().all(|n| n.title.contains("Foo")));

        let (items, _) = store.search("%", PageRequest::default()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "100% real");
    }
}
