//! User Storage
//! Mission: Persist user accounts with SQLite behind a swappable trait

use crate::auth::models::{NewUser, Role, User};
use crate::db::Database;
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

/// Credential store capability set
pub trait UserStore: Send + Sync {
    /// Insert a user; a taken username yields `StoreError::Duplicate`
    fn create(&self, user: NewUser) -> Result<User, StoreError>;

    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    fn count_admins(&self) -> Result<u64, StoreError>;
}

/// User storage with SQLite backend
#[derive(Clone)]
pub struct SqliteUserStore {
    db: Database,
}

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at, updated_at";

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("bad timestamp {:?}: {}", raw, e)))
}

struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            role: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    fn into_user(self) -> Result<User, StoreError> {
        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            // Unknown roles never grant privileges
            role: self.role.parse().unwrap_or_default(),
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl SqliteUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn find_where(&self, clause: &str, key: &dyn rusqlite::ToSql) -> Result<Option<User>, StoreError> {
        let conn = self.db.lock();
        let sql = format!("SELECT {} FROM users WHERE {}", USER_COLUMNS, clause);
        let row = conn
            .query_row(&sql, &[key], UserRow::from_row)
            .optional()?;

        row.map(UserRow::into_user).transpose()
    }
}

impl UserStore for SqliteUserStore {
    fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let stamp = now.to_rfc3339();

        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO users (username, password_hash, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![user.username, user.password_hash, user.role.as_str(), stamp],
        )
        .map_err(|e| StoreError::from_sqlite(e, "username"))?;
        let id = conn.last_insert_rowid();

        info!("✅ Created user: {} ({})", user.username, user.role.as_str());

        Ok(User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        })
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_where("username = ?1", &username)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        self.find_where("id = ?1", &id)
    }

    fn count_admins(&self) -> Result<u64, StoreError> {
        let conn = self.db.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE role = ?1",
            params![Role::Admin.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteUserStore {
        SqliteUserStore::new(Database::open_in_memory().unwrap())
    }

    fn new_user(name: &str, role: Role) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: "hash".to_string(),
            role,
        }
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let store = create_test_store();

        let created = store.create(new_user("writer1", Role::User)).unwrap();
        assert!(created.id > 0);
        assert_eq!(created.role, Role::User);

        let by_name = store.find_by_username("writer1").unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.password_hash, "hash");

        let by_id = store.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(by_id.username, "writer1");
    }

    #[test]
    fn test_missing_user_is_none() {
        let store = create_test_store();
        assert!(store.find_by_username("ghost").unwrap().is_none());
        assert!(store.find_by_id(999).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = create_test_store();
        store.create(new_user("alice", Role::User)).unwrap();

        let err = store.create(new_user("alice", Role::Admin)).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn test_count_admins() {
        let store = create_test_store();
        assert_eq!(store.count_admins().unwrap(), 0);

        store.create(new_user("alice", Role::User)).unwrap();
        store.create(new_user("root", Role::Admin)).unwrap();
        store.create(new_user("ops", Role::Admin)).unwrap();
        assert_eq!(store.count_admins().unwrap(), 2);
    }

    #[test]
    fn test_unknown_role_downgrades_to_user() {
        let db = Database::open_in_memory().unwrap();
        db.lock()
            .execute(
                "INSERT INTO users (username, password_hash, role, created_at, updated_at)
                 VALUES ('odd', 'x', 'superuser', ?1, ?1)",
                params![Utc::now().to_rfc3339()],
            )
            .unwrap();

        let store = SqliteUserStore::new(db);
        let user = store.find_by_username("odd").unwrap().unwrap();
        assert_eq!(user.role, Role::User);
    }
}
