// src/db/sqlite.rs
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;
use std::path::Path;
use std::str::FromStr;
use chrono::{DateTime, Utc};

use crate::models::{NewPassword, PasswordEntry, PasswordFilter};
use super::DbError;

const SELECT_ENTRY: &str =
    "SELECT id, site, username, password, notes, created_at, updated_at FROM passwords";

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(connection_string: &str) -> Result<Self, DbError> {
        // Parse the SQLite connection string
        let db_path = connection_string
            .strip_prefix("sqlite:")
            .map(|rest| rest.trim_start_matches("//"))
            .ok_or_else(|| DbError::ConfigError(format!("Invalid SQLite connection string: {}", connection_string)))?;

        let pool = if db_path == ":memory:" {
            // Every connection to :memory: is a separate database, so keep exactly one alive
            let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            // Create the database directory if it doesn't exist
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e|
                        DbError::InitError(format!("Failed to create database directory: {}", e))
                    )?;
                }
            }

            log::info!("Initializing SQLite database at: {}", db_path);

            let options = SqliteConnectOptions::new()
                .filename(db_path)
                .create_if_missing(true);
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS passwords (
                id TEXT PRIMARY KEY,
                site TEXT NOT NULL,
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_passwords_site ON passwords(site);")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    pub async fn add_password(&self, entry: &NewPassword) -> Result<Uuid, DbError> {
        let ids = self.add_passwords(std::slice::from_ref(entry)).await?;
        ids.into_iter()
            .next()
            .ok_or_else(|| DbError::SqlxError("Insert returned no id".into()))
    }

    /// Insert several entries in one transaction; either all land or none do.
    pub async fn add_passwords(&self, entries: &[NewPassword]) -> Result<Vec<Uuid>, DbError> {
        let now_str = Utc::now().to_rfc3339();
        let mut ids = Vec::with_capacity(entries.len());

        let mut tx = self.pool.begin().await?;

        for entry in entries {
            let password_id = Uuid::new_v4();

            sqlx::query(
                r#"
                INSERT INTO passwords (id, site, username, password, notes, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(password_id.to_string())
            .bind(&entry.site)
            .bind(&entry.username)
            .bind(&entry.password)
            .bind(normalize_notes(entry.notes.as_deref()))
            .bind(&now_str)
            .bind(&now_str)
            .execute(&mut *tx)
            .await?;

            ids.push(password_id);
        }

        tx.commit().await?;

        Ok(ids)
    }

    pub async fn get_all_passwords(&self) -> Result<Vec<PasswordEntry>, DbError> {
        let rows = sqlx::query(&format!("{} ORDER BY site COLLATE NOCASE ASC, username ASC", SELECT_ENTRY))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_entry).collect()
    }

    pub async fn get_filtered_passwords(&self, filter: &PasswordFilter) -> Result<Vec<PasswordEntry>, DbError> {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(site) = &filter.site_contains {
            conditions.push("site LIKE ? ESCAPE '\\'");
            params.push(format!("%{}%", escape_like(site)));
        }

        if let Some(username) = &filter.username_contains {
            conditions.push("username LIKE ? ESCAPE '\\'");
            params.push(format!("%{}%", escape_like(username)));
        }

        let mut query = SELECT_ENTRY.to_string();
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY site COLLATE NOCASE ASC, username ASC");

        let mut sqlx_query = sqlx::query(&query);
        for param in &params {
            sqlx_query = sqlx_query.bind(param);
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_entry).collect()
    }

    /// Entries whose site equals `site`, ignoring case.
    pub async fn get_passwords_for_site(&self, site: &str) -> Result<Vec<PasswordEntry>, DbError> {
        let rows = sqlx::query(&format!("{} WHERE site = ? COLLATE NOCASE ORDER BY username ASC", SELECT_ENTRY))
            .bind(site)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_entry).collect()
    }

    pub async fn get_password_by_id(&self, id: Uuid) -> Result<PasswordEntry, DbError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ENTRY))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)?;

        row_to_entry(&row)
    }

    pub async fn update_password(
        &self,
        id: Uuid,
        site: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
        notes: Option<&str>,
    ) -> Result<(), DbError> {
        let id_str = id.to_string();

        let mut set_parts = Vec::new();
        let mut params: Vec<Option<String>> = Vec::new();

        if let Some(val) = site {
            set_parts.push("site = ?");
            params.push(Some(val.to_string()));
        }

        if let Some(val) = username {
            set_parts.push("username = ?");
            params.push(Some(val.to_string()));
        }

        if let Some(val) = password {
            set_parts.push("password = ?");
            params.push(Some(val.to_string()));
        }

        if let Some(val) = notes {
            set_parts.push("notes = ?");
            params.push(normalize_notes(Some(val)));
        }

        set_parts.push("updated_at = ?");
        params.push(Some(Utc::now().to_rfc3339()));

        let query = format!("UPDATE passwords SET {} WHERE id = ?", set_parts.join(", "));

        let mut sqlx_query = sqlx::query(&query);
        for param in params {
            sqlx_query = sqlx_query.bind(param);
        }
        sqlx_query = sqlx_query.bind(&id_str);

        let result = sqlx_query.execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }

    pub async fn delete_password(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM passwords WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }

    pub async fn get_password_count(&self) -> Result<usize, DbError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM passwords")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }
}

// Match `%`, `_` and `\` literally inside a LIKE pattern
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn normalize_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::SqlxError(format!("Invalid datetime: {}", e)))
}

fn row_to_entry(row: &SqliteRow) -> Result<PasswordEntry, DbError> {
    let id_str: String = row.get("id");
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DbError::SqlxError(format!("Invalid UUID: {}", e)))?;

    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    Ok(PasswordEntry {
        id,
        site: row.get("site"),
        username: row.get("username"),
        password: row.get("password"),
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.path().join("nested").join("test.db").display());
        let db = Database::connect(&url).await.unwrap();
        (dir, db)
    }

    fn entry(site: &str, username: &str) -> NewPassword {
        NewPassword {
            site: site.to_string(),
            username: username.to_string(),
            password: "Tr0ub4dor&3x".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn connect_creates_database_file() {
        let (dir, db) = temp_db().await;
        assert!(dir.path().join("nested").join("test.db").exists());
        assert_eq!(db.get_password_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_non_sqlite_url() {
        let err = Database::connect("postgres://localhost/vault").await.unwrap_err();
        assert!(matches!(err, DbError::ConfigError(_)));
    }

    #[tokio::test]
    async fn in_memory_database_keeps_data() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.add_password(&entry("example.com", "alice")).await.unwrap();
        assert_eq!(db.get_password_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn add_and_fetch_by_id() {
        let (_dir, db) = temp_db().await;
        let mut new = entry("example.com", "alice");
        new.notes = Some("  work account ".to_string());

        let id = db.add_password(&new).await.unwrap();
        let stored = db.get_password_by_id(id).await.unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.site, "example.com");
        assert_eq!(stored.username, "alice");
        assert_eq!(stored.password, "Tr0ub4dor&3x");
        assert_eq!(stored.notes.as_deref(), Some("work account"));
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn blank_notes_are_stored_as_null() {
        let (_dir, db) = temp_db().await;
        let mut new = entry("example.com", "alice");
        new.notes = Some("   ".to_string());

        let id = db.add_password(&new).await.unwrap();
        assert_eq!(db.get_password_by_id(id).await.unwrap().notes, None);
    }

    #[tokio::test]
    async fn list_is_sorted_by_site() {
        let (_dir, db) = temp_db().await;
        db.add_passwords(&[entry("zeta.io", "z"), entry("Alpha.com", "a"), entry("beta.org", "b")])
            .await
            .unwrap();

        let sites: Vec<String> = db.get_all_passwords().await.unwrap().into_iter().map(|e| e.site).collect();
        assert_eq!(sites, vec!["Alpha.com", "beta.org", "zeta.io"]);
    }

    #[tokio::test]
    async fn site_lookup_ignores_case() {
        let (_dir, db) = temp_db().await;
        db.add_passwords(&[entry("GitHub.com", "alice"), entry("github.com", "bob"), entry("gitlab.com", "carol")])
            .await
            .unwrap();

        let found = db.get_passwords_for_site("GITHUB.COM").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|e| e.site.eq_ignore_ascii_case("github.com")));
    }

    #[tokio::test]
    async fn filter_by_site_and_username() {
        let (_dir, db) = temp_db().await;
        db.add_passwords(&[entry("mail.example.com", "alice"), entry("shop.example.com", "bob"), entry("other.net", "alice")])
            .await
            .unwrap();

        let filter = PasswordFilter {
            site_contains: Some("example".into()),
            username_contains: Some("ali".into()),
        };
        let found = db.get_filtered_passwords(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].site, "mail.example.com");

        let all = db.get_filtered_passwords(&PasswordFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn filter_treats_wildcards_literally() {
        let (_dir, db) = temp_db().await;
        db.add_passwords(&[entry("my_site.com", "a"), entry("myxsite.com", "b"), entry("100%.net", "c")])
            .await
            .unwrap();

        let by_site = |fragment: &str| PasswordFilter {
            site_contains: Some(fragment.to_string()),
            username_contains: None,
        };

        let found = db.get_filtered_passwords(&by_site("my_site")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].site, "my_site.com");

        let found = db.get_filtered_passwords(&by_site("%")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].site, "100%.net");
    }

    #[test]
    fn escape_like_marks_special_characters() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("a_b%c\\d"), "a\\_b\\%c\\\\d");
    }

    #[tokio::test]
    async fn partial_update_changes_only_given_fields() {
        let (_dir, db) = temp_db().await;
        let id = db.add_password(&entry("example.com", "alice")).await.unwrap();

        db.update_password(id, None, Some("alice2"), Some("N3w!Passw0rd"), Some("rotated"))
            .await
            .unwrap();

        let stored = db.get_password_by_id(id).await.unwrap();
        assert_eq!(stored.site, "example.com");
        assert_eq!(stored.username, "alice2");
        assert_eq!(stored.password, "N3w!Passw0rd");
        assert_eq!(stored.notes.as_deref(), Some("rotated"));
        assert!(stored.updated_at >= stored.created_at);
    }

    #[tokio::test]
    async fn update_and_delete_missing_id() {
        let (_dir, db) = temp_db().await;
        let missing = Uuid::new_v4();

        assert!(matches!(
            db.update_password(missing, Some("x"), None, None, None).await,
            Err(DbError::NotFound)
        ));
        assert!(matches!(db.delete_password(missing).await, Err(DbError::NotFound)));
        assert!(matches!(db.get_password_by_id(missing).await, Err(DbError::NotFound)));
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let (_dir, db) = temp_db().await;
        let id = db.add_password(&entry("example.com", "alice")).await.unwrap();
        db.add_password(&entry("example.org", "bob")).await.unwrap();

        db.delete_password(id).await.unwrap();

        assert_eq!(db.get_password_count().await.unwrap(), 1);
        assert!(matches!(db.get_password_by_id(id).await, Err(DbError::NotFound)));
    }
}
