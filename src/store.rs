use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::info;

/// Thread-safe SQLite store for per-user bot records: the Yandex.Disk
/// access token and the user's private chat, once known.
#[derive(Clone)]
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

impl UserStore {
    /// Open or create the SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // journal_mode PRAGMA always returns the resulting mode, so use query_row
        let _: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;

        Self::run_migrations(&conn)?;

        info!("User store initialized at: {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                telegram_id INTEGER PRIMARY KEY,
                access_token TEXT,
                private_chat_id INTEGER,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    /// Stored Yandex.Disk access token for the user, if any.
    pub async fn access_token(&self, user_id: u64) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        let token: Option<Option<String>> = conn
            .query_row(
                "SELECT access_token FROM users WHERE telegram_id = ?1",
                rusqlite::params![user_id as i64],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to load access token")?;
        Ok(token.flatten())
    }

    pub async fn set_access_token(&self, user_id: u64, token: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (telegram_id, access_token) VALUES (?1, ?2)
             ON CONFLICT(telegram_id) DO UPDATE SET access_token = excluded.access_token",
            rusqlite::params![user_id as i64, token],
        )
        .context("Failed to store access token")?;
        Ok(())
    }

    /// Clears the stored token. Returns whether there was one.
    pub async fn clear_access_token(&self, user_id: u64) -> Result<bool> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE users SET access_token = NULL
                 WHERE telegram_id = ?1 AND access_token IS NOT NULL",
                rusqlite::params![user_id as i64],
            )
            .context("Failed to clear access token")?;
        Ok(changed > 0)
    }

    /// Remembers the user's private chat so later replies carrying secret
    /// information have somewhere to go.
    pub async fn remember_private_chat(&self, user_id: u64, chat_id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (telegram_id, private_chat_id) VALUES (?1, ?2)
             ON CONFLICT(telegram_id) DO UPDATE SET private_chat_id = excluded.private_chat_id",
            rusqlite::params![user_id as i64, chat_id],
        )
        .context("Failed to remember private chat")?;
        Ok(())
    }

    pub async fn private_chat(&self, user_id: u64) -> Result<Option<i64>> {
        let conn = self.conn.lock().await;
        let chat_id: Option<Option<i64>> = conn
            .query_row(
                "SELECT private_chat_id FROM users WHERE telegram_id = ?1",
                rusqlite::params![user_id as i64],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to load private chat")?;
        Ok(chat_id.flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_access_token_round_trip() {
        let store = UserStore::open_in_memory().unwrap();

        assert_eq!(store.access_token(1).await.unwrap(), None);

        store.set_access_token(1, "token-a").await.unwrap();
        assert_eq!(store.access_token(1).await.unwrap().as_deref(), Some("token-a"));

        // Re-granting replaces the old token
        store.set_access_token(1, "token-b").await.unwrap();
        assert_eq!(store.access_token(1).await.unwrap().as_deref(), Some("token-b"));
    }

    #[tokio::test]
    async fn test_clear_reports_whether_a_token_existed() {
        let store = UserStore::open_in_memory().unwrap();

        assert!(!store.clear_access_token(7).await.unwrap());

        store.set_access_token(7, "token").await.unwrap();
        assert!(store.clear_access_token(7).await.unwrap());
        assert_eq!(store.access_token(7).await.unwrap(), None);

        // Second revoke finds nothing
        assert!(!store.clear_access_token(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_private_chat_is_remembered() {
        let store = UserStore::open_in_memory().unwrap();

        assert_eq!(store.private_chat(3).await.unwrap(), None);

        store.remember_private_chat(3, 333).await.unwrap();
        assert_eq!(store.private_chat(3).await.unwrap(), Some(333));
    }

    #[tokio::test]
    async fn test_token_and_private_chat_do_not_clobber_each_other() {
        let store = UserStore::open_in_memory().unwrap();

        store.remember_private_chat(5, 555).await.unwrap();
        store.set_access_token(5, "token").await.unwrap();

        assert_eq!(store.private_chat(5).await.unwrap(), Some(555));
        assert_eq!(store.access_token(5).await.unwrap().as_deref(), Some("token"));
    }
}
