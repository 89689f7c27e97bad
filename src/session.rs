use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::models::User;

const TOKEN_KEY: &str = "auth_token";
const USER_KEY: &str = "current_user";

/// Persists the bearer token and signed-in user between runs, until logout.
pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path.replace("sqlite://", ""))?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(SessionStore { conn })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        self.set(TOKEN_KEY, token)
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.get(TOKEN_KEY)
    }

    pub fn save_user(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        self.set(USER_KEY, &json)
    }

    /// A stored user that no longer decodes is treated as absent.
    pub fn user(&self) -> Result<Option<User>> {
        Ok(self
            .get(USER_KEY)?
            .and_then(|json| serde_json::from_str(&json).ok()))
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute(
            "DELETE FROM kv_store WHERE key IN (?1, ?2)",
            params![TOKEN_KEY, USER_KEY],
        )?;
        Ok(())
    }
}
