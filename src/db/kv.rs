use color_eyre::Result;

use super::Db;
use crate::services::policy::KeyValueStore;

impl KeyValueStore for Db {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        let mut rows = conn
            .query(
                "SELECT value FROM kv WHERE key = ?1",
                libsql::params![key.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            libsql::params![key.to_string(), value.to_string()],
        )
        .await?;

        tracing::debug!("stored {} bytes under {key}", value.len());
        Ok(())
    }
}
