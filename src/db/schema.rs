// Database schema initialization

use color_eyre::Result;

pub async fn create_schema(conn: &libsql::Connection) -> Result<()> {
    // One row per collection: the value is the whole JSON document.
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
        (),
    )
    .await?;

    Ok(())
}
