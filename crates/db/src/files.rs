// crates/db/src/files.rs
// File rows: the things tags hang off.

use crate::{Database, DbResult};

impl Database {
    /// Insert or update a file row. Re-registering a file clears its
    /// `missing` flag.
    pub async fn upsert_file(&self, id: &str, path: &str, size: i64, modified: i64) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO files (id, path, size, modified, missing)
            VALUES (?1, ?2, ?3, ?4, 0)
            ON CONFLICT(id) DO UPDATE SET
                path = excluded.path,
                size = excluded.size,
                modified = excluded.modified,
                missing = 0
            "#,
        )
        .bind(id)
        .bind(path)
        .bind(size)
        .bind(modified)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Flag a file as missing from disk (or found again). Tags on missing
    /// files do not count towards tag frequencies.
    pub async fn set_file_missing(&self, id: &str, missing: bool) -> DbResult<bool> {
        let result = sqlx::query("UPDATE files SET missing = ?1 WHERE id = ?2")
            .bind(missing)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Look up a file's path by id.
    pub async fn file_path(&self, id: &str) -> DbResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT path FROM files WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|(path,)| path))
    }
}
