// crates/db/src/tags.rs
// Tag rows and tag frequency queries.

use chrono::Utc;
use mediatag_types::{Tag, TagFrequency};
use sqlx::Row;

use crate::{Database, DbResult};

/// Escape character used in LIKE patterns built by [`escape_like`].
const LIKE_ESCAPE: &str = "\\";

/// Escape `%`, `_` and the escape character itself so `input` matches
/// literally inside a LIKE pattern.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '%' || c == '_' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn frequency_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TagFrequency, sqlx::Error> {
    let tag: String = row.try_get("tag")?;
    let freq: i64 = row.try_get("freq")?;
    Ok(TagFrequency::new(tag, freq.max(0) as u64))
}

impl Database {
    /// Every live tag with the number of distinct files carrying it.
    ///
    /// Only counts tag rows that are not deleted on files that are not
    /// missing. Ordered by tag ascending, then count descending; the
    /// autocomplete rebuild reads this as its snapshot.
    pub async fn all_tags_not_missing_not_deleted(&self) -> DbResult<Vec<TagFrequency>> {
        let rows = sqlx::query(
            r#"
            SELECT t.tag AS tag, COUNT(DISTINCT t.file_id) AS freq
            FROM tags t
            JOIN files f ON f.id = t.file_id
            WHERE f.missing = 0 AND t.deleted = 0
            GROUP BY t.tag
            ORDER BY t.tag ASC, freq DESC
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        let tags = rows
            .iter()
            .map(frequency_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Most used tags, optionally restricted to files under a directory.
    ///
    /// `path_prefix` is treated as a directory: a trailing `/` is added when
    /// absent, so `/media/cats` does not match `/media/catsup/x.jpg`.
    pub async fn top_tags(&self, path_prefix: Option<&str>, limit: u32) -> DbResult<Vec<TagFrequency>> {
        let pattern = path_prefix.map(|p| {
            let mut dir = p.to_string();
            if !dir.ends_with('/') {
                dir.push('/');
            }
            format!("{}%", escape_like(&dir))
        });

        let rows = sqlx::query(
            r#"
            SELECT t.tag AS tag, COUNT(DISTINCT t.file_id) AS freq
            FROM tags t
            JOIN files f ON f.id = t.file_id
            WHERE f.missing = 0 AND t.deleted = 0
              AND (?1 IS NULL OR f.path LIKE ?1 ESCAPE ?2)
            GROUP BY t.tag
            ORDER BY freq DESC, t.tag ASC
            LIMIT ?3
            "#,
        )
        .bind(pattern)
        .bind(LIKE_ESCAPE)
        .bind(limit as i64)
        .fetch_all(self.pool())
        .await?;

        let tags = rows
            .iter()
            .map(frequency_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Tags attached to a file, optionally including soft-deleted rows.
    pub async fn tags_for_file(&self, file_id: &str, include_deleted: bool) -> DbResult<Vec<Tag>> {
        let rows: Vec<(String, String, i64, bool)> = sqlx::query_as(
            r#"
            SELECT tag, cls, modified, deleted FROM tags
            WHERE file_id = ?1 AND (?2 OR deleted = 0)
            ORDER BY tag ASC, cls ASC
            "#,
        )
        .bind(file_id)
        .bind(include_deleted)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(tag, cls, modified, deleted)| Tag {
                tag,
                cls,
                modified,
                deleted,
            })
            .collect())
    }

    /// Attach a tag to a file, reviving a soft-deleted row if present.
    ///
    /// Returns `true` when the file did not carry `tag` (under any class)
    /// before the call, i.e. when the tag's file count went up by one.
    pub async fn add_tag(&self, file_id: &str, tag: &str, cls: &str) -> DbResult<bool> {
        let now = Utc::now().timestamp_millis();
        let mut tx = self.pool().begin().await?;

        let (before,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tags WHERE file_id = ?1 AND tag = ?2 AND deleted = 0",
        )
        .bind(file_id)
        .bind(tag)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO tags (file_id, tag, cls, modified, deleted)
            VALUES (?1, ?2, ?3, ?4, 0)
            ON CONFLICT(file_id, tag, cls) DO UPDATE SET
                deleted = 0,
                modified = excluded.modified
            WHERE tags.deleted = 1
            "#,
        )
        .bind(file_id)
        .bind(tag)
        .bind(cls)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(before == 0)
    }

    /// Soft-delete a tag row on a file.
    ///
    /// Returns `true` when the file no longer carries `tag` under any class
    /// as a result, i.e. when the tag's file count went down by one.
    pub async fn remove_tag(&self, file_id: &str, tag: &str, cls: &str) -> DbResult<bool> {
        let now = Utc::now().timestamp_millis();
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE tags SET deleted = 1, modified = ?4
            WHERE file_id = ?1 AND tag = ?2 AND cls = ?3 AND deleted = 0
            "#,
        )
        .bind(file_id)
        .bind(tag)
        .bind(cls)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let (remaining,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tags WHERE file_id = ?1 AND tag = ?2 AND deleted = 0",
        )
        .bind(file_id)
        .bind(tag)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0 && remaining == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
