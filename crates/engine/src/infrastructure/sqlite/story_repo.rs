//! SQLite-backed story storage.

use async_trait::async_trait;
use cyoa_domain::{Story, StoryId, StoryStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::RowExt;
use crate::infrastructure::ports::{RepoError, StoryRepo};

const COLUMNS: &str =
    "id, user_id, title, description, image, public, status, error_message, created_at";

pub struct SqliteStoryRepo {
    pool: SqlitePool,
}

impl SqliteStoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_story(row: &SqliteRow) -> Result<Story, RepoError> {
    let status: String = row.read("status")?;
    let status: StoryStatus = status.parse().map_err(RepoError::serialization)?;

    Ok(Story::from_parts(
        row.get_id("id")?,
        row.read("user_id")?,
        row.read("title")?,
        row.read("description")?,
        row.read("image")?,
        row.get_flag("public")?,
        status,
        row.read("error_message")?,
        row.get_datetime("created_at")?,
    ))
}

#[async_trait]
impl StoryRepo for SqliteStoryRepo {
    async fn get(&self, id: StoryId) -> Result<Option<Story>, RepoError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM stories WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("story.get", e))?;

        row.as_ref().map(row_to_story).transpose()
    }

    async fn save(&self, story: &Story) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO stories (id, user_id, title, description, image, public, status, error_message, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                title = excluded.title,
                description = excluded.description,
                image = excluded.image,
                public = excluded.public,
                status = excluded.status,
                error_message = excluded.error_message
            "#,
        )
        .bind(story.id().to_string())
        .bind(story.user_id())
        .bind(story.title())
        .bind(story.description())
        .bind(story.image())
        .bind(story.is_public())
        .bind(story.status().as_str())
        .bind(story.error_message())
        .bind(story.created_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("story.save", e))?;

        Ok(())
    }

    async fn delete(&self, id: StoryId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("story.delete", e))?;

        for statement in [
            "DELETE FROM story_choices WHERE story_id = ?",
            "DELETE FROM story_nodes WHERE story_id = ?",
        ] {
            sqlx::query(statement)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("story.delete", e))?;
        }

        let result = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("story.delete", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Story", id));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("story.delete", e))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Story>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM stories WHERE user_id = ? COLLATE NOCASE ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("story.list_for_user", e))?;

        rows.iter().map(row_to_story).collect()
    }
}
