//! SQLite-backed story choice storage.

use async_trait::async_trait;
use cyoa_domain::{ChoiceId, StoryChoice, StoryId};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::RowExt;
use crate::infrastructure::ports::{RepoError, StoryChoiceRepo};

const COLUMNS: &str = "id, story_id, parent_id, title, description, is_terminal, explored";

pub struct SqliteStoryChoiceRepo {
    pool: SqlitePool,
}

impl SqliteStoryChoiceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_choice(row: &SqliteRow) -> Result<StoryChoice, RepoError> {
    Ok(StoryChoice::from_parts(
        row.get_id("id")?,
        row.get_id("story_id")?,
        row.get_parent_id("parent_id")?,
        row.read("title")?,
        row.read("description")?,
        row.get_flag("is_terminal")?,
        row.get_flag("explored")?,
    ))
}

#[async_trait]
impl StoryChoiceRepo for SqliteStoryChoiceRepo {
    async fn get(&self, id: ChoiceId) -> Result<Option<StoryChoice>, RepoError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM story_choices WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("choice.get", e))?;

        row.as_ref().map(row_to_choice).transpose()
    }

    async fn save(&self, choice: &StoryChoice) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO story_choices (id, story_id, parent_id, title, description, is_terminal, explored)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                story_id = excluded.story_id,
                parent_id = excluded.parent_id,
                title = excluded.title,
                description = excluded.description,
                is_terminal = excluded.is_terminal,
                explored = excluded.explored
            "#,
        )
        .bind(choice.id().to_string())
        .bind(choice.story_id().to_string())
        .bind(choice.parent_id().map(|id| id.to_string()))
        .bind(choice.title())
        .bind(choice.description())
        .bind(choice.is_terminal())
        .bind(choice.is_explored())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("choice.save", e))?;

        Ok(())
    }

    async fn list_for_story(&self, story_id: StoryId) -> Result<Vec<StoryChoice>, RepoError> {
        // rowid keeps insertion order, which the tree builder preserves.
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM story_choices WHERE story_id = ? ORDER BY rowid"
        ))
        .bind(story_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("choice.list_for_story", e))?;

        rows.iter().map(row_to_choice).collect()
    }

    async fn set_explored(&self, id: ChoiceId, explored: bool) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE story_choices SET explored = ? WHERE id = ?")
            .bind(explored)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("choice.set_explored", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("StoryChoice", id));
        }
        Ok(())
    }

    async fn reset_exploration(&self, story_id: StoryId) -> Result<u64, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE story_choices SET explored = 0
            WHERE story_id = ?
              AND explored <> 0
              AND parent_id IS NOT NULL
              AND TRIM(parent_id) <> ''
              AND UPPER(TRIM(parent_id)) <> 'NULL'
            "#,
        )
        .bind(story_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("choice.reset_exploration", e))?;

        Ok(result.rows_affected())
    }
}
