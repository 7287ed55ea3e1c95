//! SQLite-backed story node storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cyoa_domain::{StoryId, StoryNode, StoryNodeId};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::RowExt;
use crate::infrastructure::ports::{RepoError, StoryNodeRepo};

const COLUMNS: &str = "id, story_id, parent_node_id, choice_text, setting, image_url, consumed_at";

pub struct SqliteStoryNodeRepo {
    pool: SqlitePool,
}

impl SqliteStoryNodeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_node(row: &SqliteRow) -> Result<StoryNode, RepoError> {
    Ok(StoryNode::from_parts(
        row.get_id("id")?,
        row.get_id("story_id")?,
        row.get_parent_id("parent_node_id")?,
        row.read("choice_text")?,
        row.read("setting")?,
        row.read("image_url")?,
        row.get_opt_datetime("consumed_at")?,
    ))
}

#[async_trait]
impl StoryNodeRepo for SqliteStoryNodeRepo {
    async fn get(&self, id: StoryNodeId) -> Result<Option<StoryNode>, RepoError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM story_nodes WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("node.get", e))?;

        row.as_ref().map(row_to_node).transpose()
    }

    async fn save(&self, node: &StoryNode) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO story_nodes (id, story_id, parent_node_id, choice_text, setting, image_url, consumed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                story_id = excluded.story_id,
                parent_node_id = excluded.parent_node_id,
                choice_text = excluded.choice_text,
                setting = excluded.setting,
                image_url = excluded.image_url,
                consumed_at = excluded.consumed_at
            "#,
        )
        .bind(node.id().to_string())
        .bind(node.story_id().to_string())
        .bind(node.parent_node_id().map(|id| id.to_string()))
        .bind(node.choice_text())
        .bind(node.setting())
        .bind(node.image_url())
        .bind(node.consumed_at().map(|at| at.to_rfc3339()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("node.save", e))?;

        Ok(())
    }

    async fn list_for_story(&self, story_id: StoryId) -> Result<Vec<StoryNode>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM story_nodes WHERE story_id = ? ORDER BY rowid"
        ))
        .bind(story_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("node.list_for_story", e))?;

        rows.iter().map(row_to_node).collect()
    }

    async fn mark_consumed(&self, id: StoryNodeId, at: DateTime<Utc>) -> Result<(), RepoError> {
        let result =
            sqlx::query("UPDATE story_nodes SET consumed_at = COALESCE(consumed_at, ?) WHERE id = ?")
                .bind(at.to_rfc3339())
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("node.mark_consumed", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("StoryNode", id));
        }
        Ok(())
    }
}
