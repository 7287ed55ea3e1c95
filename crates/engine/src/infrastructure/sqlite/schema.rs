//! SQLite schema initialization - tables and indexes.

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS stories (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL,
        title TEXT,
        description TEXT,
        image TEXT,
        public INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'PROCESSING',
        error_message TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS story_choices (
        id TEXT PRIMARY KEY NOT NULL,
        story_id TEXT NOT NULL REFERENCES stories(id) ON DELETE CASCADE,
        parent_id TEXT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        is_terminal INTEGER NOT NULL DEFAULT 0,
        explored INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS story_nodes (
        id TEXT PRIMARY KEY NOT NULL,
        story_id TEXT NOT NULL REFERENCES stories(id) ON DELETE CASCADE,
        parent_node_id TEXT,
        choice_text TEXT NOT NULL,
        setting TEXT NOT NULL,
        image_url TEXT,
        consumed_at TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_stories_user ON stories(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_story_choices_story ON story_choices(story_id)",
    "CREATE INDEX IF NOT EXISTS idx_story_nodes_story ON story_nodes(story_id)",
];

/// Create tables and indexes. Idempotent; called on every connect.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("schema", e))?;
    }

    tracing::info!("SQLite schema initialized (tables and indexes ensured)");
    Ok(())
}
