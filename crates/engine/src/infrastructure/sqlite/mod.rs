//! SQLite database implementations.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

mod helpers;
mod schema;

mod choice_repo;
mod node_repo;
mod story_repo;

#[cfg(test)]
mod integration_tests;

pub use choice_repo::SqliteStoryChoiceRepo;
pub use node_repo::SqliteStoryNodeRepo;
pub use schema::ensure_schema;
pub use story_repo::SqliteStoryRepo;

/// Open (creating if needed) the database file at `db_path`.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database("connect", e))?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Create all SQLite repositories from a connection pool.
pub struct SqliteRepositories {
    pub story: Arc<SqliteStoryRepo>,
    pub choice: Arc<SqliteStoryChoiceRepo>,
    pub node: Arc<SqliteStoryNodeRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            story: Arc::new(SqliteStoryRepo::new(pool.clone())),
            choice: Arc::new(SqliteStoryChoiceRepo::new(pool.clone())),
            node: Arc::new(SqliteStoryNodeRepo::new(pool)),
        }
    }
}
