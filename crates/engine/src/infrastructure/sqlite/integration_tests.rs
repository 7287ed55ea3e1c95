//! SQLite adapter tests against a temporary database file.

use chrono::{DateTime, TimeZone, Utc};
use cyoa_domain::{build_forest, ChoiceId, Story, StoryChoice, StoryNode, StoryStatus};
use sqlx::SqlitePool;
use tempfile::TempDir;

use super::{connect, SqliteRepositories};
use crate::infrastructure::ports::{RepoError, StoryChoiceRepo, StoryNodeRepo, StoryRepo};

fn fixed_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

async fn setup() -> (TempDir, SqlitePool, SqliteRepositories) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stories.db");
    let pool = connect(path.to_str().unwrap()).await.unwrap();
    let repos = SqliteRepositories::new(pool.clone());
    (dir, pool, repos)
}

async fn saved_story(repos: &SqliteRepositories, user: &str) -> Story {
    let story = Story::new(user, fixed_time()).with_title("The Lighthouse");
    repos.story.save(&story).await.unwrap();
    story
}

#[tokio::test]
async fn story_round_trips_and_updates_in_place() {
    let (_dir, _pool, repos) = setup().await;
    let mut story = saved_story(&repos, "keeper@example.com").await;

    story.mark_generated().unwrap();
    story.set_public(true);
    repos.story.save(&story).await.unwrap();

    let loaded = repos.story.get(story.id()).await.unwrap().unwrap();
    assert_eq!(loaded, story);
    assert_eq!(loaded.status(), StoryStatus::Generated);

    let listed = repos.story.list_for_user("KEEPER@example.com").await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn deleting_a_story_removes_its_choices_and_nodes() {
    let (_dir, _pool, repos) = setup().await;
    let story = saved_story(&repos, "keeper@example.com").await;
    let root = StoryChoice::root(story.id(), "Climb the stairs", "").unwrap();
    repos.choice.save(&root).await.unwrap();
    let node = StoryNode::new(story.id(), None, "Climb the stairs", "A spiral stair");
    repos.node.save(&node).await.unwrap();

    repos.story.delete(story.id()).await.unwrap();

    assert!(repos.story.get(story.id()).await.unwrap().is_none());
    assert!(repos.choice.list_for_story(story.id()).await.unwrap().is_empty());
    assert!(repos.node.get(node.id()).await.unwrap().is_none());

    let err = repos.story.delete(story.id()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn choices_list_in_insertion_order() {
    let (_dir, _pool, repos) = setup().await;
    let story = saved_story(&repos, "keeper@example.com").await;
    let root = StoryChoice::root(story.id(), "Begin", "").unwrap();
    let b = StoryChoice::branch(&root, "B", "").unwrap();
    let a = StoryChoice::branch(&root, "A", "").unwrap();
    for choice in [&b, &root, &a] {
        repos.choice.save(choice).await.unwrap();
    }

    let titles: Vec<String> = repos
        .choice
        .list_for_story(story.id())
        .await
        .unwrap()
        .iter()
        .map(|c| c.title().to_string())
        .collect();
    assert_eq!(titles, vec!["B", "Begin", "A"]);
}

#[tokio::test]
async fn legacy_null_string_parent_reads_as_root() {
    let (_dir, pool, repos) = setup().await;
    let story = saved_story(&repos, "keeper@example.com").await;
    let root_id = ChoiceId::new();
    let child_id = ChoiceId::new();

    sqlx::query(
        "INSERT INTO story_choices (id, story_id, parent_id, title, description, is_terminal, explored)
         VALUES (?, ?, 'NULL', 'Start', '', 0, 1), (?, ?, ?, 'Next', '', 0, 1)",
    )
    .bind(root_id.to_string())
    .bind(story.id().to_string())
    .bind(child_id.to_string())
    .bind(story.id().to_string())
    .bind(root_id.to_string())
    .execute(&pool)
    .await
    .unwrap();

    let choices = repos.choice.list_for_story(story.id()).await.unwrap();
    assert!(choices[0].is_root());
    let forest = build_forest(&choices, None).unwrap();
    assert_eq!(forest.len(), 2);

    // Reset skips the legacy root as well.
    assert_eq!(repos.choice.reset_exploration(story.id()).await.unwrap(), 1);
    let choices = repos.choice.list_for_story(story.id()).await.unwrap();
    assert!(choices[0].is_explored());
    assert!(!choices[1].is_explored());
}

#[tokio::test]
async fn reset_counts_only_choices_it_cleared() {
    let (_dir, _pool, repos) = setup().await;
    let story = saved_story(&repos, "keeper@example.com").await;
    let root = StoryChoice::root(story.id(), "Begin", "").unwrap();
    let mut seen = StoryChoice::branch(&root, "Seen", "").unwrap();
    seen.mark_explored();
    let unseen = StoryChoice::branch(&root, "Unseen", "").unwrap();
    for choice in [&root, &seen, &unseen] {
        repos.choice.save(choice).await.unwrap();
    }

    assert_eq!(repos.choice.reset_exploration(story.id()).await.unwrap(), 1);
    assert_eq!(repos.choice.reset_exploration(story.id()).await.unwrap(), 0);
    let explored: Vec<bool> = repos
        .choice
        .list_for_story(story.id())
        .await
        .unwrap()
        .iter()
        .map(|c| c.is_explored())
        .collect();
    assert_eq!(explored, vec![true, false, false]);
}

#[tokio::test]
async fn roots_are_written_as_sql_null() {
    let (_dir, pool, repos) = setup().await;
    let story = saved_story(&repos, "keeper@example.com").await;
    let root = StoryChoice::root(story.id(), "Begin", "").unwrap();
    repos.choice.save(&root).await.unwrap();

    let (nulls,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM story_choices WHERE parent_id IS NULL")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(nulls, 1);
}

#[tokio::test]
async fn set_explored_on_missing_choice_is_not_found() {
    let (_dir, _pool, repos) = setup().await;
    let err = repos
        .choice
        .set_explored(ChoiceId::new(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity_type: "StoryChoice", .. }));
}

#[tokio::test]
async fn mark_consumed_keeps_first_visit() {
    let (_dir, _pool, repos) = setup().await;
    let story = saved_story(&repos, "keeper@example.com").await;
    let node = StoryNode::new(story.id(), None, "Open the door", "A lantern room")
        .with_image_url("https://img.example/lantern.png");
    repos.node.save(&node).await.unwrap();

    let later = Utc.timestamp_opt(1_700_000_900, 0).unwrap();
    repos.node.mark_consumed(node.id(), fixed_time()).await.unwrap();
    repos.node.mark_consumed(node.id(), later).await.unwrap();

    let loaded = repos.node.get(node.id()).await.unwrap().unwrap();
    assert_eq!(loaded.consumed_at(), Some(fixed_time()));
    assert_eq!(loaded.image_url(), Some("https://img.example/lantern.png"));
}
