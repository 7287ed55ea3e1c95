//! Cyoa engine - prints a story's choice tree, node graph, path or progress as JSON.
//!
//! Usage: `cyoa-engine <user> <story-id> [tree|graph|progress|path <choice-id>]`

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cyoa_domain::{ChoiceId, StoryId};
use cyoa_engine::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    sqlite::{self, SqliteRepositories},
};
use cyoa_engine::App;

const USAGE: &str = "usage: cyoa-engine <user> <story-id> [tree|graph|progress|path <choice-id>]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = EngineConfig::from_env();

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (user, story_id, command) = match args.as_slice() {
        [user, story, rest @ ..] => (user.as_str(), story, rest),
        _ => bail!(USAGE),
    };
    let story_id: StoryId = story_id.parse().context("invalid story id")?;

    tracing::info!(db_path = %config.db_path, "Opening story database");
    let pool = sqlite::connect(&config.db_path).await?;
    let app = App::new(SqliteRepositories::new(pool), Arc::new(SystemClock::new()));
    let use_cases = &app.use_cases;

    let output = match command {
        [] => serde_json::to_string_pretty(
            &use_cases.navigation.ops.choice_tree(user, story_id).await?,
        )?,
        [cmd] if cmd == "tree" => serde_json::to_string_pretty(
            &use_cases.navigation.ops.choice_tree(user, story_id).await?,
        )?,
        [cmd] if cmd == "graph" => serde_json::to_string_pretty(
            &use_cases.navigation.ops.story_graph(user, story_id).await?,
        )?,
        [cmd] if cmd == "progress" => serde_json::to_string_pretty(
            &use_cases.progress.ops.summary(user, story_id).await?,
        )?,
        [cmd, choice] if cmd == "path" => {
            let choice_id: ChoiceId = choice.parse().context("invalid choice id")?;
            serde_json::to_string_pretty(
                &use_cases
                    .navigation
                    .ops
                    .choice_path(user, story_id, choice_id)
                    .await?,
            )?
        }
        _ => bail!(USAGE),
    };

    println!("{}", output);
    Ok(())
}
