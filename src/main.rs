//! tally server binary.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tally::config::Config;
use tally::notify::SlackNotifier;
use tally::server::{self, AppState};
use tally::store::{MemoryStore, MongoStore, PollStore};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Slack poll bot.
#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Slack poll bot")]
struct Cli {
    /// Path to a JSON5 config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Socket address to bind, overriding config.
    #[arg(long)]
    listen: Option<String>,

    /// Use the in-memory store instead of MongoDB.
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run(Cli::parse()).await {
        error!("fatal: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if cli.memory_store {
        config.store.in_memory = true;
    }

    let store: Arc<dyn PollStore> = if config.store.in_memory {
        info!("using in-memory poll store");
        Arc::new(MemoryStore::new())
    } else {
        info!(url = %config.store.url, database = %config.store.database, "connecting to MongoDB");
        Arc::new(MongoStore::connect(&config.store.url, &config.store.database).await?)
    };

    let state = AppState {
        store,
        notifier: Arc::new(SlackNotifier::new(&config.slack.bot_token)),
        verification_token: config.slack.verification_token.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!(listen = %config.listen, "tally poll bot listening");
    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
