use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bot_engine::{supervise, RestartPolicy, StreamWatcher, TriggerPolicy};
use pradon_core::BotConfig;
use reddit_client::{FeedKind, ItemFeed, RedditClient, RedditCredentials};
use response_store::ResponseStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("pradon=info,bot_engine=info,reddit_client=info,response_store=info")
        }))
        .init();

    let config = BotConfig::from_env().context("loading configuration")?;
    info!(
        subreddit = %config.subreddit,
        username = %config.username,
        "starting pradon"
    );

    let credentials = RedditCredentials {
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
        username: config.username.clone(),
        password: config.password.clone(),
        user_agent: config.user_agent.clone(),
    };
    let client = Arc::new(RedditClient::new(credentials).context("building Reddit client")?);
    let store = ResponseStore::open(&config.database_path)
        .await
        .context("opening response store")?;

    let policy = TriggerPolicy::new(config.keywords.clone(), config.opt_out_marker.clone());
    let restart_policy = RestartPolicy::with_initial_delay(config.restart_delay);

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
                return;
            }
            info!("shutdown signal received");
            shutdown.cancel();
        });
    }

    let mut tasks = Vec::new();
    for kind in [FeedKind::Submissions, FeedKind::Comments, FeedKind::Inbox] {
        let watcher = StreamWatcher::new(
            kind.label(),
            policy.clone(),
            config.quotes.clone(),
            config.username.clone(),
            client.clone(),
            store.clone(),
        );
        let client = client.clone();
        let subreddit = config.subreddit.clone();
        let poll_interval = config.poll_interval;
        let restart_policy = restart_policy.clone();
        let shutdown = shutdown.clone();

        tasks.push(tokio::spawn(async move {
            supervise(kind.label(), restart_policy, shutdown, move |cancel| {
                let watcher = watcher.clone();
                let client = client.clone();
                let subreddit = subreddit.clone();
                async move {
                    let mut feed = ItemFeed::new(client, kind, subreddit, poll_interval);
                    watcher.run(&mut feed, &cancel).await
                }
            })
            .await;
        }));
    }

    for result in futures::future::join_all(tasks).await {
        if let Err(e) = result {
            error!(error = %e, "watcher task ended abnormally");
        }
    }

    info!("pradon stopped");
    Ok(())
}
