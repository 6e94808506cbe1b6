use std::process::ExitCode;
use std::sync::Arc;

use garrisonboard::{
    config, AppError, Config, CrconClient, DiscordPublisher, DiscordSettings, Scheduler,
    SchedulerConfig, ScoreTracker,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // loaded before tracing so RUST_LOG may come from the file
    let env_file = config::load_env_file();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garrisonboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match env_file {
        Ok(Some(path)) => info!(path = %path.display(), "Loaded environment file"),
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "Garrison leaderboard failed to start");
            return ExitCode::FAILURE;
        }
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Garrison leaderboard stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    info!(api_base_url = %config.api_base_url, "Starting garrison leaderboard");

    let source = Arc::new(CrconClient::new(
        config.api_base_url.clone(),
        config.api_token.clone(),
        config.http_timeout,
    )?);
    let publisher = Arc::new(
        DiscordPublisher::connect(DiscordSettings {
            api_base_url: config.discord_api_base_url.clone(),
            token: config.discord_token.clone(),
            channel_id: config.discord_channel_id.clone(),
            timeout: config.http_timeout,
            leaderboard_size: config.leaderboard_size,
        })
        .await?,
    );
    let tracker = Arc::new(ScoreTracker::new(config.scoring.clone()));

    let scheduler = Scheduler::builder(source, tracker, publisher)
        .with_config(SchedulerConfig {
            poll_interval: config.poll_interval,
            publish_interval: config.publish_interval,
            leaderboard_size: config.leaderboard_size,
        })
        .build();

    let shutdown = scheduler.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                shutdown.shutdown();
            }
            Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    scheduler.run().await?;
    Ok(())
}
