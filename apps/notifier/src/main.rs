use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use chrono_tz::Tz;
use clap::Parser;
use notifier::{Config, Error, Pipeline, config::Schedule};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, info_span};
use tracing_futures::Instrument;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "coins-ticker")]
#[command(about = "Posts coins.ph price moves to Telegram")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    info!(
        path = %cli.config.display(),
        symbols = config.symbols.len(),
        "loaded configuration"
    );

    let pipeline = Pipeline::from_config(&config)?;

    match config.schedule {
        None => {
            if let Err(e) = pipeline.run().await {
                error!(error = ?e, "run failed");
                std::process::exit(1);
            }
            Ok(())
        }
        Some(schedule) => run_scheduled(schedule, Arc::new(pipeline)).await,
    }
}

async fn run_scheduled(schedule: Schedule, pipeline: Arc<Pipeline>) -> Result<()> {
    let tz: Tz = schedule
        .timezone
        .parse()
        .map_err(|_| Error::InvalidTimezone(schedule.timezone.clone()))?;

    let sched = JobScheduler::new().await?;

    sched
        .add(Job::new_async_tz(
            schedule.cron.as_str(),
            tz,
            move |_uuid, _l| {
                let pipeline = Arc::clone(&pipeline);

                Box::pin(
                    async move {
                        if let Err(e) = pipeline.run().await {
                            error!(error = ?e, "scheduled run failed");
                        }
                    }
                    .instrument(info_span!("scheduled_run")),
                )
            },
        )?)
        .await?;

    sched.shutdown_on_ctrl_c();
    sched.start().await?;
    info!(cron = %schedule.cron, timezone = %schedule.timezone, "scheduler started");

    shutdown_signal().await;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
