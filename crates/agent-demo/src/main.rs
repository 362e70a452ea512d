//! Sample agent entry point.
mod agent;
mod config;

use anyhow::{Context, Result};
use behavior_tree::{Executor, TreeDescription};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::agent::{Agent, Area};
use crate::config::{Cli, DemoConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = DemoConfig::from_env().with_cli(Cli::parse());
    let _guard = setup_logging(&config)?;

    let description = TreeDescription::from_path(&config.tree_path)
        .with_context(|| format!("Failed to load tree: {}", config.tree_path.display()))?;

    let agent = Agent::new(Area::default(), config.wait);
    let bindings = agent.bindings();
    if let Err(err) = bindings.ensure_complete() {
        warn!("{err}");
    }

    let mut executor = Executor::load_with(config.tree.clone(), &description, &bindings)
        .context("Failed to build behavior tree")?;
    info!(
        agent = %config.tree.agent,
        nodes = executor.tree().node_count(),
        "Loaded {}",
        config.tree_path.display()
    );
    debug!("\n{}", executor.tree().render());

    let mut frames = tokio::time::interval(config.frame_interval);
    let mut frame: u64 = 0;
    while config.frames == 0 || frame < config.frames {
        tokio::select! {
            _ = frames.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }

        let outcome = executor.tick();
        let position = agent.position();
        debug!(frame, ?outcome, x = position.x, in_range = agent.in_range(), "frame");
        frame += 1;
    }

    executor.wait_idle().await;

    let stats = executor.stats();
    let position = agent.position();
    info!(
        frames = frame,
        evaluated = stats.evaluated,
        dropped = stats.dropped,
        actions = stats.actions_queued,
        failed_drains = stats.failed_drains,
        x = position.x,
        in_range = agent.in_range(),
        "Demo finished"
    );
    Ok(())
}

/// Setup logging to stderr, plus a file when a log directory is configured.
fn setup_logging(config: &DemoConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, "agent-demo.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = &config.log_dir {
        info!("Log file: {}/agent-demo.log", dir.display());
    }

    Ok(guard)
}
