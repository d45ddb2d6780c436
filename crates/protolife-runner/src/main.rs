//! Headless runner: drives a protolife world frame by frame.

#[macro_use]
mod telemetry;
mod checkpoint;

use anyhow::{Context, Result};
use checkpoint::CheckpointManager;
use clap::Parser;
use protolife_core::{RunnerConfig, SimConfig};
use protolife_world::World;
use std::path::PathBuf;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "protolife-runner", version, about = "Run a protolife world without a display")]
struct Cli {
    /// Simulation config file (JSON); missing fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,

    #[arg(long, env = "PROTOLIFE_SEED")]
    seed: Option<u64>,

    /// Stop after this many ticks; 0 runs until interrupted
    #[arg(long)]
    ticks: Option<u64>,

    #[arg(long)]
    ticks_per_frame: Option<u32>,

    /// Frame period in milliseconds
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Snapshot to start from
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a snapshot here on exit
    #[arg(long)]
    save: Option<PathBuf>,

    #[arg(long)]
    checkpoint_dir: Option<String>,

    /// Checkpoint interval in ticks
    #[arg(long)]
    checkpoint_every: Option<u64>,

    #[arg(long)]
    keep_checkpoints: Option<usize>,

    /// Log JSON lines instead of human-readable text
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SimConfig::default(),
        };
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate().context("invalid simulation config")?;
        Ok(config)
    }

    fn runner_config(&self) -> RunnerConfig {
        let mut runner = RunnerConfig::default();
        if let Some(ticks) = self.ticks {
            runner.max_ticks = ticks;
        }
        if let Some(ticks) = self.ticks_per_frame {
            runner.ticks_per_frame = ticks.max(1);
        }
        if let Some(ms) = self.frame_ms {
            runner.frame_interval_ms = ms.max(1);
        }
        if self.checkpoint_dir.is_some() {
            runner.checkpoint_dir = self.checkpoint_dir.clone();
        }
        if let Some(every) = self.checkpoint_every {
            runner.checkpoint_every_ticks = every;
        }
        if let Some(keep) = self.keep_checkpoints {
            runner.keep_checkpoints = keep;
        }
        runner.json_logs = self.log_json;
        runner
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let runner = cli.runner_config();

    telemetry::init_tracing(runner.json_logs)?;

    info!("Starting protolife runner");

    let config = cli.sim_config()?;
    let mut world = World::new(config).context("failed to create world")?;
    let checkpoints = runner.checkpoint_dir.as_deref().map(CheckpointManager::new);

    if let Some(path) = &cli.load {
        world
            .load_snapshot(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?;
    } else if let Some(manager) = &checkpoints {
        manager
            .restore_latest(&mut world)
            .await
            .with_context(|| format!("failed to restore checkpoint from {:?}", manager.dir()))?;
    }

    run(&mut world, &runner, checkpoints.as_ref()).await;

    info!("Shutting down runner");

    if let Some(path) = &cli.save {
        world
            .save_snapshot(path)
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
    }
    if let Some(manager) = &checkpoints {
        manager
            .create_checkpoint(&world)
            .await
            .context("failed to write final checkpoint")?;
        manager.cleanup_old_checkpoints(runner.keep_checkpoints).await?;
    }

    Ok(())
}

/// Step the world every frame until the tick budget is spent or a shutdown
/// signal arrives
async fn run(world: &mut World, runner: &RunnerConfig, checkpoints: Option<&CheckpointManager>) {
    let mut frames = interval(Duration::from_millis(runner.frame_interval_ms));
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let start_tick = world.tick_count();
    let mut last_checkpoint = start_tick;
    let mut frame: u64 = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = frames.tick() => {}
        }

        let ticks = frame_ticks(runner, world.tick_count() - start_tick);
        if ticks == 0 {
            info!(ticks = world.tick_count() - start_tick, "Tick budget spent");
            break;
        }
        world.run(ticks);
        frame += 1;

        if runner.log_every_frames > 0 && frame % runner.log_every_frames == 0 {
            report(world);
        }

        if let Some(manager) = checkpoints {
            if runner.checkpoint_every_ticks > 0
                && world.tick_count() - last_checkpoint >= runner.checkpoint_every_ticks
            {
                last_checkpoint = world.tick_count();
                match manager.create_checkpoint(world).await {
                    Ok(_) => {
                        record_counter!("checkpoints_written", 1u64);
                        if let Err(e) = manager.cleanup_old_checkpoints(runner.keep_checkpoints).await {
                            warn!("Failed to prune checkpoints: {}", e);
                        }
                    }
                    Err(e) => error!("Failed to create checkpoint: {}", e),
                }
            }
        }
    }

    report(world);
}

/// Ticks to run this frame given how many have already run
fn frame_ticks(runner: &RunnerConfig, elapsed: u64) -> u64 {
    let per_frame = u64::from(runner.ticks_per_frame);
    if runner.max_ticks == 0 {
        per_frame
    } else {
        per_frame.min(runner.max_ticks.saturating_sub(elapsed))
    }
}

fn report(world: &World) {
    let stats = world.stats();
    let generation = world.generation();
    let update_count = world.update_count();
    record_gauge!("population_life", stats.life as u64, generation => generation, update_count => update_count);
    record_gauge!("population_organic", stats.organic as u64, generation => generation);
    record_gauge!("population_mineral", stats.mineral as u64, generation => generation);
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
