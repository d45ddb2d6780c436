//! Periodic world checkpoints on disk.

use protolife_core::{Error, Result};
use protolife_world::{Snapshot, World};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

const CHECKPOINT_VERSION: u32 = 1;
const PREFIX: &str = "checkpoint_";
const SUFFIX: &str = ".json";

#[derive(Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: u32,
    pub timestamp: i64,
    /// Ticks executed when the checkpoint was taken
    pub tick: u64,
    pub snapshot: Snapshot,
}

pub struct CheckpointManager {
    checkpoint_dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(checkpoint_dir: impl Into<PathBuf>) -> Self {
        Self {
            checkpoint_dir: checkpoint_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.checkpoint_dir
    }

    /// Write the world to `checkpoint_<tick>.json`
    pub async fn create_checkpoint(&self, world: &World) -> Result<PathBuf> {
        fs::create_dir_all(&self.checkpoint_dir).await?;

        let checkpoint = Checkpoint {
            version: CHECKPOINT_VERSION,
            timestamp: chrono::Utc::now().timestamp(),
            tick: world.tick_count(),
            snapshot: world.snapshot(),
        };
        let bytes = serde_json::to_vec(&checkpoint)?;

        let path = self
            .checkpoint_dir
            .join(format!("{}{}{}", PREFIX, checkpoint.tick, SUFFIX));
        fs::write(&path, &bytes).await?;

        info!(
            tick = checkpoint.tick,
            cells = checkpoint.snapshot.cells.len(),
            "Checkpoint created at {:?}",
            path
        );
        Ok(path)
    }

    /// Load the checkpoint with the highest tick, if there is one
    pub async fn latest_checkpoint(&self) -> Result<Option<Checkpoint>> {
        let mut checkpoints = self.list_checkpoints().await?;
        checkpoints.sort_by(|a, b| b.1.cmp(&a.1));

        let Some((path, _)) = checkpoints.into_iter().next() else {
            return Ok(None);
        };

        let bytes = fs::read(&path).await?;
        let checkpoint: Checkpoint = serde_json::from_slice(&bytes)?;
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(Error::Validation(format!(
                "Checkpoint {:?} has version {}, expected {}",
                path, checkpoint.version, CHECKPOINT_VERSION
            )));
        }
        Ok(Some(checkpoint))
    }

    /// Restore the world from the latest checkpoint. Returns the restored tick.
    pub async fn restore_latest(&self, world: &mut World) -> Result<Option<u64>> {
        let Some(checkpoint) = self.latest_checkpoint().await? else {
            warn!("No checkpoint found in {:?}", self.checkpoint_dir);
            return Ok(None);
        };

        world.restore(&checkpoint.snapshot)?;
        info!(
            tick = checkpoint.tick,
            timestamp = checkpoint.timestamp,
            generation = checkpoint.snapshot.generation,
            "Restored from checkpoint"
        );
        Ok(Some(checkpoint.tick))
    }

    /// Clean up old checkpoints, keeping only the most recent N
    pub async fn cleanup_old_checkpoints(&self, keep_count: usize) -> Result<()> {
        let mut checkpoints = self.list_checkpoints().await?;
        if checkpoints.len() <= keep_count {
            return Ok(());
        }

        checkpoints.sort_by(|a, b| b.1.cmp(&a.1));

        for (path, _) in checkpoints.iter().skip(keep_count) {
            if let Err(e) = fs::remove_file(path).await {
                warn!("Failed to remove old checkpoint {:?}: {}", path, e);
            } else {
                info!("Removed old checkpoint: {:?}", path);
            }
        }

        Ok(())
    }

    async fn list_checkpoints(&self) -> Result<Vec<(PathBuf, u64)>> {
        if !fs::try_exists(&self.checkpoint_dir).await? {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.checkpoint_dir).await?;
        let mut checkpoints = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let tick = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix(PREFIX))
                .and_then(|n| n.strip_suffix(SUFFIX))
                .and_then(|n| n.parse::<u64>().ok());
            if let Some(tick) = tick {
                checkpoints.push((path, tick));
            }
        }

        Ok(checkpoints)
    }
}
