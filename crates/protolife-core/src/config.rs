//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::{Direction, Position, Rgba};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World geometry and bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid (wraps horizontally)
    pub width: i32,
    /// Height of the world grid (bounded vertically)
    pub height: i32,
    /// Ticks per displayed generation
    pub updates_per_generation: u32,
    /// Where `reset` places the seed cell; `None` means (50, 5) clamped into the grid
    pub seed_position: Option<Position>,
    /// Heading of the seed cell
    pub seed_heading: Direction,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 80,
            updates_per_generation: 20,
            seed_position: None,
            seed_heading: Direction::North,
        }
    }
}

impl WorldConfig {
    /// The seed coordinate, clamped into the grid
    pub fn seed_position(&self) -> Position {
        let requested = self.seed_position.unwrap_or(Position::new(50, 5));
        Position::new(
            requested.x.clamp(0, (self.width - 1).max(0)),
            requested.y.clamp(0, (self.height - 1).max(0)),
        )
    }
}

/// Depth-banded sunlight and mineral availability
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Number of depth bands
    pub levels: usize,
    /// Photosynthesis energy in the top band
    pub max_energy_level: f32,
    /// Fraction of energy lost per band going down
    pub energy_loss_per_level: f32,
    /// Minerals available in the bottom band
    pub max_mineral_level: u32,
    /// Minerals lost per band going up
    pub mineral_loss_per_level: u32,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            levels: 20,
            max_energy_level: 7.0,
            energy_loss_per_level: 0.08,
            max_mineral_level: 7,
            mineral_loss_per_level: 1,
        }
    }
}

/// Living cell parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    /// Instruction budget per tick
    pub instructions_per_tick: u32,
    /// Energy cap
    pub max_energy: f32,
    /// Energy at which a cell divides
    pub duplication_energy: f32,
    /// Fixed energy cost per tick
    pub passive_cost: f32,
    /// Additional cost per tick per unit of age
    pub age_cost_coefficient: f32,
    /// Probability that an offspring genome is mutated
    pub mutation_chance: f64,
    /// Genes rewritten when a mutation happens
    pub point_mutations: u32,
    /// Congener threshold for the genome similarity test
    pub min_similarity: f32,
    /// Energy margin a defender may exceed the attacker by and still lose
    pub attack_tolerance: f32,
    /// Minimum energy needed to photosynthesize
    pub photosynthesis_min_energy: f32,
    /// Energy of the seed cell
    pub initial_energy: f32,
    /// Base color of new cells
    pub color: Rgba,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            instructions_per_tick: 15,
            max_energy: 500.0,
            duplication_energy: 200.0,
            passive_cost: 3.0,
            age_cost_coefficient: 0.01,
            mutation_chance: 0.4,
            point_mutations: 1,
            min_similarity: 0.96,
            attack_tolerance: 25.0,
            photosynthesis_min_energy: 4.0,
            initial_energy: 20.0,
            color: Rgba::YELLOW_GREEN,
        }
    }
}

/// Organic matter parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganicConfig {
    /// Age at which organic matter denatures into a mineral
    pub max_age: u32,
    /// Energy gained by eating it; also the residual energy a dying cell
    /// needs to leave organic matter behind
    pub energy: f32,
    pub color: Rgba,
}

impl Default for OrganicConfig {
    fn default() -> Self {
        Self {
            max_age: 300,
            energy: 15.0,
            color: Rgba::LIGHT_GRAY,
        }
    }
}

/// Mineral parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MineralConfig {
    /// Age at which a mineral decays away
    pub max_age: u32,
    /// Energy per mineral unit when converted
    pub energy_per_unit: f32,
    /// Mineral units gained by eating one
    pub yield_per_consume: u32,
    pub color: Rgba,
}

impl Default for MineralConfig {
    fn default() -> Self {
        Self {
            max_age: 400,
            energy_per_unit: 4.0,
            yield_per_consume: 1,
            color: Rgba::DIM_GRAY,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub world: WorldConfig,
    pub resources: ResourceConfig,
    pub life: LifeConfig,
    pub organic: OrganicConfig,
    pub mineral: MineralConfig,
}

impl SimConfig {
    /// Load a configuration file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SimConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.world.width < 2 {
            return Err(Error::Config(format!(
                "world width must be at least 2, got {}",
                self.world.width
            )));
        }
        if self.world.height < 1 {
            return Err(Error::Config(format!(
                "world height must be at least 1, got {}",
                self.world.height
            )));
        }
        if self.world.updates_per_generation == 0 {
            return Err(Error::Config("updates_per_generation must be positive".to_string()));
        }
        if self.resources.levels == 0 {
            return Err(Error::Config("resource levels must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.resources.energy_loss_per_level) {
            return Err(Error::Config(format!(
                "energy_loss_per_level must be within [0, 1], got {}",
                self.resources.energy_loss_per_level
            )));
        }
        if !(0.0..=1.0).contains(&self.life.mutation_chance) {
            return Err(Error::Config(format!(
                "mutation_chance must be within [0, 1], got {}",
                self.life.mutation_chance
            )));
        }
        if self.life.point_mutations == 0 {
            return Err(Error::Config("point_mutations must be positive".to_string()));
        }
        if self.life.max_energy <= 0.0 {
            return Err(Error::Config("max_energy must be positive".to_string()));
        }
        if self.life.duplication_energy <= 0.0 || self.life.duplication_energy > self.life.max_energy {
            return Err(Error::Config(format!(
                "duplication_energy must be within (0, {}], got {}",
                self.life.max_energy, self.life.duplication_energy
            )));
        }
        if self.life.instructions_per_tick == 0 {
            return Err(Error::Config("instructions_per_tick must be positive".to_string()));
        }
        Ok(())
    }
}

/// Headless runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Ticks executed per frame
    pub ticks_per_frame: u32,
    /// Frame period (milliseconds)
    pub frame_interval_ms: u64,
    /// Stop after this many ticks (0 runs until interrupted)
    pub max_ticks: u64,
    /// Emit population gauges every N frames
    pub log_every_frames: u64,
    /// Checkpoint directory
    pub checkpoint_dir: Option<String>,
    /// Checkpoint interval (ticks)
    pub checkpoint_every_ticks: u64,
    /// Checkpoints kept on disk
    pub keep_checkpoints: usize,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            ticks_per_frame: 1,
            frame_interval_ms: 1,
            max_ticks: 0,
            log_every_frames: 100,
            checkpoint_dir: None,
            checkpoint_every_ticks: 10_000,
            keep_checkpoints: 5,
            json_logs: false,
        }
    }
}
