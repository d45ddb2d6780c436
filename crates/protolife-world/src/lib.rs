//! World simulation engine.
//!
//! This module implements the toroidal grid where organic matter, minerals and
//! genome-driven living cells decay, feed, fight and reproduce.

pub mod cell;
pub mod display;
pub mod grid;
pub mod interpreter;
pub mod organism;
pub mod resources;
pub mod snapshot;
pub mod world;

pub use cell::{Cell, CellState, Mineral, Organic};
pub use display::{display_color, tint, DisplayMode, Hue};
pub use grid::Grid;
pub use organism::{CombatOutcome, Combatant, Life};
pub use resources::ResourceTable;
pub use snapshot::{CellRecord, Snapshot};
pub use world::World;
