//! Grid cells and the passive kinds that occupy them.

use crate::organism::Life;
use protolife_core::{CellKind, MineralConfig, OrganicConfig, Position, Rgba};
use serde::{Deserialize, Serialize};

/// One slot of the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub position: Position,
    pub color: Rgba,
    /// Set when the cell changed position during its last update
    pub moved: bool,
    pub state: CellState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Empty,
    Organic(Organic),
    Mineral(Mineral),
    Life(Life),
}

impl Cell {
    pub fn empty(position: Position) -> Self {
        Self::with_state(position, Rgba::TRANSPARENT, CellState::Empty)
    }

    pub fn organic(position: Position, config: &OrganicConfig) -> Self {
        Self::with_state(position, config.color, CellState::Organic(Organic::default()))
    }

    pub fn mineral(position: Position, config: &MineralConfig) -> Self {
        Self::with_state(position, config.color, CellState::Mineral(Mineral::default()))
    }

    pub fn life(position: Position, life: Life, color: Rgba) -> Self {
        Self::with_state(position, color, CellState::Life(life))
    }

    pub fn with_state(position: Position, color: Rgba, state: CellState) -> Self {
        Self {
            position,
            color,
            moved: false,
            state,
        }
    }

    pub fn kind(&self) -> CellKind {
        match self.state {
            CellState::Empty => CellKind::Empty,
            CellState::Organic(_) => CellKind::Organic,
            CellState::Mineral(_) => CellKind::Mineral,
            CellState::Life(_) => CellKind::Life,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, CellState::Empty)
    }

    pub fn age(&self) -> u32 {
        match &self.state {
            CellState::Empty => 0,
            CellState::Organic(organic) => organic.age,
            CellState::Mineral(mineral) => mineral.age,
            CellState::Life(life) => life.age,
        }
    }

    /// Organic matter or a mineral that was eaten and awaits removal
    pub fn is_consumed(&self) -> bool {
        match &self.state {
            CellState::Organic(organic) => organic.is_consumed(),
            CellState::Mineral(mineral) => mineral.is_consumed(),
            CellState::Empty | CellState::Life(_) => false,
        }
    }

    pub fn as_life(&self) -> Option<&Life> {
        match &self.state {
            CellState::Life(life) => Some(life),
            _ => None,
        }
    }

    pub fn as_life_mut(&mut self) -> Option<&mut Life> {
        match &mut self.state {
            CellState::Life(life) => Some(life),
            _ => None,
        }
    }
}

/// Dead organic matter: edible, denatures into a mineral with age
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organic {
    pub age: u32,
    consumed: bool,
    denatured: bool,
}

impl Organic {
    pub fn with_age(age: u32) -> Self {
        Self {
            age,
            ..Default::default()
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn is_denatured(&self) -> bool {
        self.denatured
    }

    /// Passive aging for one tick
    pub fn update(&mut self, max_age: u32) {
        if self.consumed || self.denatured {
            return;
        }
        self.age = self.age.saturating_add(1);
        if self.age >= max_age {
            self.denatured = true;
        }
    }

    /// Eat this matter; yields `energy` once and nothing afterwards
    pub fn consume(&mut self, energy: f32) -> f32 {
        if self.consumed {
            return 0.0;
        }
        self.consumed = true;
        energy
    }
}

/// Inert mineral: sinks through empty space, decays with age
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mineral {
    pub age: u32,
    consumed: bool,
    denatured: bool,
}

impl Mineral {
    pub fn with_age(age: u32) -> Self {
        Self {
            age,
            ..Default::default()
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn is_denatured(&self) -> bool {
        self.denatured
    }

    /// Passive aging for one tick. Returns true when the mineral should sink
    /// into the empty slot below it.
    pub fn update(&mut self, max_age: u32, below_is_empty: bool) -> bool {
        if self.consumed || self.denatured {
            return false;
        }
        self.age = self.age.saturating_add(1);
        if self.age >= max_age {
            self.denatured = true;
        }
        below_is_empty
    }

    /// Eat this mineral; yields `units` once and nothing afterwards
    pub fn consume(&mut self, units: u32) -> u32 {
        if self.consumed {
            return 0;
        }
        self.consumed = true;
        units
    }
}
