//! Snapshot codec: world state to and from portable records.

use crate::cell::{Cell, CellState, Mineral, Organic};
use crate::grid::Grid;
use crate::organism::Life;
use crate::world::World;
use protolife_core::{CellKind, Direction, Error, Position, Result, Rgba, SimConfig};
use protolife_genome::{validate_genome_rows, validate_program_counter};
use serde::{Deserialize, Serialize};

/// World counters plus every non-empty cell in row-major order.
///
/// Organic matter or minerals eaten during the current tick are not recorded.
/// The live world still shows them until the scan reaches their slot, while a
/// reloaded world shows those slots as empty straight away. The rng state is
/// not recorded either, so a restored world need not repeat the original's
/// future.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generation: u64,
    pub update_count: u64,
    pub width: i32,
    pub height: i32,
    pub cells: Vec<CellRecord>,
}

/// One saved cell. Life-only fields are `None` for organic matter and minerals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub x: i32,
    pub y: i32,
    pub kind: CellKind,
    pub age: u32,
    #[serde(default)]
    pub color: Option<Vec<i64>>,
    #[serde(default)]
    pub genome: Option<Vec<Vec<i64>>>,
    #[serde(default)]
    pub minerals: Option<u32>,
    #[serde(default)]
    pub energy: Option<f32>,
    #[serde(default)]
    pub program_counter: Option<i64>,
    #[serde(default)]
    pub heading: Option<i64>,
    /// Dead cells stay on the grid until the scan reaches them
    #[serde(default)]
    pub alive: Option<bool>,
}

impl CellRecord {
    fn passive(cell: &Cell) -> Self {
        Self {
            x: cell.position.x,
            y: cell.position.y,
            kind: cell.kind(),
            age: cell.age(),
            color: None,
            genome: None,
            minerals: None,
            energy: None,
            program_counter: None,
            heading: None,
            alive: None,
        }
    }

    fn from_cell(cell: &Cell) -> Self {
        let mut record = Self::passive(cell);
        if let CellState::Life(life) = &cell.state {
            record.color = Some(cell.color.to_array().iter().map(|c| i64::from(*c)).collect());
            record.genome = Some(
                life.genome
                    .rows()
                    .iter()
                    .map(|row| row.iter().map(|gene| i64::from(*gene)).collect())
                    .collect(),
            );
            record.minerals = Some(life.minerals);
            record.energy = Some(life.energy);
            record.program_counter = Some(life.pc.index() as i64);
            record.heading = Some(life.heading.index() as i64);
            record.alive = Some(life.is_alive());
        }
        record
    }

    fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Rebuild the cell this record describes
    fn to_cell(&self, config: &SimConfig) -> Result<Cell> {
        let position = self.position();
        let cell = match self.kind {
            CellKind::Empty => {
                return Err(self.invalid("empty cells are not stored"));
            }
            CellKind::Organic => Cell::with_state(
                position,
                config.organic.color,
                CellState::Organic(Organic::with_age(self.age)),
            ),
            CellKind::Mineral => Cell::with_state(
                position,
                config.mineral.color,
                CellState::Mineral(Mineral::with_age(self.age)),
            ),
            CellKind::Life => {
                let genome = validate_genome_rows(self.required("genome", &self.genome)?)?;
                let pc = *self.required("programCounter", &self.program_counter)?;
                let pc = validate_program_counter(pc)?;
                let heading = *self.required("heading", &self.heading)?;
                let heading = Direction::try_from_index(heading).ok_or_else(|| {
                    self.invalid(&format!("heading {} is outside [0, 8)", heading))
                })?;
                let energy = *self.required("energy", &self.energy)?;
                let max_energy = config.life.max_energy;
                if !energy.is_finite() || !(0.0..=max_energy).contains(&energy) {
                    return Err(self.invalid(&format!(
                        "energy {} is outside [0, {}]",
                        energy, max_energy
                    )));
                }
                let minerals = *self.required("minerals", &self.minerals)?;
                let color = self.parse_color(self.required("color", &self.color)?)?;

                let mut life = Life::restore(genome, heading, energy, self.age, pc, minerals);
                if self.alive == Some(false) {
                    life.kill();
                }
                Cell::life(position, life, color)
            }
        };
        Ok(cell)
    }

    fn required<'a, T>(&self, field: &str, value: &'a Option<T>) -> Result<&'a T> {
        value
            .as_ref()
            .ok_or_else(|| self.invalid(&format!("life record is missing {}", field)))
    }

    fn parse_color(&self, components: &[i64]) -> Result<Rgba> {
        if components.len() != 4 {
            return Err(self.invalid(&format!(
                "color has {} components, expected 4",
                components.len()
            )));
        }
        let mut rgba = [0u8; 4];
        for (slot, value) in rgba.iter_mut().zip(components) {
            *slot = u8::try_from(*value).map_err(|_| {
                self.invalid(&format!("color component {} is outside [0, 255]", value))
            })?;
        }
        Ok(Rgba::from_array(rgba))
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::Validation(format!("Cell record at ({}, {}): {}", self.x, self.y, reason))
    }
}

impl Snapshot {
    /// Record the world. Eaten cells still waiting for removal are left out.
    pub fn capture(world: &World) -> Self {
        Self {
            generation: world.generation(),
            update_count: world.update_count(),
            width: world.width(),
            height: world.height(),
            cells: world
                .cells()
                .filter(|cell| !cell.is_consumed())
                .map(CellRecord::from_cell)
                .collect(),
        }
    }

    /// Build a fresh grid from the records, validating every one of them
    pub fn build_grid(&self, config: &SimConfig) -> Result<Grid> {
        let mut grid = Grid::new(self.width, self.height);
        let mut filled = vec![false; grid.len()];

        for record in &self.cells {
            let index = grid.index_of(record.position()).ok_or_else(|| {
                record.invalid(&format!(
                    "outside the {}x{} grid",
                    self.width, self.height
                ))
            })?;
            if std::mem::replace(&mut filled[index], true) {
                return Err(record.invalid("slot is already occupied"));
            }
            grid.put(index, record.to_cell(config)?);
        }

        Ok(grid)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
