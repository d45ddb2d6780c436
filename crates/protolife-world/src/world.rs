//! The world: grid, resources and the tick driver.

use crate::cell::{Cell, CellState};
use crate::grid::Grid;
use crate::interpreter::Interpreter;
use crate::organism::Life;
use crate::resources::ResourceTable;
use crate::snapshot::Snapshot;
use protolife_core::{
    CellKind, Direction, Error, PopulationStats, Position, Result, SimConfig,
};
use protolife_genome::{Genome, MutationConfig, Mutator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::{debug, info, instrument, trace};

pub struct World {
    config: SimConfig,
    grid: Grid,
    resources: ResourceTable,
    mutator: Mutator,
    rng: ChaCha8Rng,
    generation: u64,
    update_count: u64,
    tick_count: u64,
    stats: PopulationStats,
}

impl World {
    /// Build a world and place the seed cell
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let grid = Grid::new(config.world.width, config.world.height);
        let resources = ResourceTable::new(&config.resources, config.world.height);
        let mutator = Mutator::new(MutationConfig {
            chance: config.life.mutation_chance,
            point_mutations: config.life.point_mutations,
        });
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut world = Self {
            config,
            grid,
            resources,
            mutator,
            rng,
            generation: 0,
            update_count: 0,
            tick_count: 0,
            stats: PopulationStats::default(),
        };
        world.reset();

        info!(
            width = world.width(),
            height = world.height(),
            seed = world.config.seed,
            "World created"
        );
        Ok(world)
    }

    /// Empty the grid, place the seed cell and zero the counters
    pub fn reset(&mut self) {
        self.wipe();

        let position = self.config.world.seed_position();
        let seed = Life::new(
            Genome::photosynthesizer(),
            self.config.world.seed_heading,
            self.config.life.initial_energy,
        );
        if let Some(index) = self.grid.index_of(position) {
            self.grid
                .put(index, Cell::life(position, seed, self.config.life.color));
        }
        self.recount();

        info!(x = position.x, y = position.y, "World reset with seed cell");
    }

    /// Empty the grid and zero the counters
    pub fn wipe(&mut self) {
        self.grid.wipe();
        self.generation = 0;
        self.update_count = 0;
        self.tick_count = 0;
        self.stats = PopulationStats::default();
    }

    /// Advance every cell by one tick.
    ///
    /// Slots are visited from the last row to the first and from the last
    /// column to the first within a row. A cell that moves into a slot not yet
    /// visited is updated again when the scan reaches it.
    pub fn tick(&mut self) {
        self.stats = PopulationStats::default();

        for index in (0..self.grid.len()).rev() {
            let current = self.update_slot(index);
            self.reconcile(current);
        }

        self.tick_count += 1;
        self.update_count += 1;
        if self.update_count >= u64::from(self.config.world.updates_per_generation) {
            self.generation += 1;
            self.update_count = 0;
        }

        debug!(
            tick = self.tick_count,
            generation = self.generation,
            life = self.stats.life,
            organic = self.stats.organic,
            mineral = self.stats.mineral,
            "Tick complete"
        );
    }

    /// Run `ticks` ticks
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Run the slot's per-kind update; returns the slot the cell ended in
    fn update_slot(&mut self, index: usize) -> usize {
        let origin = self.grid.position_of(index);
        self.grid.cell_mut(index).moved = false;

        match self.grid.cell(index).kind() {
            CellKind::Empty => return index,
            CellKind::Organic => {
                let max_age = self.config.organic.max_age;
                if let CellState::Organic(organic) = &mut self.grid.cell_mut(index).state {
                    organic.update(max_age);
                }
            }
            CellKind::Mineral => {
                let max_age = self.config.mineral.max_age;
                let below = self.grid.neighbor_index(origin, Direction::South);
                let below_is_empty = below.map_or(false, |slot| self.grid.cell(slot).is_empty());
                let cell = self.grid.cell_mut(index);
                if let CellState::Mineral(mineral) = &mut cell.state {
                    if mineral.update(max_age, below_is_empty) {
                        cell.position = origin.step(Direction::South);
                        cell.moved = true;
                    }
                }
            }
            CellKind::Life => {
                Interpreter::new(
                    &mut self.grid,
                    &self.resources,
                    &self.config,
                    &self.mutator,
                    &mut self.rng,
                    index,
                )
                .run();
            }
        }

        let cell = self.grid.cell(index);
        if !cell.moved || cell.position == origin {
            return index;
        }
        let destination = cell.position;
        let Some(target) = self.grid.index_of(destination) else {
            unreachable!("cell at {:?} moved off the grid to {:?}", origin, destination);
        };
        self.grid.relocate(index, target);
        target
    }

    /// Apply the kind transition due at `index` and count what remains
    fn reconcile(&mut self, index: usize) {
        let position = self.grid.position_of(index);

        let replacement = match &self.grid.cell(index).state {
            CellState::Empty => None,
            CellState::Organic(organic) if organic.is_consumed() => Some(Cell::empty(position)),
            CellState::Organic(organic) if organic.is_denatured() => {
                Some(Cell::mineral(position, &self.config.mineral))
            }
            CellState::Mineral(mineral) if mineral.is_consumed() || mineral.is_denatured() => {
                Some(Cell::empty(position))
            }
            CellState::Life(life) if !life.is_alive() => {
                trace!(
                    event = "death",
                    x = position.x,
                    y = position.y,
                    energy = life.energy,
                    age = life.age,
                    "Life cell died"
                );
                if life.energy >= self.config.organic.energy {
                    Some(Cell::organic(position, &self.config.organic))
                } else {
                    Some(Cell::empty(position))
                }
            }
            CellState::Organic(_) | CellState::Mineral(_) | CellState::Life(_) => None,
        };

        if let Some(cell) = replacement {
            self.grid.put(index, cell);
        }
        self.stats.record(self.grid.cell(index).kind());
    }

    fn recount(&mut self) {
        let mut stats = PopulationStats::default();
        for cell in self.grid.occupied() {
            stats.record(cell.kind());
        }
        self.stats = stats;
    }

    /// Put a cell at `pos`, replacing whatever was there
    pub fn place(&mut self, cell: Cell, pos: Position) -> Result<()> {
        self.grid.place(cell, pos)?;
        self.recount();
        Ok(())
    }

    /// Place a fresh living cell with the configured base color
    pub fn spawn_life(
        &mut self,
        pos: Position,
        genome: Genome,
        heading: Direction,
        energy: f32,
    ) -> Result<()> {
        let energy = energy.clamp(0.0, self.config.life.max_energy);
        let life = Life::new(genome, heading, energy);
        self.place(Cell::life(pos, life, self.config.life.color), pos)
    }

    /// Restore the slot at `pos` to empty
    pub fn clear(&mut self, pos: Position) -> Result<()> {
        self.grid.clear(pos)?;
        self.recount();
        Ok(())
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.grid.get(pos)
    }

    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<&Cell> {
        self.grid.neighbor(pos, direction)
    }

    /// Populated cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.grid.occupied()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn resource_energy(&self, y: i32) -> f32 {
        self.resources.energy(y)
    }

    pub fn resource_minerals(&self, y: i32) -> u32 {
        self.resources.minerals(y)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> PopulationStats {
        self.stats
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Capture the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Replace the world state with a snapshot.
    ///
    /// Everything is validated before the live grid is touched; on error the
    /// world is unchanged.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.width != self.width() || snapshot.height != self.height() {
            return Err(Error::SizeMismatch {
                expected_width: self.width(),
                expected_height: self.height(),
                found_width: snapshot.width,
                found_height: snapshot.height,
            });
        }

        let grid = snapshot.build_grid(&self.config)?;

        self.grid = grid;
        self.generation = snapshot.generation;
        self.update_count = snapshot.update_count;
        self.tick_count = snapshot.generation
            * u64::from(self.config.world.updates_per_generation)
            + snapshot.update_count;
        self.recount();
        Ok(())
    }

    /// Write the world to a JSON snapshot file
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let snapshot = self.snapshot();
        std::fs::write(path.as_ref(), snapshot.to_json()?)?;
        info!(
            cells = snapshot.cells.len(),
            generation = snapshot.generation,
            "Snapshot saved"
        );
        Ok(())
    }

    /// Load a JSON snapshot file; the world is unchanged on any error
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_snapshot(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let snapshot = Snapshot::from_json(&text)?;
        self.restore(&snapshot)?;
        info!(
            cells = snapshot.cells.len(),
            generation = snapshot.generation,
            "Snapshot loaded"
        );
        Ok(())
    }
}
