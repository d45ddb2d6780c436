//! Genome interpreter for living cells.
//!
//! A living cell's turn runs up to `instructions_per_tick` genes from its
//! tape. Every instruction ends by shifting the program counter, usually by an
//! operand selected with the action's result code, so control flow lives in the
//! genome itself.
//!
//! The interpreter works on grid slot indices. The acting cell stays in its
//! `home` slot for the whole turn; moves only rewrite its coordinates, and the
//! world relocates it afterwards. Neighbors are resolved from the coordinates,
//! so a cell that moved sees its home slot as the neighbor it left.

use crate::cell::{Cell, CellState};
use crate::display::{tint, Hue};
use crate::grid::Grid;
use crate::organism::Life;
use crate::resources::ResourceTable;
use protolife_core::{CellKind, Direction, Position, SimConfig};
use protolife_genome::{branch_code, Aim, Instruction, Mutator, Sense, GENE_VALUES};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

pub(crate) struct Interpreter<'w> {
    grid: &'w mut Grid,
    resources: &'w ResourceTable,
    config: &'w SimConfig,
    mutator: &'w Mutator,
    rng: &'w mut ChaCha8Rng,
    home: usize,
}

impl<'w> Interpreter<'w> {
    pub(crate) fn new(
        grid: &'w mut Grid,
        resources: &'w ResourceTable,
        config: &'w SimConfig,
        mutator: &'w Mutator,
        rng: &'w mut ChaCha8Rng,
        home: usize,
    ) -> Self {
        Self {
            grid,
            resources,
            config,
            mutator,
            rng,
            home,
        }
    }

    /// Run one turn followed by the end-of-tick upkeep
    pub(crate) fn run(mut self) {
        let config = self.config;
        let max_energy = config.life.max_energy;
        let mineral_energy = config.mineral.energy_per_unit;

        for _ in 0..config.life.instructions_per_tick {
            if !self.life().is_alive() {
                break;
            }

            let mut done = self.step();

            self.life_mut().cap_energy(max_energy);
            if self.life().energy >= config.life.duplication_energy {
                self.duplicate();
                done = true;
            }
            if self.life().energy <= 0.0 {
                self.life_mut().starve(mineral_energy, max_energy);
            }

            if done {
                break;
            }
        }

        self.life_mut().upkeep(&config.life, mineral_energy);
    }

    /// Execute the instruction under the program counter.
    /// Returns true when the instruction ends the turn.
    fn step(&mut self) -> bool {
        let instruction = Instruction::decode(self.opcode());

        match instruction {
            Instruction::Move(aim) => {
                let direction = self.aim(aim);
                let code = self.move_toward(direction).code();
                self.jump(code + aim.operand_offset());
            }
            Instruction::Attack(aim) => {
                let direction = self.aim(aim);
                let code = self.attack(direction).code();
                self.jump(code + aim.operand_offset());
            }
            Instruction::Photosynthesis => {
                self.photosynthesize();
                self.jump(1);
                self.tint(Hue::Green, 1);
            }
            Instruction::Rotate => {
                let turn = self.operand(1);
                let life = self.life_mut();
                life.heading = life.heading.rotate(turn);
                self.jump(2);
            }
            Instruction::EnergyAtLeast => {
                let threshold = self.energy_part() * self.operand(1) as f32;
                let code = branch_code(self.life().energy >= threshold);
                self.jump(code + 1);
            }
            Instruction::Check(aim) => {
                let direction = self.aim(aim);
                let code = self.sense(direction).code();
                self.jump(code + aim.operand_offset());
            }
            Instruction::MineralsToEnergy => {
                let config = self.config;
                self.life_mut()
                    .convert_minerals(config.mineral.energy_per_unit, config.life.max_energy);
                self.jump(1);
                self.tint(Hue::Blue, 5);
            }
            Instruction::DonateEnergy(aim) => {
                let direction = self.aim(aim);
                let code = self.donate_energy(direction).code();
                self.jump(code + aim.operand_offset());
            }
            Instruction::DonateMinerals(aim) => {
                let direction = self.aim(aim);
                let code = self.donate_minerals(direction).code();
                self.jump(code + aim.operand_offset());
            }
            Instruction::EnergyAtMost => {
                let threshold = self.energy_part() * (self.operand(1) + 1) as f32;
                let code = branch_code(threshold >= self.life().energy);
                // shifts by the branch code itself, not by an operand
                self.life_mut().pc.shift(code);
            }
            Instruction::Chemosynthesis => {
                self.chemosynthesize();
                self.jump(1);
            }
            Instruction::Skip(gene) => self.life_mut().pc.shift(gene as usize),
        }

        instruction.is_terminal()
    }

    fn life(&self) -> &Life {
        match &self.grid.cell(self.home).state {
            CellState::Life(life) => life,
            other => unreachable!("slot {} runs a genome but holds {:?}", self.home, other),
        }
    }

    fn life_mut(&mut self) -> &mut Life {
        let home = self.home;
        match &mut self.grid.cell_mut(home).state {
            CellState::Life(life) => life,
            other => unreachable!("slot {} runs a genome but holds {:?}", home, other),
        }
    }

    fn position(&self) -> Position {
        self.grid.cell(self.home).position
    }

    fn opcode(&self) -> u8 {
        let life = self.life();
        life.pc.opcode(&life.genome)
    }

    fn operand(&self, offset: usize) -> usize {
        let life = self.life();
        life.pc.operand(&life.genome, offset) as usize
    }

    /// Shift the program counter by the operand at `offset`
    fn jump(&mut self, offset: usize) {
        let delta = self.operand(offset);
        self.life_mut().pc.shift(delta);
    }

    fn energy_part(&self) -> f32 {
        self.config.life.max_energy / GENE_VALUES as f32
    }

    fn aim(&self, aim: Aim) -> Direction {
        let heading = self.life().heading;
        match aim {
            Aim::Relative => heading.rotate(self.operand(1) % Direction::COUNT),
            Aim::Forward => heading,
        }
    }

    fn tint(&mut self, hue: Hue, magnitude: u8) {
        let cell = self.grid.cell_mut(self.home);
        cell.color = tint(cell.color, hue, magnitude);
    }

    fn neighbor_index(&self, direction: Direction) -> Option<usize> {
        self.grid.neighbor_index(self.position(), direction)
    }

    fn sense(&self, direction: Direction) -> Sense {
        match self.neighbor_index(direction) {
            Some(target) => self.classify(target),
            None => Sense::Absent,
        }
    }

    fn classify(&self, target: usize) -> Sense {
        match &self.grid.cell(target).state {
            CellState::Empty => Sense::Empty,
            CellState::Organic(_) => Sense::Organic,
            CellState::Mineral(_) => Sense::Mineral,
            CellState::Life(other) => {
                if self
                    .life()
                    .genome
                    .is_congener(&other.genome, self.config.life.min_similarity)
                {
                    Sense::Congener
                } else {
                    Sense::Foreign
                }
            }
        }
    }

    fn move_toward(&mut self, direction: Direction) -> Sense {
        let Some(target) = self.neighbor_index(direction) else {
            return Sense::Absent;
        };
        let sense = self.classify(target);
        if sense == Sense::Empty {
            let destination = self.grid.position_of(target);
            let cell = self.grid.cell_mut(self.home);
            cell.position = destination;
            cell.moved = true;
        }
        sense
    }

    fn attack(&mut self, direction: Direction) -> Sense {
        let Some(target) = self.neighbor_index(direction) else {
            return Sense::Absent;
        };
        let config = self.config;

        match self.grid.cell(target).kind() {
            CellKind::Empty => Sense::Empty,
            CellKind::Organic => {
                let gained = match &mut self.grid.cell_mut(target).state {
                    CellState::Organic(organic) => organic.consume(config.organic.energy),
                    _ => 0.0,
                };
                self.life_mut().add_energy(gained, config.life.max_energy);
                self.tint(Hue::Green, 5);
                Sense::Organic
            }
            CellKind::Mineral => {
                let gained = match &mut self.grid.cell_mut(target).state {
                    CellState::Mineral(mineral) => {
                        mineral.consume(config.mineral.yield_per_consume)
                    }
                    _ => 0,
                };
                let life = self.life_mut();
                life.minerals = life.minerals.saturating_add(gained);
                self.tint(Hue::Blue, 10);
                Sense::Mineral
            }
            CellKind::Life => {
                self.fight(target);
                // attacks on living cells report code 4 whatever the kinship
                Sense::Congener
            }
        }
    }

    fn fight(&mut self, target: usize) {
        let config = self.config;
        let max_energy = config.life.max_energy;

        // a cell that moved away this turn still occupies its home slot, so an
        // attack aimed back at that slot lands on itself
        if target == self.home {
            let life = self.life_mut();
            life.minerals = 0;
            life.energy = 0.0;
            life.kill();
            trace!(
                event = "combat",
                attacker = ?self.position(),
                outcome = "self",
                "Life cell attacked its own slot"
            );
            return;
        }

        let mut attacker = self.life().combatant();
        let mut defender = match self.grid.cell(target).as_life() {
            Some(life) => life.combatant(),
            None => return,
        };

        let outcome = attacker.attack(
            &mut defender,
            config.life.attack_tolerance,
            config.mineral.energy_per_unit,
        );
        trace!(
            event = "combat",
            attacker = ?self.position(),
            defender = ?self.grid.position_of(target),
            outcome = ?outcome,
            "Life cell attacked a neighbor"
        );

        if let Some(life) = self.grid.cell_mut(target).as_life_mut() {
            life.apply(defender, max_energy);
        }
        self.life_mut().apply(attacker, max_energy);

        if outcome.attacker_won() {
            self.tint(Hue::Red, 100);
        }
    }

    fn photosynthesize(&mut self) {
        let config = self.config;
        let gain = self.resources.energy(self.position().y);
        let life = self.life_mut();
        if life.energy >= config.life.photosynthesis_min_energy {
            life.add_energy(gain, config.life.max_energy);
            self.tint(Hue::Green, 1);
        }
    }

    fn chemosynthesize(&mut self) {
        let minerals = self.resources.minerals(self.position().y);
        if minerals > 0 {
            let life = self.life_mut();
            life.minerals = life.minerals.saturating_add(minerals);
            self.tint(Hue::Blue, 5);
        }
    }

    /// Give half the energy reserve to a living neighbor. The recipient is
    /// capped at the energy limit and anything above it is lost.
    fn donate_energy(&mut self, direction: Direction) -> Sense {
        let Some(target) = self.neighbor_index(direction) else {
            return Sense::Absent;
        };
        match self.grid.cell(target).kind() {
            CellKind::Empty => Sense::Empty,
            CellKind::Organic => Sense::Organic,
            CellKind::Mineral => Sense::Mineral,
            CellKind::Life => {
                let donor = self.life_mut();
                let gift = donor.energy / 2.0;
                donor.energy -= gift;
                let cap = self.config.life.max_energy;
                if let Some(recipient) = self.grid.cell_mut(target).as_life_mut() {
                    recipient.add_energy(gift, cap);
                }
                Sense::Foreign
            }
        }
    }

    /// Give half the mineral reserve to a living neighbor; an odd unit stays
    /// with the donor.
    fn donate_minerals(&mut self, direction: Direction) -> Sense {
        let Some(target) = self.neighbor_index(direction) else {
            return Sense::Absent;
        };
        match self.grid.cell(target).kind() {
            CellKind::Empty => Sense::Empty,
            CellKind::Organic => Sense::Organic,
            CellKind::Mineral => Sense::Mineral,
            CellKind::Life => {
                let donor = self.life_mut();
                let gift = donor.minerals / 2;
                donor.minerals -= gift;
                if let Some(recipient) = self.grid.cell_mut(target).as_life_mut() {
                    recipient.minerals = recipient.minerals.saturating_add(gift);
                }
                Sense::Foreign
            }
        }
    }

    /// Split into the first empty neighbor in compass order, or die trying
    fn duplicate(&mut self) {
        let position = self.position();
        let free = Direction::all().into_iter().find_map(|direction| {
            let slot = self.grid.neighbor_index(position, direction)?;
            self.grid.cell(slot).is_empty().then_some((direction, slot))
        });

        let Some((heading, slot)) = free else {
            trace!(
                event = "duplication_failed",
                x = position.x,
                y = position.y,
                "No empty neighbor, parent dies"
            );
            self.life_mut().kill();
            return;
        };

        let parent_genome = self.life().genome.clone();
        let mutator = self.mutator;
        let (genome, mutations) = mutator.replicate(&parent_genome, self.rng);

        let parent = self.life_mut();
        let child_energy = parent.energy / 2.0;
        parent.energy -= child_energy;

        let child = Life::new(genome, heading, child_energy);
        let color = self.config.life.color;
        self.grid.put(slot, Cell::life(position, child, color));

        trace!(
            event = "duplication",
            x = position.x,
            y = position.y,
            child = ?self.grid.position_of(slot),
            energy = child_energy,
            mutations,
            "Life cell duplicated"
        );
    }
}
