//! Living cell state.

use protolife_core::{Direction, LifeConfig};
use protolife_genome::{Genome, ProgramCounter};
use serde::{Deserialize, Serialize};

/// A genome-driven living cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Life {
    pub heading: Direction,
    pub energy: f32,
    pub age: u32,
    pub genome: Genome,
    pub pc: ProgramCounter,
    pub minerals: u32,
    alive: bool,
}

impl Life {
    pub fn new(genome: Genome, heading: Direction, energy: f32) -> Self {
        Self {
            heading,
            energy: energy.max(0.0),
            age: 0,
            genome,
            pc: ProgramCounter::default(),
            minerals: 0,
            alive: true,
        }
    }

    /// Rebuild a cell from saved state
    pub fn restore(
        genome: Genome,
        heading: Direction,
        energy: f32,
        age: u32,
        pc: ProgramCounter,
        minerals: u32,
    ) -> Self {
        Self {
            heading,
            energy,
            age,
            genome,
            pc,
            minerals,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Add energy, keeping the result within `[0, cap]`
    pub fn add_energy(&mut self, amount: f32, cap: f32) {
        self.energy = (self.energy + amount).clamp(0.0, cap);
    }

    /// Spend energy; returns false when the reserve ran out
    pub fn consume_energy(&mut self, amount: f32) -> bool {
        if self.energy >= amount {
            self.energy -= amount;
            true
        } else {
            self.energy = 0.0;
            false
        }
    }

    pub fn cap_energy(&mut self, cap: f32) {
        self.energy = self.energy.clamp(0.0, cap);
    }

    /// Burn the whole mineral reserve for energy
    pub fn convert_minerals(&mut self, energy_per_unit: f32, cap: f32) {
        let gained = self.minerals as f32 * energy_per_unit;
        self.minerals = 0;
        self.add_energy(gained, cap);
    }

    /// Out of energy: fall back on the mineral reserve, or die
    pub fn starve(&mut self, energy_per_unit: f32, cap: f32) {
        if self.minerals > 0 {
            self.convert_minerals(energy_per_unit, cap);
        } else {
            self.kill();
        }
    }

    /// End-of-tick aging and upkeep.
    ///
    /// Runs for dead cells too; a dead cell's residual energy decides
    /// whether it leaves organic matter behind.
    pub fn upkeep(&mut self, config: &LifeConfig, energy_per_mineral: f32) {
        self.age = self.age.saturating_add(1);
        let cost = config.passive_cost + self.age as f32 * config.age_cost_coefficient;
        self.consume_energy(cost);
        if self.alive && self.energy <= 0.0 {
            self.starve(energy_per_mineral, config.max_energy);
        }
    }

    pub fn combatant(&self) -> Combatant {
        Combatant {
            energy: self.energy,
            minerals: self.minerals,
            alive: self.alive,
        }
    }

    /// Write back the result of a fight
    pub fn apply(&mut self, combatant: Combatant, cap: f32) {
        self.energy = combatant.energy.clamp(0.0, cap);
        self.minerals = combatant.minerals;
        self.alive = combatant.alive;
    }
}

/// The part of a living cell that takes part in a fight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combatant {
    pub energy: f32,
    pub minerals: u32,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    /// Attacker was strong enough and held at least the defender's minerals
    Overpowered,
    /// Attacker paid for the defender's surplus minerals and still won
    BrokeArmor,
    /// Attacker ran out of energy paying for the defender's minerals
    Exhausted,
    /// Defender was too strong
    Repelled,
}

impl CombatOutcome {
    pub fn attacker_won(&self) -> bool {
        matches!(self, CombatOutcome::Overpowered | CombatOutcome::BrokeArmor)
    }
}

impl Combatant {
    /// Resolve an attack by `self` on `defender`.
    ///
    /// The attacker may strike when the defender's energy minus `tolerance` is
    /// below its own. Minerals act as armor: a defender holding more minerals
    /// than the attacker makes it pay `energy_per_mineral` for each surplus unit.
    /// Energies are left unclamped; callers clamp when writing back.
    pub fn attack(
        &mut self,
        defender: &mut Combatant,
        tolerance: f32,
        energy_per_mineral: f32,
    ) -> CombatOutcome {
        if defender.energy - tolerance >= self.energy {
            defender.energy -= self.energy;
            self.alive = false;
            return CombatOutcome::Repelled;
        }

        if defender.minerals <= self.minerals {
            self.minerals -= defender.minerals;
            self.energy += defender.energy / 2.0;
            defender.energy = 0.0;
            defender.alive = false;
            return CombatOutcome::Overpowered;
        }

        let surplus = defender.minerals - self.minerals;
        self.energy -= surplus as f32 * energy_per_mineral;
        self.minerals = 0;
        defender.minerals = 0;

        if self.energy > 0.0 {
            self.energy += defender.energy;
            defender.energy = 0.0;
            defender.alive = false;
            CombatOutcome::BrokeArmor
        } else {
            self.alive = false;
            CombatOutcome::Exhausted
        }
    }
}
