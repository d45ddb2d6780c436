//! Instruction set decoded from genes.

use serde::{Deserialize, Serialize};

/// How an instruction picks its direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aim {
    /// Heading turned by the operand after the opcode
    Relative,
    /// Current heading
    Forward,
}

impl Aim {
    /// Offset added to a result code before it selects the jump operand.
    /// Relative instructions consume one operand for the turn, so their jump
    /// table starts one gene further along.
    pub fn operand_offset(&self) -> usize {
        match self {
            Aim::Relative => 1,
            Aim::Forward => 0,
        }
    }
}

/// A decoded gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// Step into an empty neighbor
    Move(Aim),
    /// Eat organic matter or minerals, or fight a living neighbor
    Attack(Aim),
    /// Gain the row's sunlight energy
    Photosynthesis,
    /// Turn by the next gene
    Rotate,
    /// Branch on energy at or above a fraction of the cap
    EnergyAtLeast,
    /// Branch on the kind of a neighbor
    Check(Aim),
    /// Burn the mineral reserve for energy
    MineralsToEnergy,
    /// Give half the energy to a living neighbor
    DonateEnergy(Aim),
    /// Give half the minerals to a living neighbor
    DonateMinerals(Aim),
    /// Branch on energy at or below a fraction of the cap
    EnergyAtMost,
    /// Absorb the row's minerals
    Chemosynthesis,
    /// Any other gene: jump ahead by its own value
    Skip(u8),
}

impl Instruction {
    pub fn decode(gene: u8) -> Self {
        match gene {
            10 => Instruction::Move(Aim::Relative),
            12 => Instruction::Move(Aim::Forward),
            14 => Instruction::Attack(Aim::Relative),
            16 => Instruction::Photosynthesis,
            18 => Instruction::Attack(Aim::Forward),
            20 => Instruction::Rotate,
            22 => Instruction::EnergyAtLeast,
            24 => Instruction::Check(Aim::Relative),
            26 => Instruction::Check(Aim::Forward),
            28 => Instruction::MineralsToEnergy,
            30 => Instruction::DonateEnergy(Aim::Relative),
            32 => Instruction::DonateEnergy(Aim::Forward),
            34 => Instruction::DonateMinerals(Aim::Relative),
            36 => Instruction::DonateMinerals(Aim::Forward),
            38 => Instruction::EnergyAtMost,
            47 => Instruction::Chemosynthesis,
            other => Instruction::Skip(other),
        }
    }

    /// The gene that encodes this instruction
    pub fn opcode(&self) -> u8 {
        match self {
            Instruction::Move(Aim::Relative) => 10,
            Instruction::Move(Aim::Forward) => 12,
            Instruction::Attack(Aim::Relative) => 14,
            Instruction::Photosynthesis => 16,
            Instruction::Attack(Aim::Forward) => 18,
            Instruction::Rotate => 20,
            Instruction::EnergyAtLeast => 22,
            Instruction::Check(Aim::Relative) => 24,
            Instruction::Check(Aim::Forward) => 26,
            Instruction::MineralsToEnergy => 28,
            Instruction::DonateEnergy(Aim::Relative) => 30,
            Instruction::DonateEnergy(Aim::Forward) => 32,
            Instruction::DonateMinerals(Aim::Relative) => 34,
            Instruction::DonateMinerals(Aim::Forward) => 36,
            Instruction::EnergyAtMost => 38,
            Instruction::Chemosynthesis => 47,
            Instruction::Skip(gene) => *gene,
        }
    }

    /// Terminal instructions end the cell's turn
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Instruction::Attack(_) | Instruction::Photosynthesis | Instruction::Chemosynthesis
        )
    }
}

/// Result code of looking at, moving into, attacking or donating to a neighbor.
/// The code is used as a jump displacement into the genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
    Empty = 1,
    Organic = 2,
    Mineral = 3,
    Congener = 4,
    Foreign = 5,
    /// Outside the grid vertically
    Absent = 6,
}

impl Sense {
    pub fn code(&self) -> usize {
        *self as usize
    }
}

/// Result code of a two-way branch: 1 when the condition holds, 2 otherwise
pub fn branch_code(condition: bool) -> usize {
    if condition {
        1
    } else {
        2
    }
}
