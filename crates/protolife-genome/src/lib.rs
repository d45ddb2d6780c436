//! Genome tape and instruction set for living cells.
//!
//! A genome is a fixed 8x8 matrix of small integers read as one circular tape.
//! Each gene is both an instruction and a jump operand:
//! - the gene under the program counter selects the instruction
//! - genes after it supply directions, angles and thresholds
//! - outcomes of actions are result codes that pick the next displacement

pub mod genome;
pub mod instruction;
pub mod mutation;
pub mod validation;

pub use genome::{Genome, ProgramCounter, CHROMOSOME_LEN, GENE_VALUES, GENOME_LEN, TAPE_LEN};
pub use instruction::{branch_code, Aim, Instruction, Sense};
pub use mutation::{MutationConfig, Mutator};
pub use validation::{validate_genome_rows, validate_program_counter};
