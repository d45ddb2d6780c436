//! Mutation of offspring genomes.

use crate::genome::{Genome, CHROMOSOME_LEN, GENE_VALUES, GENOME_LEN};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability that a copy is mutated at all
    pub chance: f64,
    /// Upper bound of point mutations applied to a mutated copy
    pub point_mutations: u32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            chance: 0.4,
            point_mutations: 1,
        }
    }
}

pub struct Mutator {
    config: MutationConfig,
}

impl Mutator {
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Copy a parent genome for a child, mutating it with the configured chance.
    /// Returns the child genome and the number of point mutations applied.
    pub fn replicate(&self, parent: &Genome, rng: &mut ChaCha8Rng) -> (Genome, u32) {
        let mut child = parent.clone();
        let mutations = if rng.gen::<f64>() > 1.0 - self.config.chance {
            self.mutate(&mut child, rng)
        } else {
            0
        };
        (child, mutations)
    }

    /// Rewrite between 1 and `point_mutations` random genes with random values
    pub fn mutate(&self, genome: &mut Genome, rng: &mut ChaCha8Rng) -> u32 {
        let count = rng.gen_range(1..=self.config.point_mutations.max(1));
        for _ in 0..count {
            self.point_mutate(genome, rng);
        }
        count
    }

    fn point_mutate(&self, genome: &mut Genome, rng: &mut ChaCha8Rng) {
        let row = rng.gen_range(0..GENOME_LEN);
        let column = rng.gen_range(0..CHROMOSOME_LEN);
        genome.set(row, column, rng.gen_range(0..GENE_VALUES));
    }
}
