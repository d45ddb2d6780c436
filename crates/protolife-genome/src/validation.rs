//! Validation of externally supplied genomes.

use crate::genome::{Genome, ProgramCounter, CHROMOSOME_LEN, GENE_VALUES, GENOME_LEN, TAPE_LEN};
use protolife_core::{Error, Result};

/// Build a genome from nested rows, rejecting wrong shapes and out-of-range genes
pub fn validate_genome_rows(rows: &[Vec<i64>]) -> Result<Genome> {
    if rows.len() != GENOME_LEN {
        return Err(Error::Validation(format!(
            "Genome has {} rows, expected {}",
            rows.len(),
            GENOME_LEN
        )));
    }

    let mut matrix = [[0u8; CHROMOSOME_LEN]; GENOME_LEN];
    for (row_idx, row) in rows.iter().enumerate() {
        if row.len() != CHROMOSOME_LEN {
            return Err(Error::Validation(format!(
                "Genome row {} has {} genes, expected {}",
                row_idx,
                row.len(),
                CHROMOSOME_LEN
            )));
        }
        for (col_idx, value) in row.iter().enumerate() {
            matrix[row_idx][col_idx] = u8::try_from(*value)
                .ok()
                .filter(|gene| *gene < GENE_VALUES)
                .ok_or_else(|| {
                    Error::Validation(format!(
                        "Gene ({}, {}) = {} is outside [0, {})",
                        row_idx, col_idx, value, GENE_VALUES
                    ))
                })?;
        }
    }

    Ok(Genome::from_rows(matrix))
}

pub fn validate_program_counter(value: i64) -> Result<ProgramCounter> {
    usize::try_from(value)
        .ok()
        .filter(|index| *index < TAPE_LEN)
        .map(ProgramCounter::new)
        .ok_or_else(|| {
            Error::Validation(format!(
                "Program counter {} is outside [0, {})",
                value, TAPE_LEN
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(value: i64) -> Vec<Vec<i64>> {
        vec![vec![value; CHROMOSOME_LEN]; GENOME_LEN]
    }

    #[test]
    fn test_validate_valid_genome() {
        let genome = validate_genome_rows(&rows(16)).unwrap();
        assert_eq!(genome, Genome::photosynthesizer());
    }

    #[test]
    fn test_validate_wrong_shape() {
        let mut short = rows(1);
        short.pop();
        assert!(validate_genome_rows(&short).is_err());

        let mut ragged = rows(1);
        ragged[3].push(1);
        assert!(validate_genome_rows(&ragged).is_err());
    }

    #[test]
    fn test_validate_out_of_range_genes() {
        assert!(validate_genome_rows(&rows(64)).is_err());
        assert!(validate_genome_rows(&rows(-1)).is_err());
        assert!(validate_genome_rows(&rows(63)).is_ok());
    }

    #[test]
    fn test_validate_program_counter() {
        assert_eq!(validate_program_counter(0).unwrap().index(), 0);
        assert_eq!(validate_program_counter(63).unwrap().index(), 63);
        assert!(validate_program_counter(64).is_err());
        assert!(validate_program_counter(-5).is_err());
    }
}
