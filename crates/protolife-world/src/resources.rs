//! Depth-banded sunlight and mineral tables.

use protolife_core::ResourceConfig;
use serde::{Deserialize, Serialize};

/// Per-band resource availability, baked once per world.
///
/// Sunlight is strongest in the top band and decays geometrically going down;
/// minerals are richest in the bottom band and decrease linearly going up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTable {
    energy: Vec<f32>,
    minerals: Vec<u32>,
    band_height: i32,
}

impl ResourceTable {
    pub fn new(config: &ResourceConfig, height: i32) -> Self {
        let levels = config.levels.max(1);
        let levels_i32 = i32::try_from(levels).unwrap_or(i32::MAX);

        let mut energy = Vec::with_capacity(levels);
        let mut retention = 1.0f32;
        for _ in 0..levels {
            energy.push(config.max_energy_level * retention);
            retention *= 1.0 - config.energy_loss_per_level;
        }

        let mut minerals = vec![0; levels];
        let mut reduce = 0u32;
        for level in minerals.iter_mut().rev() {
            *level = config.max_mineral_level.saturating_sub(reduce);
            reduce = reduce.saturating_add(config.mineral_loss_per_level);
        }

        Self {
            energy,
            minerals,
            band_height: (height / levels_i32).max(1),
        }
    }

    /// Band index of row `y`
    pub fn band(&self, y: i32) -> usize {
        let band = usize::try_from(y.max(0) / self.band_height).unwrap_or(0);
        band.min(self.energy.len() - 1)
    }

    /// Sunlight energy available at row `y`
    pub fn energy(&self, y: i32) -> f32 {
        self.energy[self.band(y)]
    }

    /// Minerals available at row `y`
    pub fn minerals(&self, y: i32) -> u32 {
        self.minerals[self.band(y)]
    }

    pub fn energy_levels(&self) -> &[f32] {
        &self.energy
    }

    pub fn mineral_levels(&self) -> &[u32] {
        &self.minerals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_decays_geometrically() {
        let table = ResourceTable::new(&ResourceConfig::default(), 80);
        let levels = table.energy_levels();
        assert_eq!(levels.len(), 20);
        assert_eq!(levels[0], 7.0);
        assert!((levels[1] - 7.0 * 0.92).abs() < 1e-5);
        assert!((levels[2] - 7.0 * 0.92 * 0.92).abs() < 1e-5);
        assert!(levels.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_minerals_rise_toward_bottom() {
        let table = ResourceTable::new(&ResourceConfig::default(), 80);
        let levels = table.mineral_levels();
        assert_eq!(levels[19], 7);
        assert_eq!(levels[18], 6);
        assert_eq!(levels[13], 1);
        assert_eq!(levels[12], 0);
        assert_eq!(levels[0], 0);
    }

    #[test]
    fn test_row_lookup_uses_bands() {
        let table = ResourceTable::new(&ResourceConfig::default(), 80);
        // 80 rows over 20 bands: 4 rows per band
        assert_eq!(table.band(0), 0);
        assert_eq!(table.band(3), 0);
        assert_eq!(table.band(4), 1);
        assert_eq!(table.band(79), 19);
        assert_eq!(table.energy(0), 7.0);
        assert_eq!(table.minerals(79), 7);
    }

    #[test]
    fn test_short_and_uneven_heights_stay_in_range() {
        let table = ResourceTable::new(&ResourceConfig::default(), 10);
        assert_eq!(table.band(9), 9);

        let table = ResourceTable::new(&ResourceConfig::default(), 90);
        // 4 rows per band, the last rows share the deepest band
        assert_eq!(table.band(89), 19);
        assert_eq!(table.minerals(89), 7);
    }
}
