//! Cell coloring: behavior tints and renderer display modes.

use crate::cell::{Cell, CellState};
use protolife_core::Rgba;
use serde::{Deserialize, Serialize};

/// Channel a tint pushes toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hue {
    Red,
    Green,
    Blue,
}

/// Raise one channel by `magnitude` and lower the other two by the same
/// amount, saturating at the channel bounds. Alpha is unchanged.
pub fn tint(color: Rgba, hue: Hue, magnitude: u8) -> Rgba {
    let up = |c: u8| c.saturating_add(magnitude);
    let down = |c: u8| c.saturating_sub(magnitude);
    match hue {
        Hue::Red => Rgba::new(up(color.r), down(color.g), down(color.b), color.a),
        Hue::Green => Rgba::new(down(color.r), up(color.g), down(color.b), color.a),
        Hue::Blue => Rgba::new(down(color.r), down(color.g), up(color.b), color.a),
    }
}

/// How a renderer colors living cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Each cell's own color
    #[default]
    Plain,
    /// Heat scale over the energy reserve
    Energy,
    /// Blue scale over the mineral reserve
    Minerals,
}

impl DisplayMode {
    /// Cycle Plain -> Energy -> Minerals -> Plain
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Plain => DisplayMode::Energy,
            DisplayMode::Energy => DisplayMode::Minerals,
            DisplayMode::Minerals => DisplayMode::Plain,
        }
    }
}

const SCALE_PARTS: u32 = 20;

fn scale_part(value: f32, per_part: f32) -> u8 {
    if per_part <= 0.0 || !value.is_finite() {
        return 0;
    }
    (value / per_part).clamp(0.0, SCALE_PARTS as f32) as u8
}

/// Color a renderer should draw for `cell` in `mode`.
/// Non-living cells always show their own color.
pub fn display_color(cell: &Cell, mode: DisplayMode, max_energy: f32) -> Rgba {
    let life = match (&cell.state, mode) {
        (CellState::Life(life), DisplayMode::Energy | DisplayMode::Minerals) => life,
        _ => return cell.color,
    };

    let (hot, fade, cold) = match mode {
        DisplayMode::Energy => {
            let part = scale_part(life.energy, max_energy / SCALE_PARTS as f32);
            (155 + 5 * part, 140 - 7 * part, 20 + 3 * (SCALE_PARTS as u8 - part))
        }
        _ => {
            let part = life.minerals.min(SCALE_PARTS) as u8;
            (155 + 5 * part, 140 - 7 * part, 20 + 3 * (SCALE_PARTS as u8 - part))
        }
    };

    match mode {
        DisplayMode::Minerals => Rgba::opaque(cold, fade, hot),
        _ => Rgba::opaque(hot, fade, cold),
    }
}
