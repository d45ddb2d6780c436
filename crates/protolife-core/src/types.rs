//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// One step in `direction`, without any wrapping
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.to_delta();
        self.add(dx, dy)
    }

    /// Wrap the horizontal coordinate; the vertical coordinate is returned only
    /// when it lies inside `[0, height)`.
    pub fn wrap_x(&self, width: i32, height: i32) -> Option<Self> {
        if self.y < 0 || self.y >= height {
            return None;
        }
        Some(Self {
            x: ((self.x % width) + width) % width,
            y: self.y,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass heading. The discriminants are the genome's direction encoding,
/// counter-clockwise starting from east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East = 0,
    NorthEast = 1,
    North = 2,
    NorthWest = 3,
    West = 4,
    SouthWest = 5,
    South = 6,
    SouthEast = 7,
}

impl Direction {
    pub const COUNT: usize = 8;

    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::NorthEast => (1, -1),
            Direction::North => (0, -1),
            Direction::NorthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
        }
    }

    /// All headings in scan order (0..8)
    pub fn all() -> [Direction; 8] {
        [
            Direction::East,
            Direction::NorthEast,
            Direction::North,
            Direction::NorthWest,
            Direction::West,
            Direction::SouthWest,
            Direction::South,
            Direction::SouthEast,
        ]
    }

    /// Heading for an arbitrary integer, taken modulo 8
    pub fn from_index(index: usize) -> Self {
        Self::all()[index % Self::COUNT]
    }

    /// Strict conversion used for decoded input
    pub fn try_from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < Self::COUNT)
            .map(Self::from_index)
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Turn counter-clockwise by `steps` eighths of a circle
    pub fn rotate(&self, steps: usize) -> Self {
        Self::from_index(self.index() + steps % Self::COUNT)
    }
}

/// The closed set of cell kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CellKind {
    Empty,
    Organic,
    Mineral,
    Life,
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CellKind::Empty => "EMPTY",
            CellKind::Organic => "ORGANIC",
            CellKind::Mineral => "MINERAL",
            CellKind::Life => "LIFE",
        };
        f.write_str(name)
    }
}

/// 8-bit RGBA display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const LIGHT_GRAY: Rgba = Rgba::new(211, 211, 211, 255);
    pub const DIM_GRAY: Rgba = Rgba::new(105, 105, 105, 255);
    pub const YELLOW_GREEN: Rgba = Rgba::new(154, 205, 50, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_array(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

/// Live population counters for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub organic: usize,
    pub mineral: usize,
    pub life: usize,
}

impl PopulationStats {
    pub fn record(&mut self, kind: CellKind) {
        match kind {
            CellKind::Empty => {}
            CellKind::Organic => self.organic += 1,
            CellKind::Mineral => self.mineral += 1,
            CellKind::Life => self.life += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.organic + self.mineral + self.life
    }
}
