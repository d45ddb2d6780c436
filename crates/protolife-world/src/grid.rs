//! Cell arena for the world.

use crate::cell::Cell;
use protolife_core::{Direction, Error, Position, Result};

/// A grid that wraps horizontally and is bounded vertically.
///
/// Cells live in a flat arena indexed row-major; every slot always holds a
/// cell, empty slots hold `CellState::Empty`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        let cells = (0..size)
            .map(|i| Cell::empty(Self::position_in(width, i)))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of an in-bounds position; no wrapping is applied
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn position_of(&self, index: usize) -> Position {
        Self::position_in(self.width, index)
    }

    fn position_in(width: i32, index: usize) -> Position {
        let index = index as i32;
        Position::new(index % width, index / width)
    }

    /// Slot one step from `pos` in `direction`, wrapping horizontally.
    /// `None` past the top or bottom edge.
    pub fn neighbor_index(&self, pos: Position, direction: Direction) -> Option<usize> {
        pos.step(direction)
            .wrap_x(self.width, self.height)
            .and_then(|wrapped| self.index_of(wrapped))
    }

    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<&Cell> {
        self.neighbor_index(pos, direction).map(|i| &self.cells[i])
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index_of(pos).map(move |i| &mut self.cells[i])
    }

    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    /// Put a cell at `pos`, replacing whatever was there
    pub fn place(&mut self, cell: Cell, pos: Position) -> Result<()> {
        let index = self.checked_index(pos)?;
        self.put(index, cell);
        Ok(())
    }

    /// Replace the slot at `pos` with an empty cell
    pub fn clear(&mut self, pos: Position) -> Result<()> {
        let index = self.checked_index(pos)?;
        self.clear_index(index);
        Ok(())
    }

    /// Store a cell in a slot, syncing its position to the slot
    pub fn put(&mut self, index: usize, mut cell: Cell) {
        cell.position = self.position_of(index);
        self.cells[index] = cell;
    }

    pub fn clear_index(&mut self, index: usize) {
        self.cells[index] = Cell::empty(self.position_of(index));
    }

    /// Move the cell in `from` into `to`, leaving `from` empty
    pub fn relocate(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let vacated = Cell::empty(self.position_of(from));
        let cell = std::mem::replace(&mut self.cells[from], vacated);
        self.put(to, cell);
    }

    /// Empty every slot
    pub fn wipe(&mut self) {
        for index in 0..self.cells.len() {
            self.clear_index(index);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Non-empty cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|cell| !cell.is_empty())
    }

    /// Iterator over all positions
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.position_of(i))
    }

    fn checked_index(&self, pos: Position) -> Result<usize> {
        self.index_of(pos).ok_or_else(|| {
            Error::Validation(format!(
                "Position ({}, {}) is outside the {}x{} grid",
                pos.x, pos.y, self.width, self.height
            ))
        })
    }
}
