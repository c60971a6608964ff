use crate::snake::Direction;

use thiserror::Error;

/// Remaining lifetime of a body cell. `0` marks an empty cell.
pub type Cell = u32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid field dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("no empty cell left on the field")]
    NoEmptyCell,
    #[error("position {0} is outside the field")]
    OutOfRange(usize),
    #[error("position {0} is occupied by the snake")]
    Occupied(usize),
    #[error("a snake of length {length} does not fit behind position {head}")]
    SnakeOutOfBounds { head: usize, length: Cell },
}

/// Row-major grid of snake body lifetimes.
///
/// A cell holding `n > 0` belongs to the snake and empties after `n` more
/// decays, so the head carries the snake length and the tail carries `1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Field {
    pub fn create(width: usize, height: usize) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimensions { width, height });
        }

        Ok(Field { width, height, cells: vec![0; width * height] })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self, pos: usize) -> bool {
        self.get(pos) == 0
    }

    /// Out-of-range positions read as empty.
    pub fn get(&self, pos: usize) -> Cell {
        self.cells.get(pos).copied().unwrap_or(0)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    pub fn occupy(&mut self, pos: usize, value: Cell) -> Result<(), FieldError> {
        let cell = self.cells.get_mut(pos).ok_or(FieldError::OutOfRange(pos))?;
        *cell = value;
        Ok(())
    }

    /// Paints a straight snake whose body trails behind `head_pos`, opposite
    /// to `heading`. Nothing is written if the body would leave the field.
    pub fn seed_snake(&mut self, head_pos: usize, length: Cell, heading: Direction) -> Result<(), FieldError> {
        if head_pos >= self.len() {
            return Err(FieldError::OutOfRange(head_pos));
        }

        let behind = heading.opposite();
        let mut positions = Vec::with_capacity(length as usize);
        let mut pos = head_pos;

        for i in 0..length {
            if i > 0 {
                pos = self.neighbor(pos, behind)
                    .ok_or(FieldError::SnakeOutOfBounds { head: head_pos, length })?;
            }
            positions.push(pos);
        }

        for (pos, value) in positions.into_iter().zip((1..=length).rev()) {
            self.cells[pos] = value;
        }

        Ok(())
    }

    pub fn decay(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| **c > 0) {
            *cell -= 1;
        }
    }

    /// Position of the `n`-th empty cell in row-major order.
    pub fn find_nth_empty(&self, n: usize) -> Result<usize, FieldError> {
        self.cells.iter()
            .enumerate()
            .filter(|&(_, &c)| c == 0)
            .nth(n)
            .map(|(pos, _)| pos)
            .ok_or(FieldError::NoEmptyCell)
    }

    /// The cell one step from `pos` in `direction`, or `None` when the step
    /// crosses the border. Left and right wrap detection works on the linear
    /// index: column 0 cannot go left, the last column cannot go right.
    pub fn neighbor(&self, pos: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Up => pos.checked_sub(self.width),
            Direction::Down => Some(pos + self.width).filter(|&p| p < self.len()),
            Direction::Left if pos % self.width == 0 => None,
            Direction::Left => Some(pos - 1),
            Direction::Right if (pos + 1) % self.width == 0 => None,
            Direction::Right => Some(pos + 1),
        }
    }
}
