use std::collections::HashSet;

use rand::Rng;

use super::state::Position;

/// Discrete playing field: a `width` x `height` area split into square cells.
///
/// Positions are cell origins, i.e. multiples of `cell_size`. A trailing
/// strip narrower than one cell is not part of the playable area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl Grid {
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);

        Self {
            width: clamp(width),
            height: clamp(height),
            cell_size: clamp(cell_size).max(1),
        }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        self.columns().max(0) as usize * self.rows().max(0) as usize
    }

    /// Whether `pos` lies inside the playable area
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.columns() * self.cell_size
            && pos.y < self.rows() * self.cell_size
    }

    /// (column, row) of the cell containing `pos`
    pub fn cell_index(&self, pos: Position) -> Option<(usize, usize)> {
        self.contains(pos).then(|| {
            (
                (pos.x / self.cell_size) as usize,
                (pos.y / self.cell_size) as usize,
            )
        })
    }

    /// Origin of the cell at (column, row)
    pub fn origin(&self, column: i32, row: i32) -> Position {
        Position::new(column * self.cell_size, row * self.cell_size)
    }

    /// Cell origin closest to the middle of the area
    pub fn center(&self) -> Position {
        Position::new(
            self.width / 2 / self.cell_size * self.cell_size,
            self.height / 2 / self.cell_size * self.cell_size,
        )
    }

    /// Every valid cell origin, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows())
            .flat_map(move |row| (0..self.columns()).map(move |col| self.origin(col, row)))
    }

    /// Pick a uniformly random cell origin
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let column = rng.gen_range(0..self.columns());
        let row = rng.gen_range(0..self.rows());
        self.origin(column, row)
    }

    /// Draw random cells until one is free.
    ///
    /// Returns `None` when `occupied` covers the whole grid, since no draw
    /// could ever succeed.
    pub fn spawn_food<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        occupied: &HashSet<Position>,
    ) -> Option<Position> {
        let free = self.cells().filter(|cell| !occupied.contains(cell)).count();
        if free == 0 {
            return None;
        }

        loop {
            let pos = self.random_cell(rng);
            if !occupied.contains(&pos) {
                return Some(pos);
            }
        }
    }
}
