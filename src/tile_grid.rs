use std::fmt::Display;
extern crate pretty_env_logger;
use crate::tile_grid::cell::Cell;
use crate::tile_grid::tile_set::Direction;

pub mod cell;
pub mod solver;
pub mod tile_set;

/// This struct represents a (row, column) coordinate within the grid. The top-left cell is at row zero and column zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Position {
            row,
            column,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// This struct owns every cell of the rectangular grid in one flat, row-major vector. Neighbor positions are computed arithmetically from coordinates instead of being stored as references between cells.
pub struct Grid {
    width: usize,
    height: usize,
    tiles_total: usize,
    is_wrapping: bool,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize, tiles_total: usize) -> Self {
        Grid::new_with_wrapping(width, height, tiles_total, false)
    }
    pub fn new_wrapping(width: usize, height: usize, tiles_total: usize) -> Self {
        Grid::new_with_wrapping(width, height, tiles_total, true)
    }
    fn new_with_wrapping(width: usize, height: usize, tiles_total: usize, is_wrapping: bool) -> Self {
        if width == 0 || height == 0 {
            panic!("The grid dimensions {width}x{height} must both be nonzero.");
        }
        let mut cells: Vec<Cell> = Vec::new();
        for row in 0..height {
            for column in 0..width {
                cells.push(Cell::new(Position::new(row, column), tiles_total));
            }
        }
        Grid {
            width,
            height,
            tiles_total,
            is_wrapping,
            cells,
        }
    }
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn tiles_total(&self) -> usize {
        self.tiles_total
    }
    pub fn cells_total(&self) -> usize {
        self.cells.len()
    }
    pub fn index_of_position(&self, position: Position) -> usize {
        if position.row >= self.height || position.column >= self.width {
            panic!("The position {position} does not exist within a {}x{} grid.", self.width, self.height);
        }
        position.row * self.width + position.column
    }
    pub fn position_of_index(&self, cell_index: usize) -> Position {
        if cell_index >= self.cells.len() {
            panic!("The cell index {cell_index} does not exist within a {}x{} grid.", self.width, self.height);
        }
        Position::new(cell_index / self.width, cell_index % self.width)
    }
    pub fn cell_at(&self, position: Position) -> &Cell {
        let cell_index = self.index_of_position(position);
        &self.cells[cell_index]
    }
    pub fn cell_at_mut(&mut self, position: Position) -> &mut Cell {
        let cell_index = self.index_of_position(position);
        &mut self.cells[cell_index]
    }
    pub fn cell_at_index(&self, cell_index: usize) -> &Cell {
        &self.cells[cell_index]
    }
    pub fn cell_at_index_mut(&mut self, cell_index: usize) -> &mut Cell {
        &mut self.cells[cell_index]
    }
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
    /// This function returns the adjacent position in the provided direction, or None when the edge of a non-wrapping grid is reached.
    pub fn neighbor_of(&self, position: Position, direction: Direction) -> Option<Position> {
        let (row_offset, column_offset) = direction.offset();
        let row = position.row as isize + row_offset;
        let column = position.column as isize + column_offset;
        if self.is_wrapping {
            let wrapped_row = row.rem_euclid(self.height as isize) as usize;
            let wrapped_column = column.rem_euclid(self.width as isize) as usize;
            Some(Position::new(wrapped_row, wrapped_column))
        }
        else if row < 0 || row >= self.height as isize || column < 0 || column >= self.width as isize {
            None
        }
        else {
            Some(Position::new(row as usize, column as usize))
        }
    }
    /// This function yields every existing neighbor of the provided position along with the direction that reaches it. The returned iterator is finite and can be recreated at any time.
    pub fn neighbors_of(&self, position: Position) -> impl Iterator<Item = (Direction, Position)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| {
                self.neighbor_of(position, direction)
                    .map(|neighbor_position| (direction, neighbor_position))
            })
    }
    pub fn first_contradicted_position(&self) -> Option<Position> {
        self.cells
            .iter()
            .find(|cell| cell.domain_size() == 0)
            .map(|cell| cell.position())
    }
    pub fn is_any_domain_empty(&self) -> bool {
        self.first_contradicted_position().is_some()
    }
    pub fn is_fully_collapsed(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.is_collapsed())
    }
    /// This function restores every cell to the full-domain, uncollapsed state. It is the only supported undo mechanism between solve attempts.
    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.reset();
        }
    }
}
