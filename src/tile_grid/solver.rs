use bitvec::vec::BitVec;
use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::Serialize;
use thiserror::Error;
use crate::tile_grid::{Grid, Position};
use crate::tile_grid::cell::ContradictionError;
use crate::tile_grid::tile_set::{Direction, TileId, TileSet};

/// This error indicates that every solve attempt ended in a contradiction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Failed to collapse the grid after {attempts_total} attempts.")]
pub struct UnsatisfiableError {
    pub attempts_total: u32,
}

/// This struct represents the fully collapsed result of a successful run: exactly one tile per cell.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CollapsedGrid {
    width: usize,
    height: usize,
    tile_id_per_cell: Vec<TileId>,
}

impl CollapsedGrid {
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn tile_at(&self, position: Position) -> TileId {
        if position.row >= self.height || position.column >= self.width {
            panic!("The position {position} does not exist within a {}x{} grid.", self.width, self.height);
        }
        self.tile_id_per_cell[position.row * self.width + position.column]
    }
}

/// This struct orchestrates the collapse of a grid over a tile set: it repeatedly collapses the least entropic cell to a weighted random tile and propagates the resulting restrictions breadth-first, retrying from a full reset whenever a contradiction is reached.
pub struct Solver<'a> {
    tile_set: &'a TileSet,
    grid: Grid,
    pending_cell_indexes: IndexSet<usize>,
    random_instance: fastrand::Rng,
    maximum_attempts_total: u32,
}

impl<'a> Solver<'a> {
    pub fn new(tile_set: &'a TileSet, width: usize, height: usize, random_seed: Option<u64>, maximum_attempts_total: u32) -> Self {
        let grid = Grid::new(width, height, tile_set.tiles_total());
        Solver::new_with_grid(tile_set, grid, random_seed, maximum_attempts_total)
    }
    pub fn new_wrapping(tile_set: &'a TileSet, width: usize, height: usize, random_seed: Option<u64>, maximum_attempts_total: u32) -> Self {
        let grid = Grid::new_wrapping(width, height, tile_set.tiles_total());
        Solver::new_with_grid(tile_set, grid, random_seed, maximum_attempts_total)
    }
    fn new_with_grid(tile_set: &'a TileSet, grid: Grid, random_seed: Option<u64>, maximum_attempts_total: u32) -> Self {
        if grid.tiles_total() != tile_set.tiles_total() {
            panic!("The grid was sized for {} tiles but the tile set contains {} tiles.", grid.tiles_total(), tile_set.tiles_total());
        }
        let random_instance = if let Some(seed) = random_seed {
            fastrand::Rng::with_seed(seed)
        }
        else {
            fastrand::Rng::new()
        };
        Solver {
            tile_set,
            grid,
            pending_cell_indexes: IndexSet::new(),
            random_instance,
            maximum_attempts_total,
        }
    }
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    /// This function runs solve attempts until the grid is fully collapsed or the attempt budget is exhausted. Retries continue consuming the same random stream, so a seeded run is reproducible end to end.
    pub fn run(&mut self) -> Result<CollapsedGrid, UnsatisfiableError> {
        for attempt_index in 0..self.maximum_attempts_total {
            if attempt_index != 0 {
                debug!("resetting grid before attempt {attempt_index}");
                self.grid.reset();
                self.pending_cell_indexes.clear();
            }
            match self.try_collapse_attempt() {
                Ok(collapsed_grid) => {
                    debug!("collapsed grid on attempt {attempt_index}");
                    return Ok(collapsed_grid);
                },
                Err(contradiction_error) => {
                    debug!("attempt {attempt_index} contradicted at {}", contradiction_error.position);
                },
            }
        }
        Err(UnsatisfiableError {
            attempts_total: self.maximum_attempts_total,
        })
    }
    fn try_collapse_attempt(&mut self) -> Result<CollapsedGrid, ContradictionError> {
        loop {
            if let Some(contradicted_position) = self.grid.first_contradicted_position() {
                debug!("grid already contradicted at {contradicted_position}");
                return Err(ContradictionError {
                    position: contradicted_position,
                });
            }
            if self.grid.is_fully_collapsed() {
                debug!("grid is fully collapsed");
                return Ok(self.get_collapsed_grid());
            }
            debug!("finding least entropic cell");
            let selected_cell_index = self.select_least_entropic_cell_index();
            let chosen_tile_id = self.choose_weighted_tile_id(selected_cell_index);
            let selected_position = self.grid.position_of_index(selected_cell_index);
            debug!("collapsing cell at {selected_position} to tile index {}", chosen_tile_id.index());
            self.grid.cell_at_index_mut(selected_cell_index).collapse_to(chosen_tile_id);
            self.propagate_from(selected_cell_index)?;
        }
    }
    /// This function finds the uncollapsed cell with the lowest entropy, breaking ties uniformly at random among the cells tied for the minimum.
    fn select_least_entropic_cell_index(&mut self) -> usize {
        let tile_set = self.tile_set;
        let mut lowest_entropy: Option<OrderedFloat<f32>> = None;
        let mut tied_cell_indexes: Vec<usize> = Vec::new();
        for cell_index in 0..self.grid.cells_total() {
            let cell = self.grid.cell_at_index_mut(cell_index);
            if cell.is_collapsed() {
                continue;
            }
            let cell_entropy = OrderedFloat(cell.entropy(tile_set));
            if let Some(lowest_entropy_value) = lowest_entropy {
                if cell_entropy < lowest_entropy_value {
                    lowest_entropy = Some(cell_entropy);
                    tied_cell_indexes.clear();
                    tied_cell_indexes.push(cell_index);
                }
                else if cell_entropy == lowest_entropy_value {
                    tied_cell_indexes.push(cell_index);
                }
            }
            else {
                lowest_entropy = Some(cell_entropy);
                tied_cell_indexes.push(cell_index);
            }
        }
        if tied_cell_indexes.is_empty() {
            panic!("At least one uncollapsed cell must exist when selecting.");
        }
        if tied_cell_indexes.len() == 1 {
            tied_cell_indexes[0]
        }
        else {
            debug!("breaking tie between {} cells", tied_cell_indexes.len());
            tied_cell_indexes[self.random_instance.usize(0..tied_cell_indexes.len())]
        }
    }
    /// This function chooses one tile from the cell's domain with probability proportional to each candidate's weight, normalized over the domain.
    fn choose_weighted_tile_id(&mut self, cell_index: usize) -> TileId {
        let tile_set = self.tile_set;
        let cell = self.grid.cell_at_index(cell_index);
        let mut weights_total: f32 = 0.0;
        for tile_id in cell.domain() {
            weights_total += tile_set.weight(tile_id);
        }
        let random_value = self.random_instance.f32() * weights_total;
        let mut current_weight: f32 = 0.0;
        let mut chosen_tile_id: Option<TileId> = None;
        for tile_id in cell.domain() {
            current_weight += tile_set.weight(tile_id);
            if current_weight >= random_value {
                chosen_tile_id = Some(tile_id);
                break;
            }
        }
        if chosen_tile_id.is_none() {
            // float roundoff can leave the cumulative scan short of random_value
            chosen_tile_id = cell.domain().last();
        }
        chosen_tile_id.unwrap()
    }
    /// This function drains the pending queue breadth-first starting from the just-collapsed cell, restricting each neighbor to the tiles supported by the source domain and requeueing every neighbor whose domain changed.
    fn propagate_from(&mut self, collapsed_cell_index: usize) -> Result<(), ContradictionError> {
        self.pending_cell_indexes.insert(collapsed_cell_index);
        while !self.pending_cell_indexes.is_empty() {
            let source_cell_index = self.pending_cell_indexes.shift_remove_index(0).unwrap();
            let source_position = self.grid.position_of_index(source_cell_index);
            let neighbor_entries: Vec<(Direction, Position)> = self.grid.neighbors_of(source_position).collect();
            for (direction, neighbor_position) in neighbor_entries {
                let permitted_mask = self.get_flattened_permitted_mask(source_cell_index, direction);
                let neighbor_cell_index = self.grid.index_of_position(neighbor_position);
                let neighbor_cell = self.grid.cell_at_index_mut(neighbor_cell_index);
                let is_domain_changed = neighbor_cell.restrict(&permitted_mask)?;
                if is_domain_changed {
                    debug!("restricted neighbor at {neighbor_position} toward {:?} of {source_position}", direction);
                    self.pending_cell_indexes.insert(neighbor_cell_index);
                }
            }
        }
        Ok(())
    }
    /// This function performs a bitwise OR over the permitted masks of every tile remaining in the source cell's domain for the provided direction.
    fn get_flattened_permitted_mask(&self, cell_index: usize, direction: Direction) -> BitVec {
        let mut flattened_mask: BitVec = BitVec::new();
        for _ in 0..self.tile_set.tiles_total() {
            flattened_mask.push(false);
        }
        for tile_id in self.grid.cell_at_index(cell_index).domain() {
            for permitted_tile_index in self.tile_set.permitted_mask(tile_id, direction).iter_ones() {
                flattened_mask.set(permitted_tile_index, true);
            }
        }
        flattened_mask
    }
    fn get_collapsed_grid(&self) -> CollapsedGrid {
        let mut tile_id_per_cell: Vec<TileId> = Vec::new();
        for cell in self.grid.cells() {
            let tile_id = cell.chosen_tile_id().unwrap();
            debug!("established cell at {} as tile index {}", cell.position(), tile_id.index());
            tile_id_per_cell.push(tile_id);
        }
        CollapsedGrid {
            width: self.grid.width(),
            height: self.grid.height(),
            tile_id_per_cell,
        }
    }
}
