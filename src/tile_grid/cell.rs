use bitvec::vec::BitVec;
use thiserror::Error;
use crate::tile_grid::Position;
use crate::tile_grid::tile_set::{TileId, TileSet};

/// This error indicates that a cell's domain became empty, so the current partial assignment cannot be extended to a valid solution.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("The domain of the cell at {position} became empty.")]
pub struct ContradictionError {
    pub position: Position,
}

/// This struct represents the mutable state of one grid position: the set of still-possible tiles and whether the cell has been deliberately collapsed. The domain only ever shrinks between resets.
#[derive(Debug, Clone)]
pub struct Cell {
    position: Position,
    domain: BitVec,
    is_collapsed: bool,
    entropy: Option<f32>,
}

impl Cell {
    pub(crate) fn new(position: Position, tiles_total: usize) -> Self {
        let mut domain: BitVec = BitVec::new();
        for _ in 0..tiles_total {
            domain.push(true);
        }
        Cell {
            position,
            domain,
            is_collapsed: false,
            entropy: None,
        }
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn domain(&self) -> impl Iterator<Item = TileId> + '_ {
        self.domain.iter_ones().map(TileId::new)
    }
    pub fn domain_mask(&self) -> &BitVec {
        &self.domain
    }
    pub fn domain_size(&self) -> usize {
        self.domain.count_ones()
    }
    pub fn contains(&self, tile_id: TileId) -> bool {
        self.domain[tile_id.index()]
    }
    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }
    /// This function returns the tile the cell was collapsed to, or None while the cell is still uncollapsed.
    pub fn chosen_tile_id(&self) -> Option<TileId> {
        if self.is_collapsed {
            self.domain().next()
        }
        else {
            None
        }
    }
    /// This function calculates the Shannon entropy over the normalized weight distribution of the tiles remaining in the domain. A domain with a single candidate has an entropy of zero. The result is cached until the domain changes.
    pub fn entropy(&mut self, tile_set: &TileSet) -> f32 {
        if self.entropy.is_none() {
            if self.domain.count_ones() == 1 {
                self.entropy = Some(0.0);
            }
            else {
                let mut weights_total: f32 = 0.0;
                let mut weights_times_log_weights_total: f32 = 0.0;
                for tile_id in self.domain.iter_ones().map(TileId::new) {
                    let weight = tile_set.weight(tile_id);
                    let log_weight = weight.ln();
                    weights_total += weight;
                    weights_times_log_weights_total += weight * log_weight;
                }
                self.entropy = Some(weights_total.ln() - weights_times_log_weights_total / weights_total);
            }
        }
        self.entropy.unwrap()
    }
    /// This function intersects the domain with the permitted mask and returns whether the domain changed. An empty result is committed and signaled immediately as a contradiction.
    pub(crate) fn restrict(&mut self, permitted_mask: &BitVec) -> Result<bool, ContradictionError> {
        let mut is_domain_changed = false;
        for tile_index in 0..self.domain.len() {
            if self.domain[tile_index] && !permitted_mask[tile_index] {
                self.domain.set(tile_index, false);
                is_domain_changed = true;
            }
        }
        if is_domain_changed {
            self.entropy = None;
            if self.domain.count_ones() == 0 {
                return Err(ContradictionError {
                    position: self.position,
                });
            }
        }
        Ok(is_domain_changed)
    }
    /// This function commits the cell to exactly the provided tile and marks the cell collapsed. Collapsing to a tile outside of the domain is a caller error.
    pub(crate) fn collapse_to(&mut self, tile_id: TileId) {
        if !self.domain[tile_id.index()] {
            panic!("Cannot collapse the cell at {} to tile index {} outside of its domain.", self.position, tile_id.index());
        }
        for tile_index in 0..self.domain.len() {
            self.domain.set(tile_index, tile_index == tile_id.index());
        }
        self.is_collapsed = true;
        self.entropy = None;
    }
    pub(crate) fn reset(&mut self) {
        for tile_index in 0..self.domain.len() {
            self.domain.set(tile_index, true);
        }
        self.is_collapsed = false;
        self.entropy = None;
    }
}
