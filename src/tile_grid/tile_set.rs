use std::{collections::HashMap, fs::File, io::BufReader};
use bitvec::vec::BitVec;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// This struct identifies a single tile within its tile set by the index at which the tile was inserted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(usize);

impl TileId {
    pub fn new(tile_index: usize) -> Self {
        TileId(tile_index)
    }
    pub fn index(&self) -> usize {
        self.0
    }
}

/// This enum represents the four grid-adjacency directions. The row axis grows southward and the column axis grows eastward.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
    /// This function returns the (row, column) offset that moves one cell in this direction.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
    pub(crate) fn index(&self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }
}

/// This error indicates that the provided tile definitions cannot form a usable tile set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidTileSetError {
    #[error("The tile set must contain at least one tile.")]
    EmptyTileSet,
    #[error("The weight {weight} of tile {tile_name:?} must be positive and finite.")]
    NonPositiveWeight {
        tile_name: String,
        weight: f32,
    },
    #[error("Tile {tile_name:?} permits tile index {tile_index} toward {direction:?} but the tile set only contains {tiles_total} tiles.")]
    TileIdOutOfRange {
        tile_name: String,
        direction: Direction,
        tile_index: usize,
        tiles_total: usize,
    },
}

/// This struct is the definition record for one tile: a display name, a relative selection weight, and the tiles it permits adjacent to itself in each direction.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tile {
    pub name: String,
    pub weight: f32,
    pub permitted_tile_ids_per_direction: [Vec<TileId>; 4],
}

impl Tile {
    pub fn new(name: String, weight: f32, permitted_tile_ids_per_direction: [Vec<TileId>; 4]) -> Self {
        Tile {
            name,
            weight,
            permitted_tile_ids_per_direction,
        }
    }
    /// This function makes for conveniently permitting the same tiles in every direction.
    pub fn new_uniform(name: String, weight: f32, permitted_tile_ids: Vec<TileId>) -> Self {
        Tile {
            name,
            weight,
            permitted_tile_ids_per_direction: [
                permitted_tile_ids.clone(),
                permitted_tile_ids.clone(),
                permitted_tile_ids.clone(),
                permitted_tile_ids,
            ],
        }
    }
}

/// This struct represents the static catalog of tiles along with a precomputed permitted-neighbor bit mask per tile per direction. Every declaration is expanded symmetrically at construction, so a tile permitting another toward the east also permits itself from that other tile's west.
#[derive(Debug)]
pub struct TileSet {
    tiles: Vec<Tile>,
    permitted_mask_per_direction_per_tile: Vec<[BitVec; 4]>,
}

impl TileSet {
    pub fn new(tiles: Vec<Tile>) -> Result<Self, InvalidTileSetError> {
        let tiles_total = tiles.len();
        if tiles_total == 0 {
            return Err(InvalidTileSetError::EmptyTileSet);
        }
        for tile in tiles.iter() {
            if !tile.weight.is_finite() || tile.weight <= 0.0 {
                return Err(InvalidTileSetError::NonPositiveWeight {
                    tile_name: tile.name.clone(),
                    weight: tile.weight,
                });
            }
            for direction in Direction::ALL {
                for permitted_tile_id in tile.permitted_tile_ids_per_direction[direction.index()].iter() {
                    if permitted_tile_id.index() >= tiles_total {
                        return Err(InvalidTileSetError::TileIdOutOfRange {
                            tile_name: tile.name.clone(),
                            direction,
                            tile_index: permitted_tile_id.index(),
                            tiles_total,
                        });
                    }
                }
            }
        }

        // for each tile
        //      for each direction
        //          create a mutable bit vector over the whole catalog
        // then expand each declaration into both the declared direction and the inverse direction of the declared tile
        let mut permitted_mask_per_direction_per_tile: Vec<[BitVec; 4]> = Vec::new();
        for _ in 0..tiles_total {
            let mut permitted_mask_per_direction: [BitVec; 4] = [BitVec::new(), BitVec::new(), BitVec::new(), BitVec::new()];
            for permitted_mask in permitted_mask_per_direction.iter_mut() {
                for _ in 0..tiles_total {
                    permitted_mask.push(false);
                }
            }
            permitted_mask_per_direction_per_tile.push(permitted_mask_per_direction);
        }
        for (tile_index, tile) in tiles.iter().enumerate() {
            for direction in Direction::ALL {
                for permitted_tile_id in tile.permitted_tile_ids_per_direction[direction.index()].iter() {
                    permitted_mask_per_direction_per_tile[tile_index][direction.index()].set(permitted_tile_id.index(), true);
                    permitted_mask_per_direction_per_tile[permitted_tile_id.index()][direction.opposite().index()].set(tile_index, true);
                }
            }
        }

        Ok(TileSet {
            tiles,
            permitted_mask_per_direction_per_tile,
        })
    }
    /// This function learns a tile set from a rectangular character sample: one tile per distinct symbol, weights from occurrence counts, and adjacency from the neighbor pairs observed in the sample. The returned mapping relates each symbol to the tile it produced.
    pub fn new_from_sample(sample_rows: &[&str]) -> Result<(Self, HashMap<char, TileId>), InvalidTileSetError> {
        let mut tile_id_per_symbol: HashMap<char, TileId> = HashMap::new();
        let mut symbols: Vec<char> = Vec::new();
        let mut occurrences_per_symbol: Vec<f32> = Vec::new();
        let mut sample_cells: Vec<Vec<usize>> = Vec::new();

        for sample_row in sample_rows.iter() {
            let mut sample_cell_row: Vec<usize> = Vec::new();
            for symbol in sample_row.chars() {
                let tile_id = if let Some(tile_id) = tile_id_per_symbol.get(&symbol) {
                    *tile_id
                }
                else {
                    let tile_id = TileId::new(symbols.len());
                    tile_id_per_symbol.insert(symbol, tile_id);
                    symbols.push(symbol);
                    occurrences_per_symbol.push(0.0);
                    tile_id
                };
                occurrences_per_symbol[tile_id.index()] += 1.0;
                sample_cell_row.push(tile_id.index());
            }
            sample_cells.push(sample_cell_row);
        }

        if symbols.is_empty() {
            return Err(InvalidTileSetError::EmptyTileSet);
        }

        // observed adjacency pairs; eastward and southward observations cover both directions once expanded symmetrically
        let mut permitted_tile_ids_per_direction_per_tile: Vec<[Vec<TileId>; 4]> = Vec::new();
        for _ in 0..symbols.len() {
            permitted_tile_ids_per_direction_per_tile.push([Vec::new(), Vec::new(), Vec::new(), Vec::new()]);
        }
        for (row_index, sample_cell_row) in sample_cells.iter().enumerate() {
            for (column_index, tile_index) in sample_cell_row.iter().enumerate() {
                if column_index + 1 < sample_cell_row.len() {
                    let east_tile_id = TileId::new(sample_cell_row[column_index + 1]);
                    let permitted_tile_ids = &mut permitted_tile_ids_per_direction_per_tile[*tile_index][Direction::East.index()];
                    if !permitted_tile_ids.contains(&east_tile_id) {
                        permitted_tile_ids.push(east_tile_id);
                    }
                }
                if row_index + 1 < sample_cells.len() && column_index < sample_cells[row_index + 1].len() {
                    let south_tile_id = TileId::new(sample_cells[row_index + 1][column_index]);
                    let permitted_tile_ids = &mut permitted_tile_ids_per_direction_per_tile[*tile_index][Direction::South.index()];
                    if !permitted_tile_ids.contains(&south_tile_id) {
                        permitted_tile_ids.push(south_tile_id);
                    }
                }
            }
        }

        let mut tiles: Vec<Tile> = Vec::new();
        for (tile_index, symbol) in symbols.iter().enumerate() {
            let permitted_tile_ids_per_direction = permitted_tile_ids_per_direction_per_tile[tile_index].clone();
            tiles.push(Tile::new(symbol.to_string(), occurrences_per_symbol[tile_index], permitted_tile_ids_per_direction));
        }

        let tile_set = TileSet::new(tiles)?;
        Ok((tile_set, tile_id_per_symbol))
    }
    pub fn tiles_total(&self) -> usize {
        self.tiles.len()
    }
    pub fn tile(&self, tile_id: TileId) -> &Tile {
        &self.tiles[tile_id.index()]
    }
    pub fn weight(&self, tile_id: TileId) -> f32 {
        self.tiles[tile_id.index()].weight
    }
    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> {
        (0..self.tiles.len()).map(TileId::new)
    }
    /// This function returns true if the other tile is permitted adjacent to the tile in the provided direction.
    pub fn compatible(&self, tile_id: TileId, direction: Direction, other_tile_id: TileId) -> bool {
        self.permitted_mask_per_direction_per_tile[tile_id.index()][direction.index()][other_tile_id.index()]
    }
    /// This function returns the bit mask of every tile permitted adjacent to the tile in the provided direction.
    pub fn permitted_mask(&self, tile_id: TileId, direction: Direction) -> &BitVec {
        &self.permitted_mask_per_direction_per_tile[tile_id.index()][direction.index()]
    }
    pub fn save_to_file(&self, file_path: &str) {
        let serialized_tiles = serde_json::to_string(&self.tiles).unwrap();
        std::fs::write(file_path, serialized_tiles).unwrap();
    }
    pub fn load_from_file(file_path: &str) -> Result<Self, InvalidTileSetError> {
        let file = File::open(file_path).unwrap();
        let reader = BufReader::new(file);
        let deserialized_tiles: Vec<Tile> = serde_json::from_reader(reader).unwrap();
        TileSet::new(deserialized_tiles)
    }
}
