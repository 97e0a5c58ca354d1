#[macro_use]
extern crate log;

pub mod tile_grid;
