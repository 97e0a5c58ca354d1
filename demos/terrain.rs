use colored::Colorize;
use tile_grid_collapse::tile_grid::Position;
use tile_grid_collapse::tile_grid::solver::Solver;
use tile_grid_collapse::tile_grid::tile_set::{Tile, TileId, TileSet};

fn print_tile(tile_name: &str) {
    let character = "\u{2588}";
    let colored_character = match tile_name {
        "water" => character.truecolor(64, 96, 224),
        "sand" => character.truecolor(224, 200, 128),
        _ => character.truecolor(64, 160, 64),
    };
    print!("{}{}", colored_character, colored_character);
}

fn main() {
    pretty_env_logger::init();

    let water_tile_id = TileId::new(0);
    let sand_tile_id = TileId::new(1);
    let grass_tile_id = TileId::new(2);
    let tile_set = TileSet::new(vec![
        Tile::new_uniform(String::from("water"), 4.0, vec![water_tile_id, sand_tile_id]),
        Tile::new_uniform(String::from("sand"), 1.0, vec![water_tile_id, sand_tile_id, grass_tile_id]),
        Tile::new_uniform(String::from("grass"), 4.0, vec![sand_tile_id, grass_tile_id]),
    ]).expect("The terrain tile definitions are well-formed.");

    let mut solver = Solver::new(&tile_set, 48, 16, Some(20260806), 10);
    match solver.run() {
        Ok(collapsed_grid) => {
            for row in 0..collapsed_grid.height() {
                for column in 0..collapsed_grid.width() {
                    let tile_id = collapsed_grid.tile_at(Position::new(row, column));
                    print_tile(&tile_set.tile(tile_id).name);
                }
                println!();
            }
        },
        Err(unsatisfiable_error) => {
            eprintln!("{unsatisfiable_error}");
        },
    }
}
