use serde::{Deserialize, Serialize};

use crate::grid::{CellCoord, Decoration, GridError, GridWorld, Terrain};

/// Fixed parameters the town is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TownParams {
    pub width: f32,
    pub height: f32,
    pub tile_size: f32,
    /// Seed for tree placement. The same seed always yields the same town.
    pub seed: u64,
}

impl Default for TownParams {
    fn default() -> Self {
        Self {
            width: 3200.0,
            height: 3200.0,
            tile_size: 64.0,
            seed: 42,
        }
    }
}

const RIVER_ROWS: i32 = 4;
const NORTH_TREE_ATTEMPTS: usize = 30;
const SOUTH_TREE_ATTEMPTS: usize = 20;

/// Build the town: grass, a river with one bridge, a high street, three
/// north-south streets, the named buildings and scattered trees.
pub fn generate_town(params: &TownParams) -> Result<GridWorld, GridError> {
    let _span = tracing::info_span!("generate_town", seed = params.seed).entered();
    let mut grid = GridWorld::new(params.width, params.height, params.tile_size)?;
    let (cols, rows) = (grid.cols(), grid.rows());

    let river_y = (rows as f32 * 0.6).floor() as i32;
    for x in 0..cols {
        for y in river_y..river_y + RIVER_ROWS {
            let c = CellCoord::new(x, y);
            grid.set_terrain(c, Terrain::Water);
            grid.set_collision(c, true);
        }
    }

    let bridge_x = (cols as f32 * 0.4).floor() as i32;
    for y in river_y..river_y + RIVER_ROWS {
        let c = CellCoord::new(bridge_x, y);
        grid.set_terrain(c, Terrain::Path);
        grid.set_collision(c, false);
    }

    let high_street_y = (rows as f32 * 0.4).floor() as i32;
    for x in 0..cols {
        grid.set_terrain(CellCoord::new(x, high_street_y), Terrain::Path);
        grid.set_terrain(CellCoord::new(x, high_street_y + 1), Terrain::Path);
    }

    let streets = [0.25, 0.5, 0.75].map(|f| (cols as f32 * f).floor() as i32);
    for street_x in streets {
        for y in 0..rows {
            if y < river_y || y >= river_y + RIVER_ROWS {
                grid.set_terrain(CellCoord::new(street_x, y), Terrain::Path);
            }
        }
    }

    let cathedral = (streets[1] - 5, high_street_y - 12);
    grid.add_building("Cathedral", cathedral.0, cathedral.1, 12, 10);
    grid.add_building(
        "High Street Cheese Shop",
        streets[0] + 3,
        high_street_y - 4,
        6,
        3,
    );
    grid.add_building(
        "Pentagon Shopping Center",
        streets[2] + 2,
        high_street_y - 8,
        10,
        7,
    );
    grid.add_building("Rex & Eddie's Office", bridge_x - 8, high_street_y + 5, 7, 5);
    grid.add_building(
        "Rochester Castle",
        cathedral.0 - 10,
        cathedral.1 + 2,
        8,
        8,
    );
    grid.add_building("Town Hall", streets[1] + 3, high_street_y - 5, 8, 4);
    grid.add_building("Library", streets[0] - 6, high_street_y + 8, 6, 4);
    grid.add_building("Police Station", streets[2] - 4, high_street_y + 10, 6, 4);

    let mut rng = TownRng::new(params.seed);
    let mut trees = 0usize;

    for _ in 0..NORTH_TREE_ATTEMPTS {
        let x = (rng.next_f32() * cols as f32).floor() as i32;
        let y = (rng.next_f32() * (rows as f32 / 4.0)).floor() as i32;
        trees += plant_tree(&mut grid, CellCoord::new(x, y)) as usize;
    }

    // The southern band starts a few rows below the three-quarter line,
    // which keeps trees clear of the riverbank.
    let south_y = (rows as f32 * 3.0 / 4.0).floor() as i32;
    let band = (rows - south_y - 3) as f32;
    for _ in 0..SOUTH_TREE_ATTEMPTS {
        let x = (rng.next_f32() * cols as f32).floor() as i32;
        let y = (south_y as f32 + 3.0 + rng.next_f32() * band).floor() as i32;
        trees += plant_tree(&mut grid, CellCoord::new(x, y)) as usize;
    }

    tracing::debug!(
        cols,
        rows,
        buildings = grid.buildings().len(),
        trees,
        blocked = grid.blocked_count(),
        "town generated"
    );
    Ok(grid)
}

/// Trees only grow on free grass.
fn plant_tree(grid: &mut GridWorld, c: CellCoord) -> bool {
    let free_grass = grid
        .cell(c)
        .is_some_and(|cell| cell.terrain == Terrain::Grass && !cell.blocked);
    if free_grass {
        grid.set_decoration(c, Some(Decoration::Tree));
        grid.set_collision(c, true);
    }
    free_grass
}

/// Splitmix64 stream. Platform independent, so a seed reproduces the same
/// town everywhere.
struct TownRng {
    state: u64,
}

impl TownRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }
}
