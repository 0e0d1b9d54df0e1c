use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilewalk_common::Rect;

use crate::objects::{Building, InteractiveObject, Trigger};

/// Errors from grid construction. Runtime queries never fail.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),
    #[error("world size must be positive and finite, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },
    #[error("grid of {cols}x{rows} cells exceeds {max} cells", max = MAX_CELLS)]
    TooLarge { cols: u64, rows: u64 },
}

/// Upper bound on `cols * rows`.
pub const MAX_CELLS: u64 = 1 << 24;

/// Integer cell coordinate. May lie outside the grid; such cells are blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Ground type of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    #[default]
    Grass,
    Path,
    Water,
    Dirt,
}

impl Terrain {
    /// Stable numeric id exposed to renderers.
    pub fn id(self) -> u8 {
        match self {
            Terrain::Grass => 0,
            Terrain::Path => 1,
            Terrain::Water => 2,
            Terrain::Dirt => 3,
        }
    }
}

/// Decorative object standing on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoration {
    Tree,
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: Terrain,
    pub blocked: bool,
    pub decoration: Option<Decoration>,
}

/// Half-open range of cells `[start, end)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    pub fn is_empty(&self) -> bool {
        self.start.x >= self.end.x || self.start.y >= self.end.y
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            ((self.end.x - self.start.x) * (self.end.y - self.start.y)) as usize
        }
    }

    pub fn contains(&self, c: CellCoord) -> bool {
        c.x >= self.start.x && c.x < self.end.x && c.y >= self.start.y && c.y < self.end.y
    }

    /// Row-major iteration.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let (start, end) = (self.start, self.end);
        (start.y..end.y).flat_map(move |y| (start.x..end.x).map(move |x| CellCoord::new(x, y)))
    }
}

/// The tile world: terrain, collision flags, decorations, buildings and
/// interactive objects.
///
/// Passed by reference to every consumer; there is no ambient grid state.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: f32,
    height: f32,
    tile_size: f32,
    cols: i32,
    rows: i32,
    /// Row-major, `rows * cols` entries.
    cells: Vec<Cell>,
    buildings: Vec<Building>,
    interactives: Vec<InteractiveObject>,
}

impl GridWorld {
    /// Create an all-grass, collision-free grid covering `width × height`
    /// world units.
    pub fn new(width: f32, height: f32, tile_size: f32) -> Result<Self, GridError> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(GridError::InvalidTileSize(tile_size));
        }
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(GridError::InvalidWorldSize { width, height });
        }
        let cols = (width / tile_size).ceil() as u64;
        let rows = (height / tile_size).ceil() as u64;
        let count = cols
            .checked_mul(rows)
            .filter(|&n| n <= MAX_CELLS)
            .ok_or(GridError::TooLarge { cols, rows })?;
        let (cols, rows) = (cols as i32, rows as i32);
        tracing::debug!(cols, rows, tile_size, "grid allocated");
        Ok(Self {
            width,
            height,
            tile_size,
            cols,
            rows,
            cells: vec![Cell::default(); count as usize],
            buildings: Vec::new(),
            interactives: Vec::new(),
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// World size in units.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Grid width in cells.
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Grid height in cells.
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Convert a world position to the cell containing it (floor division).
    pub fn world_to_cell(&self, pos: Vec2) -> CellCoord {
        CellCoord {
            x: (pos.x / self.tile_size).floor() as i32,
            y: (pos.y / self.tile_size).floor() as i32,
        }
    }

    /// Top-left world position of a cell.
    pub fn cell_origin(&self, coord: CellCoord) -> Vec2 {
        Vec2::new(
            coord.x as f32 * self.tile_size,
            coord.y as f32 * self.tile_size,
        )
    }

    pub fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.cols && coord.y < self.rows
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| (coord.y * self.cols + coord.x) as usize)
    }

    /// Cell data, `None` outside the grid.
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    /// True when the cell under `pos` is outside the grid or flagged as
    /// colliding. Non-finite positions are blocked.
    pub fn is_blocked(&self, pos: Vec2) -> bool {
        if !pos.is_finite() {
            return true;
        }
        self.is_cell_blocked(self.world_to_cell(pos))
    }

    pub fn is_cell_blocked(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_none_or(|c| c.blocked)
    }

    /// Set a collision flag. Writes outside the grid are ignored.
    pub fn set_collision(&mut self, coord: CellCoord, blocked: bool) {
        if let Some(i) = self.index(coord) {
            self.cells[i].blocked = blocked;
        }
    }

    /// Set the terrain of a cell. Writes outside the grid are ignored.
    pub fn set_terrain(&mut self, coord: CellCoord, terrain: Terrain) {
        if let Some(i) = self.index(coord) {
            self.cells[i].terrain = terrain;
        }
    }

    /// Set or clear a decoration. Writes outside the grid are ignored.
    pub fn set_decoration(&mut self, coord: CellCoord, decoration: Option<Decoration>) {
        if let Some(i) = self.index(coord) {
            self.cells[i].decoration = decoration;
        }
    }

    /// Number of in-grid cells flagged as colliding.
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.blocked).count()
    }

    /// Cells overlapping a world rectangle, clamped to the grid.
    pub fn visible_cells(&self, view: &Rect) -> CellRange {
        let ts = self.tile_size;
        let clamp_x = |v: f32| (v as i32).clamp(0, self.cols);
        let clamp_y = |v: f32| (v as i32).clamp(0, self.rows);
        CellRange {
            start: CellCoord::new(
                clamp_x((view.x / ts).floor()),
                clamp_y((view.y / ts).floor()),
            ),
            end: CellCoord::new(
                clamp_x((view.right() / ts).ceil()),
                clamp_y((view.bottom() / ts).ceil()),
            ),
        }
    }

    /// Place a building given in cell units. Its footprint becomes blocked
    /// (clipped to the grid) and a tile-sized entrance object is registered
    /// just below its bottom edge.
    pub fn add_building(
        &mut self,
        name: impl Into<String>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> &Building {
        let name = name.into();
        let ts = self.tile_size;
        for by in y..y + height {
            for bx in x..x + width {
                self.set_collision(CellCoord::new(bx, by), true);
            }
        }

        let entrance = Vec2::new((x + width / 2) as f32 * ts, (y + height) as f32 * ts);
        tracing::debug!(%name, x, y, width, height, "building placed");
        self.add_interactive(InteractiveObject::new(
            Rect::new(entrance.x, entrance.y, ts, ts),
            format!("{name} entrance"),
            Trigger::BuildingEntrance {
                building: name.clone(),
            },
        ));

        self.buildings.push(Building {
            name,
            rect: Rect::new(
                x as f32 * ts,
                y as f32 * ts,
                width as f32 * ts,
                height as f32 * ts,
            ),
            entrance,
        });
        let last = self.buildings.len() - 1;
        &self.buildings[last]
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building_by_name(&self, name: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.name == name)
    }

    pub fn add_interactive(&mut self, object: InteractiveObject) {
        self.interactives.push(object);
    }

    pub fn interactives(&self) -> &[InteractiveObject] {
        &self.interactives
    }

    /// First interactive object, in insertion order, whose rectangle contains
    /// `pos`.
    pub fn find_interactive_at(&self, pos: Vec2) -> Option<&InteractiveObject> {
        self.interactives.iter().find(|o| o.rect.contains(pos))
    }
}
