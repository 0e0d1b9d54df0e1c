use tilewalk_grid::{CellCoord, CellRange, Decoration, GridWorld, Terrain};
use tilewalk_kernel::GameWorld;

/// Renderer-agnostic interface. Implementations read the world and produce
/// output; they never mutate it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, world: &GameWorld) -> Self::Output;
}

/// Human-readable frame summary: camera, visible cells, entities in draw
/// order.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &GameWorld) -> String {
        let snap = world.snapshot();
        let mut out = String::new();
        out.push_str(&format!("=== Frame (tick={}) ===\n", snap.tick));
        out.push_str(&format!(
            "Camera: pos=({:.1}, {:.1}) size={:.0}x{:.0}\n",
            snap.camera.x, snap.camera.y, snap.camera.width, snap.camera.height
        ));
        out.push_str(&format!(
            "Visible cells: ({}, {})..({}, {})\n",
            snap.visible_cells.start.x,
            snap.visible_cells.start.y,
            snap.visible_cells.end.x,
            snap.visible_cells.end.y
        ));
        out.push_str(&format!("Entities: {}\n", snap.entities.len()));
        for e in &snap.entities {
            out.push_str(&format!(
                "  [{}] {} ({}) pos=({:.2}, {:.2}) facing={} moving={} frame={}{}\n",
                e.id.short(),
                e.name,
                e.role,
                e.position.x,
                e.position.y,
                e.facing,
                e.moving,
                e.animation_frame,
                if e.on_screen { "" } else { " off-screen" }
            ));
        }
        out
    }
}

/// One character per cell, entities overlaid.
///
/// `.` grass, `=` path, `~` water, `:` dirt, `T` tree, `#` other blocked
/// cells, `@` the player, `N` other entities.
#[derive(Debug, Default)]
pub struct AsciiMapRenderer {
    /// Draw the whole grid instead of the camera's visible cells.
    pub full_map: bool,
}

impl AsciiMapRenderer {
    pub fn visible() -> Self {
        Self { full_map: false }
    }

    pub fn full() -> Self {
        Self { full_map: true }
    }

    fn cell_char(grid: &GridWorld, coord: CellCoord) -> char {
        let Some(cell) = grid.cell(coord) else {
            return ' ';
        };
        if cell.decoration == Some(Decoration::Tree) {
            return 'T';
        }
        match cell.terrain {
            Terrain::Water => '~',
            _ if cell.blocked => '#',
            Terrain::Grass => '.',
            Terrain::Path => '=',
            Terrain::Dirt => ':',
        }
    }
}

impl Renderer for AsciiMapRenderer {
    type Output = String;

    fn render(&self, world: &GameWorld) -> String {
        let grid = world.grid();
        let range = if self.full_map {
            CellRange {
                start: CellCoord::new(0, 0),
                end: CellCoord::new(grid.cols(), grid.rows()),
            }
        } else {
            world.snapshot().visible_cells
        };
        if range.is_empty() {
            return String::new();
        }

        let width = (range.end.x - range.start.x) as usize;
        let mut rows: Vec<Vec<char>> = (range.start.y..range.end.y)
            .map(|y| {
                (range.start.x..range.end.x)
                    .map(|x| Self::cell_char(grid, CellCoord::new(x, y)))
                    .collect()
            })
            .collect();

        // Later entities in draw order overwrite earlier ones, as painting would.
        for entity in world.draw_order() {
            let c = grid.world_to_cell(entity.position());
            if !range.contains(c) {
                continue;
            }
            let glyph = if entity.is_player() { '@' } else { 'N' };
            rows[(c.y - range.start.y) as usize][(c.x - range.start.x) as usize] = glyph;
        }

        let mut out = String::with_capacity(rows.len() * (width + 1));
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

/// The frame snapshot as pretty-printed JSON.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    type Output = Result<String, serde_json::Error>;

    fn render(&self, world: &GameWorld) -> Self::Output {
        serde_json::to_string_pretty(&world.snapshot())
    }
}
