/// The archipelago map: a fixed R×C grid of Water/Land tiles.
///
/// Coordinates are `(row, col)`, 0-indexed, row-major. The grid is only
/// written during generation (via `claim`); afterwards it is read-only and
/// tile kind alone governs movement legality.

use super::tile::Tile;

/// Island growth neighbor order: east, south, west, north.
/// Growth truncation at the size cap depends on this order.
pub const GROWTH_DIRS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Enemy wander neighbor order: up, down, left, right.
pub const WANDER_DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }
}

/// Player movement direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit `(d_row, d_col)` delta.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<Vec<Tile>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// All-water grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            tiles: vec![vec![Tile::Water; cols]; rows],
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Tile at `pos`. Out of bounds reads as Water.
    #[inline]
    pub fn tile_at(&self, pos: Pos) -> Tile {
        if self.in_bounds(pos) {
            self.tiles[pos.row][pos.col]
        } else {
            Tile::Water
        }
    }

    #[inline]
    pub fn is_land(&self, pos: Pos) -> bool {
        self.tile_at(pos).is_land()
    }

    /// Neighbor of `pos` by `(dr, dc)`, or None if it falls off the grid.
    pub fn offset(&self, pos: Pos, (dr, dc): (i32, i32)) -> Option<Pos> {
        let r = pos.row as i64 + dr as i64;
        let c = pos.col as i64 + dc as i64;
        if r < 0 || c < 0 {
            return None;
        }
        let next = Pos::new(r as usize, c as usize);
        self.in_bounds(next).then_some(next)
    }

    /// Mark every cell in `cells` as Land. This is the only mutation path.
    pub fn claim(&mut self, cells: &[Pos]) {
        for &p in cells {
            if self.in_bounds(p) {
                self.tiles[p.row][p.col] = Tile::Land;
            }
        }
    }

    /// All cells of the given kind, in row-major order.
    pub fn cells_of(&self, kind: Tile) -> Vec<Pos> {
        let mut out = Vec::new();
        for (r, row) in self.tiles.iter().enumerate() {
            for (c, &t) in row.iter().enumerate() {
                if t == kind {
                    out.push(Pos::new(r, c));
                }
            }
        }
        out
    }

    pub fn land_count(&self) -> usize {
        self.tiles.iter().flatten().filter(|t| t.is_land()).count()
    }

    /// Build a grid from a diagram. `'#'` = Land, anything else = Water.
    #[cfg(test)]
    pub fn from_diagram(rows: &[&str]) -> Self {
        let mut grid = Grid::new(rows.len(), rows[0].len());
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch == '#' {
                    grid.tiles[r][c] = Tile::Land;
                }
            }
        }
        grid
    }
}
