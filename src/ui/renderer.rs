/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout: HUD on top, the map on the left (one map cell = two
/// terminal columns), the message log on the right, outcome banner and
/// key help under the map.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use rand::Rng;

use crate::domain::grid::Pos;
use crate::domain::tile::Tile;
use crate::sim::session::Session;
use crate::sim::world::{CellView, GameState, Phase};

pub const PLAYER_GLYPH: char = '😊';
pub const ENEMY_GLYPH: char = '🧟';

const LAND_BG: Color = Color::Rgb { r: 70, g: 140, b: 60 };
const WATER_BG: Color = Color::Rgb { r: 30, g: 80, b: 160 };
const HUD_BG: Color = Color::Rgb { r: 20, g: 40, b: 60 };

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool, // occupies 2 terminal columns
    cont: bool, // right half of a wide char (skip render)
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 12, g: 18, b: 30 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    /// Never equal to a composed cell; used to force a full repaint.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, bg: Color) -> Self {
        let mut cell = Self::from_char(c, Color::Reset, bg);
        cell.wide = true;
        cell
    }

    fn wide_cont(bg: Color) -> Self {
        Cell { ch: [0; 4], ch_len: 0, bg: Self::norm_bg(bg), cont: true, ..Self::BLANK }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y), one column per char, clipped at `max_x`.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color, max_x: usize) {
        let limit = max_x.min(self.width);
        for (i, ch) in s.chars().enumerate() {
            let cx = x + i;
            if cx >= limit { break; }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::White, bg));
        }
    }
}

// ── Cell visuals ──

/// Background and optional glyph for one map cell.
/// Glyphs sit on the terrain color of the cell they occupy.
fn cell_visual(view: CellView, terrain: Tile) -> (Option<char>, Color) {
    let bg = match terrain {
        Tile::Land => LAND_BG,
        Tile::Water => WATER_BG,
    };
    let glyph = match view {
        CellView::Player => Some(PLAYER_GLYPH),
        CellView::Item(kind) => Some(kind.glyph()),
        CellView::Enemy => Some(ENEMY_GLYPH),
        CellView::Terrain(_) => None,
    };
    (glyph, bg)
}

// ── Renderer ──

/// Each map cell is two terminal columns.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const LOG_GAP: usize = 3;
const LOG_LINES: usize = 12;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.sync_size(terminal::size().unwrap_or((80, 24)));
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    fn sync_size(&mut self, (tw, th): (u16, u16)) {
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render<R: Rng>(&mut self, session: &Session<R>) -> io::Result<()> {
        let size = terminal::size().unwrap_or((80, 24));
        if size.0 as usize != self.term_w || size.1 as usize != self.term_h {
            self.sync_size(size);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose(session);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(Cell::BASE_BG))?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose<R: Rng>(&mut self, session: &Session<R>) {
        let state = session.state();
        self.compose_hud(state, session.games_started());
        self.compose_map(state);
        self.compose_log(session, state.grid.cols() * CELL_W + LOG_GAP);

        let below = MAP_ROW + state.grid.rows() + 1;
        self.compose_banner(state, below);
        let help = " Arrows/WASD: Move   R: New map   Q/Esc: Quit";
        self.front.put_str(0, below + 2, help, Color::DarkGrey, Color::Reset, usize::MAX);
    }

    fn compose_hud(&mut self, state: &GameState, game_no: u32) {
        let boat = if state.player.has_boat { "yes" } else { "no" };
        let whereabouts = match state.island_of(state.player.pos) {
            Some(i) => format!("Island {}/{}", i + 1, state.islands.len()),
            None => "At sea".to_string(),
        };
        let hud = format!(
            " ARCHIPELAGO  Map #{}   {}   Treasure {}/{}   Boat: {}   Moves: {} ",
            game_no,
            whereabouts,
            state.treasures_collected(),
            state.treasure_total,
            boat,
            state.moves,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG, usize::MAX);
    }

    fn compose_map(&mut self, state: &GameState) {
        for r in 0..state.grid.rows() {
            let row = MAP_ROW + r;
            if row >= self.front.height { break; }
            for c in 0..state.grid.cols() {
                let col = c * CELL_W;
                if col + 1 >= self.front.width { break; }
                let pos = Pos::new(r, c);
                let (glyph, bg) = cell_visual(state.cell_view(pos), state.grid.tile_at(pos));
                match glyph {
                    Some(ch) => {
                        self.front.set(col, row, Cell::from_char_wide(ch, bg));
                        self.front.set(col + 1, row, Cell::wide_cont(bg));
                    }
                    None => {
                        self.front.set(col, row, Cell::from_char(' ', Color::White, bg));
                        self.front.set(col + 1, row, Cell::from_char(' ', Color::White, bg));
                    }
                }
            }
        }
    }

    /// Newest message at the top.
    fn compose_log<R: Rng>(&mut self, session: &Session<R>, x: usize) {
        if x >= self.front.width { return; }
        let title = Color::Rgb { r: 255, g: 220, b: 120 };
        self.front.put_str(x, MAP_ROW, "── Messages ──", title, Color::Reset, usize::MAX);
        for (i, line) in session.log().recent(LOG_LINES).enumerate() {
            let y = MAP_ROW + 1 + i;
            if y >= self.front.height { break; }
            let stamp = line.timestamp();
            self.front.put_str(x, y, &stamp, Color::DarkGrey, Color::Reset, usize::MAX);
            let tx = x + stamp.chars().count() + 1;
            self.front.put_str(tx, y, &line.text, Color::White, Color::Reset, usize::MAX);
        }
    }

    fn compose_banner(&mut self, state: &GameState, y: usize) {
        let (text, fg) = match state.phase {
            Phase::Active => return,
            Phase::Won => (" ★ ALL TREASURE FOUND! ★  Press R for a new map", Color::Rgb { r: 255, g: 220, b: 50 }),
            Phase::Lost => (" ✕ CAUGHT BY A ZOMBIE ✕  Press R for a new map", Color::Rgb { r: 255, g: 70, b: 70 }),
        };
        self.front.put_str(0, y, text, fg, Color::Reset, usize::MAX);
    }
}
