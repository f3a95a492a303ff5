/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// This eliminates flicker caused by full-screen redraws.
///
/// The simulation runs in pixels; the renderer maps world pixels to
/// terminal cells (PX_PER_COL x PX_PER_ROW per cell, roughly square on
/// screen given the usual 1:2 glyph aspect) and owns the camera.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{EnemyKind, Facing, ItemKind};
use crate::sim::world::{Phase, Snapshot, SpriteKind, SpriteView};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; 16],  // up to 16 bytes (supports ZWJ emoji sequences)
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // true = this char occupies 2 terminal columns
    cont: bool,    // true = continuation of previous wide char (skip render)
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells.
    ///
    /// On VTE-based Linux terminals (GNOME Terminal, etc.), the inter-row gap
    /// pixels use the background color from the last Clear or the terminal's
    /// configured default.  By using the SAME explicit RGB for both
    /// `Clear(ClearType::All)` and every cell's background, the gap color
    /// matches the cell color exactly, eliminating visible horizontal lines.
    const BASE_BG: Color = Color::Rgb { r: 12, g: 10, b: 28 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 16],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0,0,0, 0,0,0,0, 0,0,0,0, 0,0,0,0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    /// Normalize bg: Color::Reset → BASE_BG so that every cell gets an
    /// explicit background color (never terminal-default).
    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell
    }

    fn from_char_wide(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        let len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.ch_len = len;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        if self.ch_len == 0 { return ""; }
        unsafe { std::str::from_utf8_unchecked(&self.ch[..self.ch_len as usize]) }
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
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
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

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width { break; }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            cx += 1;
        }
    }
}

// ── Renderer ──

/// World pixels per terminal cell. Glyphs are roughly twice as tall as
/// they are wide, so the vertical step is doubled to keep shapes square.
const PX_PER_COL: f32 = 10.0;
const PX_PER_ROW: f32 = 20.0;

/// Vertical offsets
const HUD_ROW: usize = 0;
const BOSS_ROW: usize = 1;
const MAP_ROW: usize = 2;
const FOOTER_ROWS: usize = 2;

/// Smoothed-follow easing factor per frame.
const CAM_EASE: f32 = 0.1;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    cam_x: f32,
    cam_y: f32,
    /// Frame counter for blink effects.
    tick: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            cam_x: 0.0,
            cam_y: 0.0,
            tick: 0,
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

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, snap: &Snapshot) -> io::Result<()> {
        self.tick = self.tick.wrapping_add(1);

        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            // Force full repaint after resize.
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Detect phase change → clear for clean transition
        let phase_changed = self.last_phase != Some(snap.phase);
        if phase_changed {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(snap.phase);
        }

        if snap.phase != Phase::Title {
            self.update_camera(snap, phase_changed);
        }

        // Build front buffer
        self.front.clear();

        match snap.phase {
            Phase::Title => self.compose_title(),
            Phase::Playing => self.compose_game(snap),
            Phase::GameOver => {
                self.compose_game(snap);
                self.compose_game_over(snap);
            }
        }

        if snap.paused {
            self.compose_pause_overlay();
        }

        // Diff and emit
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    fn view_rows(&self) -> usize {
        self.term_h.saturating_sub(MAP_ROW + FOOTER_ROWS).max(1)
    }

    /// Smoothed follow: ease toward a point a third of the view ahead of
    /// the player, clamped to world bounds.
    fn update_camera(&mut self, snap: &Snapshot, snap_to_target: bool) {
        let view_w_px = self.term_w as f32 * PX_PER_COL;
        let view_h_px = self.view_rows() as f32 * PX_PER_ROW;

        let target_x = (snap.player_x - view_w_px / 2.5)
            .clamp(0.0, (snap.world_w - view_w_px).max(0.0));
        let target_y = (snap.player_y - view_h_px / 2.0)
            .clamp(0.0, (snap.world_h - view_h_px).max(0.0));

        if snap_to_target {
            self.cam_x = target_x;
            self.cam_y = target_y;
        } else {
            self.cam_x += (target_x - self.cam_x) * CAM_EASE;
            self.cam_y += (target_y - self.cam_y) * CAM_EASE;
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Set explicit base colors at start of frame.
        // IMPORTANT: Do NOT use ResetColor here — it resets to the terminal's
        // native default, which may differ from BASE_BG and cause line artifacts.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                // Skip continuation cells (right half of wide emoji)
                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                // For wide cells, also check if the continuation changed
                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
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
                    // Wide char printed: cursor advanced 2 columns
                    last_x = x + 1;
                    x += 2; // skip the continuation cell
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

    fn compose_game(&mut self, snap: &Snapshot) {
        self.compose_hud(snap);
        self.compose_boss_row(snap);

        let rows = self.view_rows();

        for s in &snap.sprites {
            self.compose_sprite(s, rows);
        }

        // Floating combat texts, one row above their anchor
        for t in &snap.texts {
            let col = ((t.x - self.cam_x) / PX_PER_COL) as i64;
            let row = ((t.y - self.cam_y) / PX_PER_ROW) as i64 - 1;
            if row >= 0 && (row as usize) < rows {
                let fg = if t.text.starts_with('-') {
                    Color::Rgb { r: 255, g: 90, b: 90 }
                } else {
                    Color::Rgb { r: 255, g: 230, b: 120 }
                };
                let start = col.max(0) as usize;
                let skip = (start as i64 - col) as usize;
                let visible: String = t.text.chars().skip(skip).collect();
                self.front.put_str(start, MAP_ROW + row as usize, &visible, fg, Color::Reset);
            }
        }

        // ── Help bar ──
        let help_row = self.term_h.saturating_sub(1);
        if help_row > MAP_ROW {
            let help = " ←→/AD:Move  W/Space:Jump  J/Z:Slash  K/X:Dash  L/C:Ultimate  P:Pause  │  Pad: A/X/R1/Y";
            self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
        }
    }

    /// Map one sprite's pixel AABB onto the cell grid.
    fn compose_sprite(&mut self, s: &SpriteView, rows: usize) {
        let x0 = ((s.x - self.cam_x) / PX_PER_COL).floor() as i64;
        let y0 = ((s.y - self.cam_y) / PX_PER_ROW).floor() as i64;
        let x1 = (((s.x + s.w - self.cam_x) / PX_PER_COL).ceil() as i64).max(x0 + 1);
        let y1 = (((s.y + s.h - self.cam_y) / PX_PER_ROW).ceil() as i64).max(y0 + 1);

        if x1 < 0 || y1 < 0 || x0 >= self.term_w as i64 || y0 >= rows as i64 {
            return;
        }

        match s.kind {
            SpriteKind::Player { facing, attacking, invincible, shielded } => {
                self.compose_player(x0, y0, x1, y1, facing, attacking, invincible, shielded, rows);
                return;
            }
            SpriteKind::Particle => {
                if x0 >= 0 && y0 >= 0 && (y0 as usize) < rows {
                    let c = Cell::from_char('·', Color::Rgb { r: 255, g: 170, b: 60 }, Color::Reset);
                    self.front.set(x0 as usize, MAP_ROW + y0 as usize, c);
                }
                return;
            }
            _ => {}
        }

        let (ch, fg, bg) = sprite_style(s.kind);
        for gy in y0.max(0)..y1.min(rows as i64) {
            for gx in x0.max(0)..x1.min(self.term_w as i64) {
                self.front.set(gx as usize, MAP_ROW + gy as usize, Cell::from_char(ch, fg, bg));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn compose_player(
        &mut self,
        x0: i64, y0: i64, x1: i64, y1: i64,
        facing: Facing, attacking: bool, invincible: bool, shielded: bool,
        rows: usize,
    ) {
        // Blink while invincible
        if invincible && (self.tick / 3) % 2 == 1 {
            return;
        }

        let body_fg = if shielded {
            Color::Rgb { r: 120, g: 220, b: 255 }
        } else {
            Color::Rgb { r: 80, g: 255, b: 160 }
        };

        let cx = (x0 + x1) / 2 - 1;
        let cy = (y0 + y1) / 2;
        if cy >= 0 && (cy as usize) < rows && cx >= 0 && cx + 1 < self.term_w as i64 {
            let row = MAP_ROW + cy as usize;
            self.front.set(cx as usize, row, Cell::from_char_wide('🤖', body_fg, Color::Reset));
            self.front.set(cx as usize + 1, row, Cell::WIDE_CONT);

            if shielded {
                let ring = Cell::from_char('◦', body_fg, Color::Reset);
                if cx > 0 { self.front.set(cx as usize - 1, row, ring); }
                if cx + 2 < self.term_w as i64 { self.front.set(cx as usize + 2, row, ring); }
            }

            // Claw slash arc on the attacking side
            if attacking {
                let slash_fg = Color::Rgb { r: 255, g: 80, b: 200 };
                let (sx, ch) = match facing {
                    Facing::Right => (cx + 2 + if shielded { 1 } else { 0 }, '⟩'),
                    Facing::Left => (cx - 1 - if shielded { 1 } else { 0 }, '⟨'),
                };
                for dx in 0..3 {
                    let col = match facing {
                        Facing::Right => sx + dx,
                        Facing::Left => sx - dx,
                    };
                    if col >= 0 && (col as usize) < self.term_w {
                        self.front.set(col as usize, row, Cell::from_char(ch, slash_fg, Color::Reset));
                    }
                }
            }
        }
    }

    // ── HUD ──

    fn compose_hud(&mut self, snap: &Snapshot) {
        let hud_bg = Color::Rgb { r: 16, g: 16, b: 48 };
        for x in 0..self.front.width {
            self.front.set(x, HUD_ROW, Cell::from_char(' ', Color::White, hud_bg));
        }

        let hp_col = if snap.hp / snap.max_hp > 0.35 {
            Color::Rgb { r: 90, g: 255, b: 90 }
        } else {
            Color::Rgb { r: 255, g: 80, b: 80 }
        };
        let hp_bar = meter(snap.hp, snap.max_hp, 10);
        self.front.put_str(1, HUD_ROW, "HP", Color::White, hud_bg);
        self.front.put_str(4, HUD_ROW, &hp_bar, hp_col, hud_bg);

        let en_col = if snap.ultimate_ready {
            Color::Rgb { r: 255, g: 230, b: 80 }
        } else {
            Color::Rgb { r: 100, g: 200, b: 255 }
        };
        let en_bar = meter(snap.energy, 100.0, 10);
        self.front.put_str(16, HUD_ROW, "EN", Color::White, hud_bg);
        self.front.put_str(19, HUD_ROW, &en_bar, en_col, hud_bg);
        if snap.ultimate_ready && (self.tick / 5) % 2 == 0 {
            self.front.put_str(30, HUD_ROW, "ULT!", en_col, hud_bg);
        }

        let st_bar = meter(snap.stamina, snap.max_stamina, 10);
        self.front.put_str(36, HUD_ROW, "ST", Color::White, hud_bg);
        self.front.put_str(39, HUD_ROW, &st_bar, Color::Rgb { r: 200, g: 160, b: 255 }, hud_bg);

        let mut badges = String::new();
        if snap.shield { badges.push_str(" ◯SHLD"); }
        if snap.buffed { badges.push_str(" ▲BOOST"); }
        if !snap.dodge_ready { badges.push_str(" dash.."); }
        self.front.put_str(50, HUD_ROW, &badges, Color::Rgb { r: 120, g: 220, b: 255 }, hud_bg);

        let right = format!(
            "Score {:<7} Kills {:<4} Lv{}  {}s ",
            snap.score, snap.kills, snap.difficulty, snap.survival_secs as u32,
        );
        let rx = self.front.width.saturating_sub(right.len());
        self.front.put_str(rx, HUD_ROW, &right, Color::White, hud_bg);
    }

    fn compose_boss_row(&mut self, snap: &Snapshot) {
        if let Some(boss) = &snap.boss {
            let bg = Color::Rgb { r: 50, g: 10, b: 20 };
            for x in 0..self.front.width {
                self.front.set(x, BOSS_ROW, Cell::from_char(' ', Color::White, bg));
            }
            let bar = meter(boss.hp, boss.max_hp, 24);
            let label = format!(" ☠ {} ", boss.name);
            self.front.put_str(1, BOSS_ROW, &label, Color::Rgb { r: 255, g: 120, b: 160 }, bg);
            self.front.put_str(1 + label.len(), BOSS_ROW, &bar, Color::Rgb { r: 255, g: 60, b: 100 }, bg);
        } else if let Some(secs) = snap.boss_countdown {
            if secs <= 5.0 {
                let warn = format!(" ⚠ BOSS INBOUND {:.0} ", secs.ceil());
                let fg = if (self.tick / 4) % 2 == 0 {
                    Color::Rgb { r: 255, g: 80, b: 80 }
                } else {
                    Color::Rgb { r: 255, g: 200, b: 80 }
                };
                let cx = self.front.width.saturating_sub(warn.len()) / 2;
                self.front.put_str(cx, BOSS_ROW, &warn, fg, Color::Reset);
            }
        }
    }

    // ── Static screens ──

    fn compose_title(&mut self) {
        let title = [
            r" _  _  ___  ___   _  _    ___  _      _   _    _ ",
            r"| \| || __|/ _ \ | \| |  / __|| |    /_\ | |  | |",
            r"| .` || _|| (_) || .` | | (__ | |__ / _ \| |/\| |",
            r"|_|\_||___|\___/ |_|\_|  \___||____/_/ \_\__/\__/",
        ];

        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 2 + i, line, Color::Rgb { r: 255, g: 80, b: 200 }, Color::Reset);
        }

        let subtitle = "◈◈  Survive the Neon Grid  ◈◈";
        let sx = 2 + (title[1].len().saturating_sub(subtitle.len())) / 2;
        self.front.put_str(sx, 7, subtitle, Color::Rgb { r: 80, g: 255, b: 160 }, Color::Reset);

        let tagline = "━━━ Terminal Edition (Rust) ━━━";
        let tx = 2 + (title[1].len().saturating_sub(tagline.len())) / 2;
        self.front.put_str(tx, 9, tagline, Color::Rgb { r: 140, g: 120, b: 200 }, Color::Reset);

        let menu_base = 12;
        let hi = Color::Rgb { r: 80, g: 255, b: 160 };
        self.front.put_str(8, menu_base, "ENTER   Jack In", hi, Color::Reset);
        self.front.put_str(8, menu_base + 1, "  Q     Quit", Color::White, Color::Reset);

        let help = [
            "Controls",
            "  ←→ / AD       Move          W/Space  Jump (double)",
            "  J/Z           Slash         K/X      Dash",
            "  L/C           Ultimate      P        Pause",
            "  Pad: stick/d-pad Move, A Jump, X/B Slash, R1 Dash, Y Ult",
        ];
        let help_base = menu_base + 3;
        for (i, line) in help.iter().enumerate() {
            let color = if i == 0 { Color::Rgb { r: 255, g: 200, b: 50 } } else { Color::White };
            self.front.put_str(8, help_base + i, line, color, Color::Reset);
        }
    }

    fn compose_game_over(&mut self, snap: &Snapshot) {
        let box_art = [
            "╔════════════════════════════════╗",
            "║     ✕ SIGNAL  TERMINATED ✕     ║",
            "╚════════════════════════════════╝",
        ];
        for (i, l) in box_art.iter().enumerate() {
            self.front.put_str(6, 4 + i, l, Color::Rgb { r: 255, g: 60, b: 60 }, Color::Reset);
        }
        let score = format!("◈ Final Score: {}", snap.score);
        let kills = format!("◈ Kills: {}", snap.kills);
        let time = format!("◈ Survived: {}s  (danger Lv{})", snap.survival_secs as u32, snap.difficulty);
        self.front.put_str(8, 9, &score, Color::White, Color::Reset);
        self.front.put_str(8, 10, &kills, Color::White, Color::Reset);
        self.front.put_str(8, 11, &time, Color::White, Color::Reset);
        self.front.put_str(8, 13, "▸ ENTER: Jack In Again", Color::Rgb { r: 80, g: 255, b: 160 }, Color::Reset);
        self.front.put_str(8, 14, "▸ ESC:   Back to Title", Color::DarkGrey, Color::Reset);
    }

    fn compose_pause_overlay(&mut self) {
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };
        let blink = (self.tick / 8) % 2 == 0;

        let rows = self.view_rows();
        let box_w = 24_usize.min(self.term_w);
        let box_h = 5_usize.min(rows);
        let box_x = self.term_w.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + rows.saturating_sub(box_h) / 2;

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::from_char(' ', Color::Reset, dim));
            }
        }

        let hdr = Color::Rgb { r: 255, g: 220, b: 50 };
        let label = if blink { "▶  PAUSED  ◀" } else { "   PAUSED   " };
        self.front.put_str(box_x + (box_w.saturating_sub(label.len())) / 2, box_y + 1, label, hdr, dim);
        self.front.put_str(box_x + 3, box_y + 3, "P: Resume  ESC: Quit", Color::Rgb { r: 180, g: 180, b: 180 }, dim);
    }
}

/// Fixed-width bar like `███████░░░`.
fn meter(value: f32, max: f32, width: usize) -> String {
    let ratio = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f32).round() as usize;
    let mut s = String::with_capacity(width * 3);
    for i in 0..width {
        s.push(if i < filled { '█' } else { '░' });
    }
    s
}

/// Glyph and colors for every fill-rect sprite.
fn sprite_style(kind: SpriteKind) -> (char, Color, Color) {
    match kind {
        SpriteKind::Platform => (
            '▓',
            Color::Rgb { r: 90, g: 70, b: 140 },
            Color::Rgb { r: 40, g: 30, b: 70 },
        ),
        SpriteKind::Spring => ('Ξ', Color::Rgb { r: 120, g: 255, b: 120 }, Color::Reset),
        SpriteKind::Spike => ('▲', Color::Rgb { r: 255, g: 90, b: 90 }, Color::Reset),
        SpriteKind::Shot => ('•', Color::Rgb { r: 255, g: 120, b: 60 }, Color::Reset),
        SpriteKind::Ultimate => ('◉', Color::Rgb { r: 120, g: 255, b: 255 }, Color::Reset),
        SpriteKind::Explosion => ('░', Color::Rgb { r: 255, g: 180, b: 60 }, Color::Reset),
        SpriteKind::Item(item) => match item {
            ItemKind::Health => ('♥', Color::Rgb { r: 255, g: 100, b: 120 }, Color::Reset),
            ItemKind::Energy => ('◆', Color::Rgb { r: 100, g: 220, b: 255 }, Color::Reset),
            ItemKind::Boost => ('▲', Color::Rgb { r: 255, g: 220, b: 80 }, Color::Reset),
            ItemKind::Shield => ('◯', Color::Rgb { r: 150, g: 200, b: 255 }, Color::Reset),
        },
        SpriteKind::Enemy(enemy) => match enemy {
            EnemyKind::Walker => ('ω', Color::Rgb { r: 255, g: 140, b: 80 }, Color::Reset),
            EnemyKind::Flyer => ('v', Color::Rgb { r: 140, g: 180, b: 255 }, Color::Reset),
            EnemyKind::Turret => ('╥', Color::Rgb { r: 200, g: 200, b: 220 }, Color::Reset),
            EnemyKind::Dasher => ('»', Color::Rgb { r: 255, g: 80, b: 80 }, Color::Reset),
            EnemyKind::Elite => ('Ж', Color::Rgb { r: 255, g: 220, b: 80 }, Color::Reset),
            EnemyKind::Heavy => ('■', Color::Rgb { r: 180, g: 120, b: 255 }, Color::Reset),
            EnemyKind::Boss => (
                '█',
                Color::Rgb { r: 255, g: 60, b: 140 },
                Color::Rgb { r: 70, g: 10, b: 40 },
            ),
        },
        // Player and Particle are drawn specially; style unused.
        SpriteKind::Player { .. } | SpriteKind::Particle => (' ', Color::White, Color::Reset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_clamps_and_fills() {
        assert_eq!(meter(0.0, 100.0, 4), "░░░░");
        assert_eq!(meter(50.0, 100.0, 4), "██░░");
        assert_eq!(meter(150.0, 100.0, 4), "████");
        assert_eq!(meter(10.0, 0.0, 2), "░░");
    }
}
