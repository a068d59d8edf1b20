//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable snapshot of the
//! world.  No game logic is performed; this module only maps arena
//! coordinates onto terminal cells and queues the drawing commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_defender::Position;
use space_defender::Snapshot;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_SOUND: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Red;
const C_BULLET: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Terminal rows reserved above (HUD + top bar) and below (bottom bar + hint).
const TOP_ROWS: u16 = 2;
const BOTTOM_ROWS: u16 = 2;

/// The terminal rectangle the arena is mapped onto.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub cols: u16,
    pub rows: u16,
}

impl Screen {
    pub fn current() -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self { cols, rows })
    }

    fn play_cols(&self) -> i64 {
        i64::from(self.cols.saturating_sub(2)).max(1)
    }

    fn play_rows(&self) -> i64 {
        i64::from(self.rows.saturating_sub(TOP_ROWS + BOTTOM_ROWS)).max(1)
    }

    /// Map an arena position to a cell inside the border, or `None` when it
    /// lies above or below the visible area.
    fn cell(&self, pos: Position, snap: &Snapshot) -> Option<(u16, u16)> {
        if pos.y < 0 || pos.y > snap.height {
            return None;
        }
        let w = i64::from(snap.width.max(1));
        let h = i64::from(snap.height.max(1));
        let col = (i64::from(pos.x.max(0)) * self.play_cols() / w).min(self.play_cols() - 1);
        let row = (i64::from(pos.y) * self.play_rows() / h).min(self.play_rows() - 1);
        Some((1 + col as u16, TOP_ROWS + row as u16))
    }
}

/// HUD flags the host owns.
pub struct Hud {
    pub sound_enabled: bool,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    screen: Screen,
    snap: &Snapshot,
    hud: &Hud,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, screen)?;
    draw_hud(out, screen, snap, hud)?;

    for enemy in &snap.enemies {
        draw_sprite(out, screen, snap, *enemy, "◉", C_ENEMY)?;
    }
    for bullet in &snap.bullets {
        draw_sprite(out, screen, snap, *bullet, "║", C_BULLET)?;
    }
    match snap.player {
        Some(player) => draw_sprite(out, screen, snap, player, "▲", C_PLAYER)?,
        None => draw_no_session(out, screen)?,
    }

    draw_controls_hint(out, screen)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, screen.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, screen: Screen) -> std::io::Result<()> {
    let w = screen.cols as usize;
    let h = screen.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(BOTTOM_ROWS)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in TOP_ROWS..h.saturating_sub(BOTTOM_ROWS) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(screen.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    screen: Screen,
    snap: &Snapshot,
    hud: &Hud,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", snap.score)))?;

    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("   Level: {}", snap.level)))?;

    let sound = if hud.sound_enabled { "Sound: on" } else { "Sound: off" };
    let sx = screen
        .cols
        .saturating_sub(sound.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SOUND))?;
    out.queue(Print(sound))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_sprite<W: Write>(
    out: &mut W,
    screen: Screen,
    snap: &Snapshot,
    pos: Position,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = screen.cell(pos, snap) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_no_session<W: Write>(out: &mut W, screen: Screen) -> std::io::Result<()> {
    let msg = "N - New Game   Q - Quit";
    let col = (screen.cols / 2).saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, screen.rows / 2))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(msg))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, screen: Screen) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, screen.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑↓→ / WASD : Move   SPACE : Shoot   M : Sound   N : New Game   Q : Quit",
    ))?;
    Ok(())
}
