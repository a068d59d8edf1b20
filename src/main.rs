mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::Print,
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_defender::{Direction, GameConfig, GameEvent, GameLoop};

use display::{Hud, Screen};

#[derive(Parser)]
#[command(name = "space_defender")]
#[command(about = "Defend the arena from descending enemies")]
struct Args {
    /// JSON file with gameplay tuning; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Arena width in world units
    #[arg(long)]
    width: Option<i32>,

    /// Arena height in world units
    #[arg(long)]
    height: Option<i32>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for the enemy spawner (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with sound cues off
    #[arg(long)]
    mute: bool,

    /// Run without a terminal and print the final snapshot as JSON
    #[arg(long)]
    headless: bool,

    /// Ticks to simulate in headless mode
    #[arg(long, default_value_t = 1000)]
    ticks: u64,
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

const DIRECTION_KEYS: &[(Direction, &[KeyCode])] = &[
    (
        Direction::Left,
        &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
    ),
    (
        Direction::Right,
        &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
    ),
    (
        Direction::Up,
        &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
    ),
    (
        Direction::Down,
        &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
    ),
];

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn build_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(tick_ms) = args.tick_ms {
        config.tick_ms = tick_ms;
    }
    config.validate().context("checking command-line overrides")?;
    Ok(config)
}

fn init_logging(path: &Option<PathBuf>) -> Result<()> {
    // Logging to stderr would scribble over the alternate screen, so logs
    // only go anywhere when a file is given.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Headless run ──────────────────────────────────────────────────────────────

fn run_headless(game: &mut GameLoop<StdRng>, ticks: u64) -> Result<()> {
    game.new_game();
    let mut snapshot = game.snapshot();
    for _ in 0..ticks {
        let (next, _) = game.tick();
        snapshot = next;
    }
    let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
    println!("{}", json);
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Translate a frame's events into audio cues (the terminal bell).
fn play_cues<W: Write>(out: &mut W, events: &[GameEvent]) -> std::io::Result<()> {
    for event in events {
        let bells = match event {
            GameEvent::EnemyDestroyed { .. } => "\x07",
            GameEvent::LevelUp { .. } => "\x07\x07",
        };
        out.queue(Print(bells))?;
    }
    Ok(())
}

/// Drive the host until the player quits.  The arena starts empty; the
/// first `N` press places the ship.
///
/// Input model: the terminal delivers presses (and, on keyboard-enhancement
/// capable terminals, releases).  A `key_frame` map records the frame each
/// key was last seen; every frame the four directions are resampled and any
/// change is forwarded to the core as a press or release edge.  On classic
/// terminals a key "releases" once it has been silent for `HOLD_WINDOW`
/// frames.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut GameLoop<StdRng>,
    rx: &mpsc::Receiver<Event>,
    mut sound_enabled: bool,
) -> std::io::Result<()> {
    let interval = game.config().tick_interval();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(' ') => game.fire(),
                        KeyCode::Char('n') | KeyCode::Char('N') => {
                            if game.is_session_started() {
                                info!("restarting session");
                            }
                            // Keys held across a restart should not steer the new ship.
                            key_frame.clear();
                            game.release_all();
                            game.new_game();
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') => {
                            sound_enabled = !sound_enabled;
                            info!("sound {}", if sound_enabled { "on" } else { "off" });
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                    if code == KeyCode::Char(' ') {
                        game.fire();
                    }
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Turn held keys into direction edges ───────────────────────────────
        for (dir, keys) in DIRECTION_KEYS {
            let held = keys.iter().any(|k| is_held(&key_frame, k, frame));
            if held != game.input().is_pressed(*dir) {
                game.set_direction(*dir, held);
            }
        }

        let (snapshot, events) = game.tick();

        if sound_enabled {
            play_cues(out, &events)?;
        }
        let screen = Screen::current()?;
        display::render(out, screen, &snapshot, &Hud { sound_enabled })?;

        let elapsed = frame_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = build_config(&args)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        "starting: arena {}x{}, tick {} ms, seed {:?}",
        config.width, config.height, config.tick_ms, args.seed
    );
    let mut game = GameLoop::new(config, rng).context("building game loop")?;

    if args.headless {
        return run_headless(&mut game, args.ticks);
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                warn!("input reader stopped: {}", e);
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut game, &rx, !args.mute);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    let snapshot = game.snapshot();
    info!(
        "session over: score {}, level {}, {} ticks",
        snapshot.score, snapshot.level, snapshot.ticks
    );
    result.context("running game loop")
}

#[cfg(test)]
mod tests {
    use super::*;
    use space_defender::Position;

    #[test]
    fn cues_ring_once_per_kill_and_twice_per_level() {
        let events = [
            GameEvent::EnemyDestroyed {
                at: Position { x: 10, y: 20 },
            },
            GameEvent::LevelUp { new_level: 2 },
        ];
        let mut out: Vec<u8> = Vec::new();
        play_cues(&mut out, &events).unwrap();
        assert_eq!(out, b"\x07\x07\x07");
    }

    #[test]
    fn no_events_no_cues() {
        let mut out: Vec<u8> = Vec::new();
        play_cues(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn cli_overrides_are_applied() {
        let args = Args::parse_from(["space_defender", "--width", "1024", "--tick-ms", "16"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.width, 1024);
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.height, 600);
    }

    #[test]
    fn cli_overrides_are_validated() {
        let args = Args::parse_from(["space_defender", "--width", "20"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn held_key_expires_after_hold_window() {
        let mut key_frame = HashMap::new();
        key_frame.insert(KeyCode::Left, 10);
        assert!(is_held(&key_frame, &KeyCode::Left, 10));
        assert!(is_held(&key_frame, &KeyCode::Left, 10 + HOLD_WINDOW));
        assert!(!is_held(&key_frame, &KeyCode::Left, 10 + HOLD_WINDOW + 1));
        assert!(!is_held(&key_frame, &KeyCode::Right, 10));
    }

    #[test]
    fn every_direction_has_keys() {
        for dir in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            let keys = DIRECTION_KEYS.iter().find(|(d, _)| *d == dir).map(|(_, k)| *k);
            assert!(keys.is_some_and(|k| !k.is_empty()));
        }
    }
}
