//! All game entity types — pure data, no logic.

use serde::Serialize;

/// A point in arena space (origin top-left, Y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Directional intents, written by key edges and sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    pub fn set(&mut self, dir: Direction, pressed: bool) {
        match dir {
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
            Direction::Up => self.up = pressed,
            Direction::Down => self.down = pressed,
        }
    }

    pub fn is_pressed(&self, dir: Direction) -> bool {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn clear(&mut self) {
        *self = InputState::default();
    }
}

// ── Feedback events ───────────────────────────────────────────────────────────

/// Discrete happenings a host may map to sound or other feedback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// A bullet destroyed the enemy that stood at `at`.
    EnemyDestroyed { at: Position },
    /// The level counter moved up to `new_level`.
    LevelUp { new_level: u32 },
}

// ── Player, projectiles & enemies ─────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerShip {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
}

impl PlayerShip {
    pub fn position(&self) -> Position {
        Position { x: self.x, y: self.y }
    }
}

impl Bullet {
    pub fn position(&self) -> Position {
        Position { x: self.x, y: self.y }
    }
}

impl Enemy {
    pub fn position(&self) -> Position {
        Position { x: self.x, y: self.y }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// `None` until a session has been started with a new game.
    pub player: Option<PlayerShip>,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub score: u32,
    pub level: u32,
    /// Ticks simulated since the last new game.
    pub ticks: u64,
    pub enemies_spawned: u64,
    pub shots_fired: u64,
    pub width: i32,
    pub height: i32,
}

/// Read-only view of the world published after each tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub player: Option<Position>,
    pub bullets: Vec<Position>,
    pub enemies: Vec<Position>,
    pub score: u32,
    pub level: u32,
    pub ticks: u64,
    pub enemies_spawned: u64,
    pub shots_fired: u64,
    pub width: i32,
    pub height: i32,
}

impl From<&GameState> for Snapshot {
    fn from(state: &GameState) -> Self {
        Snapshot {
            player: state.player.as_ref().map(PlayerShip::position),
            bullets: state.bullets.iter().map(Bullet::position).collect(),
            enemies: state.enemies.iter().map(Enemy::position).collect(),
            score: state.score,
            level: state.level,
            ticks: state.ticks,
            enemies_spawned: state.enemies_spawned,
            shots_fired: state.shots_fired,
            width: state.width,
            height: state.height,
        }
    }
}
