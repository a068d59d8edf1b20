//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus the tuning config and, where needed, an RNG handle) and
//! returns a brand-new `GameState`.  Side effects are limited to the injected RNG.

use log::{debug, trace};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bullet, Enemy, GameEvent, GameState, InputState, PlayerShip};

// ── Constructors ─────────────────────────────────────────────────────────────

/// A world with no session started: no ship, nothing in flight.
pub fn empty_state(config: &GameConfig) -> GameState {
    GameState {
        player: None,
        bullets: Vec::new(),
        enemies: Vec::new(),
        score: 0,
        level: 1,
        ticks: 0,
        enemies_spawned: 0,
        shots_fired: 0,
        width: config.width,
        height: config.height,
    }
}

/// Build the state of a fresh session: ship at centre-bottom, empty skies.
pub fn init_state(config: &GameConfig) -> GameState {
    let (x, y) = config.player_start();
    GameState {
        player: Some(PlayerShip { x, y }),
        ..empty_state(config)
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Move the ship one step along each pressed axis.  A step is only taken
/// when the resulting coordinate stays inside `[0, width] × [0, height]`.
pub fn move_player(state: &GameState, input: &InputState, config: &GameConfig) -> GameState {
    let Some(player) = &state.player else {
        return state.clone();
    };
    let speed = config.player_speed;
    let (mut x, mut y) = (player.x, player.y);

    if input.left && x - speed >= 0 {
        x -= speed;
    }
    if input.right && x + speed <= state.width {
        x += speed;
    }
    if input.up && y - speed >= 0 {
        y -= speed;
    }
    if input.down && y + speed <= state.height {
        y += speed;
    }

    GameState {
        player: Some(PlayerShip { x, y }),
        ..state.clone()
    }
}

/// Fire a bullet from just above the ship.  No ship, no bullet.
pub fn fire(state: &GameState, config: &GameConfig) -> GameState {
    let Some(player) = &state.player else {
        return state.clone();
    };
    let mut bullets = state.bullets.clone();
    bullets.push(Bullet {
        x: player.x,
        y: player.y - config.muzzle_offset,
    });
    GameState {
        bullets,
        shots_fired: state.shots_fired + 1,
        ..state.clone()
    }
}

// ── Motion ───────────────────────────────────────────────────────────────────

/// Move every bullet up and drop the ones that left through the top.
pub fn advance_bullets(state: &GameState, config: &GameConfig) -> GameState {
    let bullets = state
        .bullets
        .iter()
        .map(|b| Bullet {
            y: b.y - config.bullet_speed,
            ..b.clone()
        })
        .filter(|b| b.y >= config.bullet_min_y)
        .collect();
    GameState {
        bullets,
        ..state.clone()
    }
}

/// Move every enemy down and drop the ones that fell past the bottom.
pub fn advance_enemies(state: &GameState, config: &GameConfig) -> GameState {
    let enemies = state
        .enemies
        .iter()
        .map(|e| Enemy {
            y: e.y + config.enemy_speed,
            ..e.clone()
        })
        .filter(|e| e.y <= state.height)
        .collect();
    GameState {
        enemies,
        ..state.clone()
    }
}

// ── Spawner ──────────────────────────────────────────────────────────────────

/// With probability `1 / spawn_one_in`, add one enemy just above the arena
/// at a random column.
pub fn spawn_enemy(state: &GameState, config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let columns = state.width - config.spawn_margin;
    if config.spawn_one_in == 0 || columns <= 0 || rng.gen_range(0..config.spawn_one_in) != 0 {
        return state.clone();
    }
    let x = rng.gen_range(0..columns);
    debug!("spawning enemy at x={}", x);

    let mut enemies = state.enemies.clone();
    enemies.push(Enemy { x, y: config.spawn_y });
    GameState {
        enemies,
        enemies_spawned: state.enemies_spawned + 1,
        ..state.clone()
    }
}

// ── Collisions & progression ─────────────────────────────────────────────────

fn is_hit(bullet: &Bullet, enemy: &Enemy, threshold: i32) -> bool {
    (bullet.x - enemy.x).abs() < threshold && (bullet.y - enemy.y).abs() < threshold
}

/// Number of `step` multiples passed when the score moves from `before` to `after`.
pub fn levels_gained(before: u32, after: u32, step: u32) -> u32 {
    if step == 0 || after <= before {
        return 0;
    }
    after / step - before / step
}

/// Pair bullets with enemies.  Each bullet, in list order, takes the first
/// still-alive enemy within the hit box; both are removed afterwards.
/// Every kill awards points and may raise the level.
pub fn resolve_collisions(state: &GameState, config: &GameConfig) -> (GameState, Vec<GameEvent>) {
    let mut killed_enemies: Vec<usize> = Vec::new();
    let mut used_bullets: Vec<usize> = Vec::new();
    let mut events = Vec::new();
    let mut score = state.score;
    let mut level = state.level;

    for (bi, bullet) in state.bullets.iter().enumerate() {
        let hit = state
            .enemies
            .iter()
            .enumerate()
            .find(|(ei, enemy)| {
                !killed_enemies.contains(ei) && is_hit(bullet, enemy, config.hit_threshold)
            })
            .map(|(ei, _)| ei);

        let Some(ei) = hit else {
            continue;
        };
        killed_enemies.push(ei);
        used_bullets.push(bi);

        let enemy = &state.enemies[ei];
        debug!("bullet {} destroyed enemy at ({}, {})", bi, enemy.x, enemy.y);
        events.push(GameEvent::EnemyDestroyed {
            at: enemy.position(),
        });

        let before = score;
        score = score.saturating_add(config.score_per_enemy);
        for _ in 0..levels_gained(before, score, config.level_step) {
            level += 1;
            events.push(GameEvent::LevelUp { new_level: level });
        }
    }

    if used_bullets.is_empty() {
        return (state.clone(), events);
    }

    let bullets = state
        .bullets
        .iter()
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b.clone())
        .collect();
    let enemies = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(i, _)| !killed_enemies.contains(i))
        .map(|(_, e)| e.clone())
        .collect();

    let next = GameState {
        bullets,
        enemies,
        score,
        level,
        ..state.clone()
    };
    (next, events)
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one tick.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
pub fn tick(
    state: &GameState,
    input: &InputState,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> (GameState, Vec<GameEvent>) {
    // ── 1. Steer the ship ────────────────────────────────────────────────────
    let state = move_player(state, input, config);

    // ── 2. Bullets fly up, leave through the top ─────────────────────────────
    let state = advance_bullets(&state, config);

    // ── 3. Maybe a new enemy ─────────────────────────────────────────────────
    let state = spawn_enemy(&state, config, rng);

    // ── 4. Enemies fall, leave through the bottom ────────────────────────────
    let state = advance_enemies(&state, config);

    // ── 5. Bullets ↔ enemies ─────────────────────────────────────────────────
    let (state, events) = resolve_collisions(&state, config);

    trace!(
        "tick {}: {} bullets, {} enemies, score {}",
        state.ticks + 1,
        state.bullets.len(),
        state.enemies.len(),
        state.score
    );

    let next = GameState {
        ticks: state.ticks + 1,
        ..state
    };
    (next, events)
}
