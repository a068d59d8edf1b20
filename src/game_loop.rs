//! Session owner.
//!
//! `GameLoop` holds the only copy of the mutable world.  Hosts feed it key
//! edges and fire requests between ticks, call [`GameLoop::tick`] from their
//! fixed-interval clock and draw from the returned [`Snapshot`].

use log::info;
use rand::Rng;

use crate::compute;
use crate::config::{ConfigError, GameConfig};
use crate::entities::{Direction, GameEvent, GameState, InputState, Snapshot};

pub struct GameLoop<R: Rng> {
    config: GameConfig,
    state: GameState,
    input: InputState,
    rng: R,
}

impl<R: Rng> GameLoop<R> {
    /// A loop with no session started yet.  Call [`GameLoop::new_game`] to
    /// place the ship.  Fails if `config` does not validate.
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = compute::empty_state(&config);
        Ok(Self {
            config,
            state,
            input: InputState::default(),
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_session_started(&self) -> bool {
        self.state.player.is_some()
    }

    /// Record a press or release edge for one direction.
    pub fn set_direction(&mut self, dir: Direction, pressed: bool) {
        self.input.set(dir, pressed);
    }

    /// Drop every held direction, as if all keys were released.
    pub fn release_all(&mut self) {
        self.input.clear();
    }

    /// Queue a bullet at the ship's muzzle.  Ignored before the first new game.
    pub fn fire(&mut self) {
        self.state = compute::fire(&self.state, &self.config);
    }

    /// Reset score, level, ship and both entity lists.
    pub fn new_game(&mut self) {
        self.state = compute::init_state(&self.config);
        info!(
            "new game: arena {}x{}, ship at ({}, {})",
            self.config.width,
            self.config.height,
            self.config.player_start().0,
            self.config.player_start().1
        );
    }

    /// Run one simulation step and publish the resulting world.
    pub fn tick(&mut self) -> (Snapshot, Vec<GameEvent>) {
        let (next, events) = compute::tick(&self.state, &self.input, &self.config, &mut self.rng);
        self.state = next;

        for event in &events {
            if let GameEvent::LevelUp { new_level } = event {
                info!("level up: {} (score {})", new_level, self.state.score);
            }
        }

        (self.snapshot(), events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }
}
