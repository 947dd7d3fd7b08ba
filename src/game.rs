use std::{cmp::{max, min}, thread::sleep, time::{Duration, Instant}};
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::bean::Bean;
use crate::error::GameError;
use crate::panel::Panel;
use crate::snake::{Direction::Up, MoveResult::*, Position, Snake};
use crate::term::Screen;

const BASE_INTERVAL_MS: u64 = 1000;
const MIN_INTERVAL_MS: u64 = 200;
const SPEEDUP_PER_BEAN_MS: u64 = 10;
const WAIT_SLICE_MS: u64 = 10;

pub const MIN_SIDE: u16 = 2;
pub const DEFAULT_LENGTH: u16 = 10;
pub const DEFAULT_HEIGHT: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub length: u16,
    pub height: u16,
    /// Fixed RNG seed, entropy when unset.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { length: DEFAULT_LENGTH, height: DEFAULT_HEIGHT, seed: None }
    }
}

#[derive(Debug)]
pub enum GameState {
    Running,
    Over(GameError),
}

#[derive(Debug)]
pub enum Ending {
    Lost(GameError),
    Won,
    Quit,
}

#[derive(Debug)]
pub struct Summary {
    pub score: u32,
    pub ending: Ending,
}

/// Delay before the next tick. Shrinks with the score down to a floor.
pub fn tick_interval(score: u32) -> Duration {
    let speedup = u64::from(score).saturating_mul(SPEEDUP_PER_BEAN_MS);
    Duration::from_millis(max(MIN_INTERVAL_MS, BASE_INTERVAL_MS.saturating_sub(speedup)))
}

pub struct SnakeGame {
    length: i32,
    height: i32,
    panel: Panel,
    snake: Snake,
    bean: Bean,
    score: u32,
    state: GameState,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        if config.length < MIN_SIDE || config.height < MIN_SIDE {
            return Err(GameError::InvalidSize { length: config.length, height: config.height });
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (length, height) = (i32::from(config.length), i32::from(config.height));
        let start = Position::new(
            rng.gen_range(0..length / 2) + length / 4,
            rng.gen_range(0..height / 2) + height / 4,
        );

        SnakeGame::from_parts(length, height, Snake::new(start, Up), rng)
    }

    fn from_parts(length: i32, height: i32, snake: Snake, mut rng: StdRng) -> Result<Self, GameError> {
        let bean = Bean::place(length, height, snake.occupied(), &mut rng).ok_or(GameError::BoardFull)?;
        let panel = Panel::new(length as usize, height as usize);

        Ok(SnakeGame { length, height, panel, snake, bean, score: 0, state: GameState::Running, rng })
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn bean(&self) -> &Bean {
        &self.bean
    }

    #[cfg(test)]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[cfg(test)]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, GameState::Over(_))
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..self.length).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// One simulation step followed by a redraw. Any failure ends the game.
    pub fn tick<S: Screen>(&mut self, screen: &mut S) {
        if self.is_over() {
            return;
        }

        let res = self.step().and_then(|_| self.render(screen));
        if let Err(e) = res {
            warn!("game over: {}", e);
            self.state = GameState::Over(e);
        }
    }

    pub fn render<S: Screen>(&mut self, screen: &mut S) -> Result<(), GameError> {
        self.panel.rebuild(&self.snake, &self.bean);

        let mut lines = self.panel.lines();
        lines.push(format!("Score: {}", self.score));

        screen.clear()?;
        screen.draw(&lines)?;
        Ok(())
    }

    /// Runs ticks until the game ends or `quit` is raised.
    pub fn play<S: Screen>(mut self, screen: &mut S, quit: &AtomicBool) -> Summary {
        info!("starting a {}x{} game, snake at {:?}", self.length, self.height, self.snake.head());

        if let Err(e) = self.render(screen) {
            warn!("game over: {}", e);
            self.state = GameState::Over(e);
        }

        while !self.is_over() {
            if !wait(tick_interval(self.score), quit) {
                info!("player quit with score {}", self.score);
                return Summary { score: self.score, ending: Ending::Quit };
            }
            self.tick(screen);
        }

        let ending = match self.state {
            GameState::Over(e) if e.is_win() => Ending::Won,
            GameState::Over(e) => Ending::Lost(e),
            GameState::Running => unreachable!("the tick loop only exits once the game is over"),
        };
        info!("game finished with score {}", self.score);

        Summary { score: self.score, ending }
    }

    fn step(&mut self) -> Result<(), GameError> {
        let moved = self.snake.advance();
        let head = self.snake.head().ok_or(GameError::Collision { at: Position::new(0, 0) })?;
        let in_bounds = self.in_bounds(head);

        let vacated = match moved {
            Crashed { at } => return Err(GameError::Collision { at }),
            Moved { vacated, .. } => vacated,
        };
        if !in_bounds {
            return Err(GameError::OutOfBounds { at: head });
        }

        debug!("head moved to {}, tail at {:?}, heading {:?}", head, self.snake.tail(), self.snake.direction());

        if self.bean.is_eaten_by(head) {
            self.snake.grow_up(vacated);
            self.score += 1;
            info!("bean eaten at {}, score {}", head, self.score);

            self.bean = Bean::place(self.length, self.height, self.snake.occupied(), &mut self.rng)
                .ok_or(GameError::BoardFull)?;
        }

        Ok(())
    }
}

/// Sleeps for `interval` in short slices. `false` if `quit` was raised meanwhile.
fn wait(interval: Duration, quit: &AtomicBool) -> bool {
    let deadline = Instant::now() + interval;

    loop {
        if quit.load(Ordering::Acquire) {
            return false;
        }

        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        sleep(min(deadline - now, Duration::from_millis(WAIT_SLICE_MS)));
    }
}
