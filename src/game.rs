use std::{io, thread::sleep, time::{Duration, Instant, SystemTime, UNIX_EPOCH}};

use crate::TermInt;
use crate::field::FieldError;
use crate::term::TermManager;
use crate::snake::{GameState, Direction::{*, self}, StepOutcome::*};

use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use rand::{rngs::StdRng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

// Pause between input polls, independent of the game speed
const LOOP_DELAY: Duration = Duration::from_millis(5);

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Field(#[from] FieldError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Turn(Direction),
    Pause,
    Quit,
}

pub struct SnakeGame {
    term: TermManager,
    state: GameState,
    rng: StdRng,
}

impl SnakeGame {
    /// Takes over the terminal and lays out a new game inside the border.
    pub fn new(difficulty: u8) -> Result<Self, GameError> {
        let mut term = TermManager::new()?;
        term.setup()?;

        let (w, h) = term.get_terminal_size();
        let (width, height) = ((w as usize).saturating_sub(2), (h as usize).saturating_sub(2));
        let state = GameState::new(width, height, difficulty, Instant::now())?;

        info!(
            width,
            height,
            difficulty,
            interval_ms = state.tick_interval().as_millis() as u64,
            "starting game"
        );

        term.draw_borders()?;

        Ok(SnakeGame { term, state, rng: StdRng::seed_from_u64(time_seed()) })
    }

    /// Plays until the player quits or the game ends, then hands the terminal
    /// back and returns the score.
    pub fn run(mut self) -> Result<i64, GameError> {
        self.draw_field()?;

        loop {
            match self.term.poll_key()?.as_ref().and_then(action) {
                Some(Action::Quit) => {
                    info!(score = self.state.score(), "player quit");
                    break;
                },
                Some(Action::Turn(dir)) => self.state.set_direction(dir),
                Some(Action::Pause) => {
                    if self.pause()? {
                        break;
                    }
                    continue;
                },
                None => {}
            }

            if self.state.is_due(Instant::now()) {
                let len = self.state.snake_len();

                match self.state.step(&mut self.rng)? {
                    Continue => {
                        if self.state.snake_len() > len {
                            debug!(len = self.state.snake_len(), food = self.state.food(), "food eaten");
                        }
                        self.draw_field()?;
                    },
                    GameOver(crash) => {
                        info!(?crash, score = self.state.score(), "game over");
                        self.draw_dead_snake()?;
                        self.show_final_score("GAME OVER")?;
                        break;
                    },
                    Won => {
                        info!(score = self.state.score(), "field filled");
                        self.draw_field()?;
                        self.show_final_score("YOU WON!")?;
                        break;
                    },
                }
            }

            sleep(LOOP_DELAY);
        }

        let score = self.state.score();
        self.term.restore()?;
        Ok(score)
    }

    ///////////////////////////////////////////////////////////////////////////

    // Returns true if the player quit while paused
    fn pause(&mut self) -> Result<bool, GameError> {
        self.term.show_message(&["GAME PAUSED"])?;
        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;

        Ok(is_ctrl_c(&key))
    }

    fn show_final_score(&mut self, title: &str) -> Result<(), GameError> {
        let score = format!("Score: {}", self.state.score());
        self.term.show_message(&[title, &score])?;
        self.term.read_key_blocking()?;
        Ok(())
    }

    fn draw_field(&mut self) -> Result<(), GameError> {
        let field = self.state.field();
        let width = field.width();
        let (head, food) = (self.state.head(), self.state.food());

        for (p, &cell) in field.cells().iter().enumerate() {
            let ch = if p == head {
                self.state.head_char()
            } else if cell > 0 {
                SNAKE_BODY_CHAR
            } else if p == food {
                APPLE_CHAR
            } else {
                ' '
            };
            self.term.print_at(screen_pos(p, width), ch)?;
        }

        self.term.flush()?;
        Ok(())
    }

    fn draw_dead_snake(&mut self) -> Result<(), GameError> {
        let width = self.state.field().width();

        for (p, &cell) in self.state.field().cells().iter().enumerate() {
            if cell > 0 {
                self.term.print_at(screen_pos(p, width), DEAD_SNAKE_CHAR)?;
            }
        }

        self.term.flush()?;
        Ok(())
    }
}

/// Maps a key press to a game action. Directions are latched as-is, even
/// straight back into the body.
pub fn action(key: &KeyEvent) -> Option<Action> {
    if is_ctrl_c(key) {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Action::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Action::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Action::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Action::Turn(Right)),
        KeyCode::Char(' ') => Some(Action::Pause),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

// Field cell to terminal cell, skipping the border
fn screen_pos(p: usize, width: usize) -> (TermInt, TermInt) {
    ((p % width + 1) as TermInt, (p / width + 1) as TermInt)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(action(&key(KeyCode::Up)), Some(Action::Turn(Up)));
        assert_eq!(action(&key(KeyCode::Char('w'))), Some(Action::Turn(Up)));
        assert_eq!(action(&key(KeyCode::Char('a'))), Some(Action::Turn(Left)));
        assert_eq!(action(&key(KeyCode::Down)), Some(Action::Turn(Down)));
        assert_eq!(action(&key(KeyCode::Char('d'))), Some(Action::Turn(Right)));
    }

    #[test]
    fn control_keys() {
        assert_eq!(action(&key(KeyCode::Char(' '))), Some(Action::Pause));
        assert_eq!(action(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Action::Quit));
        assert_eq!(action(&key(KeyCode::Char('c'))), None);
        assert_eq!(action(&key(KeyCode::Esc)), None);
    }

    #[test]
    fn field_cells_sit_inside_the_border() {
        assert_eq!(screen_pos(0, 10), (1, 1));
        assert_eq!(screen_pos(9, 10), (10, 1));
        assert_eq!(screen_pos(10, 10), (1, 2));
    }
}
