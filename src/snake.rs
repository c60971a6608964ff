use std::cmp::min;
use std::time::{Duration, Instant};

use crate::field::{Cell, Field, FieldError};
use crate::tick::{tick_interval, Ticker};

use rand::Rng;
use Direction::*;
use StepOutcome::*;

const MAX_INITIAL_SNAKE_LENGTH: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    Body,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    GameOver(Crash),
    /// The snake ate the last free cell, so no food can be placed.
    Won,
}

/// Snake, food and timing for one game.
///
/// The body is not stored as a list: it is implied by the decaying values in
/// the field, and `snake_head_pos` is the only position tracked directly.
#[derive(Clone, Debug)]
pub struct GameState {
    field: Field,
    snake_len: Cell,
    initial_snake_len: Cell,
    snake_head_pos: usize,
    food_pos: usize,
    direction: Direction,
    ticker: Ticker,
}

impl GameState {
    /// Starts a game with a straight snake heading left through the middle of
    /// the field.
    pub fn new(width: usize, height: usize, difficulty: u8, now: Instant) -> Result<Self, FieldError> {
        let len = min(MAX_INITIAL_SNAKE_LENGTH, width);
        let head = height / 2 * width + (width / 2 - len / 2);

        Self::with_snake(width, height, head, len as Cell, Left, tick_interval(difficulty), now)
    }

    /// Starts a game with a straight snake of `len` cells whose head sits at
    /// `head` and whose body trails behind `heading`. Food goes to the cell
    /// before the head, or to the first free cell if that one is taken.
    pub fn with_snake(
        width: usize,
        height: usize,
        head: usize,
        len: Cell,
        heading: Direction,
        interval: Duration,
        now: Instant,
    ) -> Result<Self, FieldError> {
        let mut field = Field::create(width, height)?;
        field.seed_snake(head, len, heading)?;

        let before_head = head.saturating_sub(1);
        let food = if field.is_empty(before_head) { before_head } else { field.find_nth_empty(0)? };

        let mut state = GameState {
            field,
            snake_len: len,
            initial_snake_len: len,
            snake_head_pos: head,
            food_pos: food,
            direction: heading,
            ticker: Ticker::new(interval, now),
        };
        state.place_food(food)?;

        Ok(state)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn snake_len(&self) -> Cell {
        self.snake_len
    }

    pub fn head(&self) -> usize {
        self.snake_head_pos
    }

    pub fn food(&self) -> usize {
        self.food_pos
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn tick_interval(&self) -> Duration {
        self.ticker.interval()
    }

    pub fn score(&self) -> i64 {
        self.snake_len as i64 - self.initial_snake_len as i64 - 1
    }

    /// Latches the direction for the next step. Reversing into the body is
    /// allowed and ends the game on that step.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn place_food(&mut self, pos: usize) -> Result<(), FieldError> {
        if pos >= self.field.len() {
            return Err(FieldError::OutOfRange(pos));
        }
        if !self.field.is_empty(pos) {
            return Err(FieldError::Occupied(pos));
        }

        self.food_pos = pos;
        Ok(())
    }

    pub fn is_due(&mut self, now: Instant) -> bool {
        self.ticker.is_due(now)
    }

    /// Advances the snake one cell in the latched direction. A crash leaves
    /// the state untouched.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StepOutcome, FieldError> {
        let next = match self.field.neighbor(self.snake_head_pos, self.direction) {
            Some(pos) => pos,
            None => return Ok(GameOver(Crash::Wall)),
        };

        if !self.field.is_empty(next) {
            return Ok(GameOver(Crash::Body));
        }

        let ate = next == self.food_pos;
        if ate {
            self.snake_len += 1;
        } else {
            // `next` is empty, so this only shortens the old body and the
            // head below keeps the full length
            self.field.decay();
        }

        // Written before the free-cell scan so the head is never picked for food
        self.snake_head_pos = next;
        self.field.occupy(next, self.snake_len)?;

        if ate {
            let free = self.field.len().saturating_sub(self.snake_len as usize);
            let r = if free == 0 { 0 } else { rng.gen_range(0..free) };

            match self.field.find_nth_empty(r) {
                Ok(pos) => self.food_pos = pos,
                Err(FieldError::NoEmptyCell) => return Ok(Won),
                Err(e) => return Err(e),
            }
        }

        Ok(Continue)
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn state(width: usize, height: usize, head: usize, len: Cell, heading: Direction) -> GameState {
        GameState::with_snake(width, height, head, len, heading, Duration::from_millis(100), Instant::now())
            .unwrap()
    }

    #[test]
    fn new_game_layout() {
        let game = GameState::new(20, 10, 5, Instant::now()).unwrap();

        assert_eq!(game.snake_len(), 10);
        assert_eq!(game.head(), 105);
        assert_eq!(game.field().get(105), 10);
        assert_eq!(game.field().get(114), 1);
        assert_eq!(game.field().occupied_count(), 10);
        assert_eq!(game.food(), 104);
        assert_eq!(game.direction(), Left);
        assert_eq!(game.tick_interval(), Duration::from_millis(120));
        assert_eq!(game.score(), -1);
    }

    #[test]
    fn narrow_field_shortens_snake() {
        let game = GameState::new(3, 3, 0, Instant::now()).unwrap();
        assert_eq!(game.snake_len(), 3);
        assert_eq!(game.head(), 3);
        assert_eq!(game.field().cells(), &[0, 0, 0, 3, 2, 1, 0, 0, 0]);
        assert_eq!(game.food(), 2);
    }

    #[test]
    fn step_moves_body_along() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = state(5, 5, 12, 3, Right);
        assert_eq!(&game.field().cells()[10..13], &[1, 2, 3]);
        assert_eq!(game.food(), 0);

        assert_eq!(game.step(&mut rng), Ok(Continue));
        assert_eq!(game.head(), 13);
        assert_eq!(&game.field().cells()[10..14], &[0, 1, 2, 3]);
        assert_eq!(game.field().occupied_count(), 3);
        assert_eq!(game.snake_len(), 3);
    }

    #[test]
    fn walls_end_the_game() {
        let mut rng = StdRng::seed_from_u64(2);
        let cases = [(2, Up, Down), (22, Down, Up), (10, Left, Right), (14, Right, Left)];

        for (head, dir, heading) in cases {
            let mut game = state(5, 5, head, 1, heading);
            game.set_direction(dir);
            let before = game.field().clone();

            assert_eq!(game.step(&mut rng), Ok(GameOver(Crash::Wall)), "{:?} from {}", dir, head);
            assert_eq!(game.head(), head);
            assert_eq!(game.field(), &before);
        }
    }

    #[test]
    fn reversing_into_body_ends_the_game() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = state(5, 5, 12, 3, Right);
        game.set_direction(Left);
        let before = game.field().clone();

        assert_eq!(game.step(&mut rng), Ok(GameOver(Crash::Body)));
        assert_eq!(game.head(), 12);
        assert_eq!(game.snake_len(), 3);
        assert_eq!(game.field(), &before);
    }

    #[test]
    fn eating_grows_and_moves_food() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = state(5, 5, 12, 3, Right);
        game.place_food(13).unwrap();

        assert_eq!(game.step(&mut rng), Ok(Continue));
        assert_eq!(game.snake_len(), 4);
        assert_eq!(&game.field().cells()[10..14], &[1, 2, 3, 4]);
        assert_eq!(game.field().occupied_count(), 4);
        assert_ne!(game.food(), game.head());
        assert!(game.field().is_empty(game.food()));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn single_free_cell_gets_the_food() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = state(3, 1, 0, 1, Right);
        assert_eq!(game.food(), 1);

        assert_eq!(game.step(&mut rng), Ok(Continue));
        assert_eq!(game.food(), 2);
    }

    #[test]
    fn eating_the_last_cell_wins() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut game = state(2, 1, 0, 1, Right);
        assert_eq!(game.food(), 1);

        assert_eq!(game.step(&mut rng), Ok(Won));
        assert_eq!(game.snake_len(), 2);
        assert_eq!(game.field().occupied_count(), 2);
    }

    #[test]
    fn food_must_land_on_a_free_cell() {
        let mut game = state(5, 5, 12, 3, Right);
        assert_eq!(game.place_food(11), Err(FieldError::Occupied(11)));
        assert_eq!(game.place_food(25), Err(FieldError::OutOfRange(25)));
        assert_eq!(game.food(), 0);
    }
}
