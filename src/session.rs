use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::eggs::{self, Egg};
use crate::equation::Equation;
use crate::snake::{Collision, Direction, Snake};

pub const GRID_WIDTH: i32 = 30;
pub const GRID_HEIGHT: i32 = 20;

pub const STARTING_LIVES: i32 = 2;
pub const BASE_SPEED: u64 = 8; // drive ticks between movement steps
pub const SPEED_FLOOR: u64 = 4;
pub const PENALTY_SLOWDOWN: u64 = 4;
pub const PENALTY_DURATION: u32 = 120; // movement steps
pub const SOLVES_PER_LEVEL: u32 = 3;

const TIME_SLICE: f32 = 1.0 / 60.0;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    TargetCollected,
    DecoyCollected,
    GameOver,
}

// The whole game lives in this one value; the terminal shell only reads it
// and feeds it steering/pause intents.
pub struct Session {
    rng: StdRng,
    pub snake: Snake,
    pub heading: Option<Direction>,
    pub equation: Equation,
    pub eggs: Vec<Egg>,
    pub collected: Vec<i32>,
    pub score: u32,
    pub level: u32,
    pub lives: i32,
    pub base_speed: u64,
    pub current_speed: u64,
    pub penalty: bool,
    pub penalty_ticks: u32,
    pub time_limit: f32,
    pub time_remaining: f32,
    pub paused: bool,
    pub game_over: bool,
    pub game_over_reason: &'static str,
}

impl Session {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let equation = Equation::generate(0, &mut rng);
        let snake = Snake::new((GRID_WIDTH / 2, GRID_HEIGHT / 2));
        let eggs = eggs::spawn_eggs(
            &equation.operands,
            0,
            snake.body(),
            GRID_WIDTH,
            GRID_HEIGHT,
            &mut rng,
        );
        let time_limit = Self::time_limit_for_level(0);

        Session {
            rng,
            snake,
            heading: None,
            equation,
            eggs,
            collected: vec![],
            score: 0,
            level: 0,
            lives: STARTING_LIVES,
            base_speed: BASE_SPEED,
            current_speed: BASE_SPEED,
            penalty: false,
            penalty_ticks: 0,
            time_limit,
            time_remaining: time_limit,
            paused: false,
            game_over: false,
            game_over_reason: "",
        }
    }

    pub fn reset(&mut self) {
        *self = Self::with_seed(self.rng.gen());
    }

    pub fn time_limit_for_level(level: u32) -> f32 {
        (45 - 3 * level as i32).max(20) as f32
    }

    pub fn display_speed(&self) -> u64 {
        11 - self.base_speed
    }

    // Operand occurrences that still lack a pickup; duplicates are consumed
    // one at a time.
    pub fn remaining_needed(&self) -> Vec<i32> {
        let mut needed = self.equation.operands.clone();
        for value in &self.collected {
            if let Some(i) = needed.iter().position(|n| n == value) {
                needed.remove(i);
            }
        }
        needed
    }

    pub fn steer(&mut self, direction: Direction) {
        if self.paused || self.game_over {
            return;
        }
        // a straight reversal would be an instant self-collision
        if self.heading != Some(direction.opposite()) {
            self.heading = Some(direction);
        }
    }

    pub fn toggle_pause(&mut self) {
        if !self.game_over {
            self.paused = !self.paused;
        }
    }

    // One movement step. The drive loop calls this every Nth drive tick,
    // N = current_speed, so an active penalty also slows the countdown.
    pub fn update(&mut self) -> Vec<GameEvent> {
        let mut events = vec![];

        if self.game_over || self.paused {
            return events;
        }
        let direction = match self.heading {
            Some(d) => d,
            None => return events, // idle until the first steer
        };

        self.time_remaining -= TIME_SLICE;
        if self.time_remaining <= 0.0 {
            events.push(self.end_game("Time's up!"));
            return events;
        }

        if self.penalty {
            self.penalty_ticks -= 1;
            if self.penalty_ticks == 0 {
                self.penalty = false;
                self.current_speed = self.base_speed;
            }
        }

        let new_head = match self.snake.probe(direction, GRID_WIDTH, GRID_HEIGHT) {
            Ok(pos) => pos,
            Err(Collision::Wall) => {
                events.push(self.end_game("Hit the wall!"));
                return events;
            }
            Err(Collision::Body) => {
                events.push(self.end_game("Hit yourself!"));
                return events;
            }
        };

        let eaten = self
            .eggs
            .iter()
            .position(|e| e.pos == new_head && !e.collected);

        match eaten {
            Some(i) if self.eggs[i].is_target => {
                self.snake.advance(new_head, true);
                self.eggs[i].collected = true;
                self.collected.push(self.eggs[i].value);
                events.push(GameEvent::TargetCollected);

                if self.collected.len() == self.equation.operands.len() {
                    self.solve_equation();
                }
            }
            Some(i) => {
                self.snake.advance(new_head, false);
                self.eggs[i].collected = true;
                self.lives -= 1;
                events.push(GameEvent::DecoyCollected);

                if self.lives <= 0 {
                    events.push(self.end_game("No lives left!"));
                    return events;
                }

                self.penalty = true;
                self.penalty_ticks = PENALTY_DURATION;
                self.current_speed = self.base_speed + PENALTY_SLOWDOWN;
            }
            None => self.snake.advance(new_head, false),
        }

        events
    }

    ///////////////////////////////////////////////////////////////////////////

    fn solve_equation(&mut self) {
        self.score += 1;

        if self.score % SOLVES_PER_LEVEL == 0 {
            self.level += 1;
            self.time_limit = Self::time_limit_for_level(self.level);
            self.time_remaining = self.time_limit;
            self.base_speed = (self.base_speed - 1).max(SPEED_FLOOR);
        }

        self.equation = Equation::generate(self.level, &mut self.rng);
        self.eggs = eggs::spawn_eggs(
            &self.equation.operands,
            self.level,
            self.snake.body(),
            GRID_WIDTH,
            GRID_HEIGHT,
            &mut self.rng,
        );
        self.collected.clear();

        // a pending slowdown doesn't outlive the equation that caused it
        self.penalty = false;
        self.penalty_ticks = 0;
        self.current_speed = self.base_speed;
    }

    fn end_game(&mut self, reason: &'static str) -> GameEvent {
        self.game_over = true;
        self.game_over_reason = reason;
        self.heading = None;
        GameEvent::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::Op;
    use crate::GridPos;

    fn egg(pos: GridPos, value: i32, is_target: bool) -> Egg {
        Egg { pos, value, is_target, collected: false }
    }

    // A session with a known board: single-cell snake at (5,5) heading right,
    // solving "3 + 4 = ?", eggs laid out by each test.
    fn fixed_session() -> Session {
        let mut s = Session::with_seed(42);
        s.snake = Snake::new((5, 5));
        s.heading = Some(Direction::Right);
        s.equation = Equation {
            text: "3 + 4 = ?".into(),
            answer: 7,
            operands: vec![3, 4],
            operators: vec![Op::Add],
        };
        s.collected.clear();
        s.eggs = vec![egg((6, 5), 3, true), egg((7, 5), 4, true)];
        s
    }

    #[test]
    fn collecting_every_operand_solves_the_equation() {
        let mut s = fixed_session();

        let ev = s.update(); // eats the 3
        assert_eq!(ev, vec![GameEvent::TargetCollected]);
        assert_eq!(s.collected, vec![3]);
        assert_eq!(s.score, 0);
        assert_eq!(s.snake.len(), 2);

        let ev = s.update(); // eats the 4, equation solved
        assert_eq!(ev, vec![GameEvent::TargetCollected]);
        assert_eq!(s.score, 1);
        assert_eq!(s.level, 0); // one solve is not a level-up
        assert!(s.collected.is_empty());

        // a fresh equation with its own eggs replaced the old field
        let targets = s.eggs.iter().filter(|e| e.is_target).count();
        assert_eq!(targets, s.equation.operands.len());
        assert!(s.eggs.iter().all(|e| !e.collected));
        assert!(s.eggs.iter().all(|e| !s.snake.contains(e.pos)));
    }

    #[test]
    fn every_third_solve_levels_up() {
        let mut s = fixed_session();
        s.score = 2;
        let base = s.base_speed;

        s.update();
        s.update();

        assert_eq!(s.score, 3);
        assert_eq!(s.level, 1);
        assert_eq!(s.time_limit, 42.0);
        assert_eq!(s.time_remaining, 42.0);
        assert_eq!(s.base_speed, base - 1);
        assert_eq!(s.current_speed, s.base_speed);
    }

    #[test]
    fn the_base_speed_never_drops_below_the_floor() {
        let mut s = fixed_session();
        s.base_speed = SPEED_FLOOR;
        s.current_speed = SPEED_FLOOR;
        s.score = 2;

        s.update();
        s.update();

        assert_eq!(s.base_speed, SPEED_FLOOR);
    }

    #[test]
    fn decoys_cost_a_life_then_the_game() {
        let mut s = fixed_session();
        s.eggs = vec![egg((6, 5), 9, false), egg((7, 5), 11, false)];

        let ev = s.update();
        assert_eq!(ev, vec![GameEvent::DecoyCollected]);
        assert_eq!(s.lives, 1);
        assert!(s.penalty);
        assert_eq!(s.current_speed, s.base_speed + PENALTY_SLOWDOWN);
        assert_eq!(s.snake.len(), 1); // no growth on a decoy
        assert!(s.eggs[0].collected); // the decoy left the field

        let ev = s.update();
        assert_eq!(ev, vec![GameEvent::DecoyCollected, GameEvent::GameOver]);
        assert!(s.game_over);
        assert_eq!(s.game_over_reason, "No lives left!");
    }

    #[test]
    fn the_penalty_expires_and_restores_speed() {
        let mut s = fixed_session();
        s.eggs = vec![egg((6, 5), 9, false)];
        s.update();
        assert!(s.penalty);

        s.penalty_ticks = 2;
        s.update();
        assert!(s.penalty);
        s.update();
        assert!(!s.penalty);
        assert_eq!(s.current_speed, s.base_speed);
    }

    #[test]
    fn solving_clears_an_active_penalty() {
        let mut s = fixed_session();
        s.eggs = vec![
            egg((6, 5), 9, false),
            egg((7, 5), 3, true),
            egg((8, 5), 4, true),
        ];

        s.update(); // decoy
        assert!(s.penalty);
        s.update(); // 3
        s.update(); // 4, solved

        assert_eq!(s.score, 1);
        assert!(!s.penalty);
        assert_eq!(s.penalty_ticks, 0);
        assert_eq!(s.current_speed, s.base_speed);
    }

    #[test]
    fn running_out_of_time_ends_the_game() {
        let mut s = fixed_session();
        s.eggs.clear();
        s.time_remaining = 0.01;

        let ev = s.update();
        assert_eq!(ev, vec![GameEvent::GameOver]);
        assert!(s.game_over);
        assert_eq!(s.game_over_reason, "Time's up!");
    }

    #[test]
    fn the_clock_waits_for_the_first_steer() {
        let mut s = Session::with_seed(1);
        let before = s.time_remaining;

        assert!(s.update().is_empty());
        assert_eq!(s.time_remaining, before);
        assert_eq!(s.snake.len(), 1);
    }

    #[test]
    fn reversing_direction_is_ignored() {
        let mut s = fixed_session();

        s.steer(Direction::Left);
        assert_eq!(s.heading, Some(Direction::Right));

        s.steer(Direction::Up);
        assert_eq!(s.heading, Some(Direction::Up));
    }

    #[test]
    fn free_moves_keep_the_length() {
        let mut s = fixed_session();
        s.eggs.clear();

        s.update();

        assert_eq!(s.snake.len(), 1);
        assert_eq!(s.snake.head(), (6, 5));
    }

    #[test]
    fn hitting_the_wall_ends_the_game() {
        let mut s = fixed_session();
        s.snake = Snake::new((GRID_WIDTH - 1, 5));
        s.eggs.clear();

        let ev = s.update();
        assert_eq!(ev, vec![GameEvent::GameOver]);
        assert_eq!(s.game_over_reason, "Hit the wall!");
    }

    #[test]
    fn moving_into_the_body_ends_the_game() {
        let mut s = fixed_session();
        let mut snake = Snake::new((5, 5));
        snake.advance((6, 5), true);
        snake.advance((6, 6), true);
        snake.advance((5, 6), true);
        s.snake = snake;
        s.eggs.clear();

        s.update();
        assert_eq!(s.game_over_reason, "Hit yourself!");
    }

    #[test]
    fn pausing_freezes_the_session() {
        let mut s = fixed_session();
        s.toggle_pause();
        let before = s.time_remaining;

        assert!(s.update().is_empty());
        assert_eq!(s.time_remaining, before);
        assert_eq!(s.snake.head(), (5, 5));

        s.toggle_pause();
        assert!(!s.paused);
    }

    #[test]
    fn inputs_are_dead_after_game_over() {
        let mut s = fixed_session();
        s.eggs.clear();
        s.time_remaining = 0.01;
        s.update();
        assert!(s.game_over);

        s.toggle_pause();
        assert!(!s.paused);
        s.steer(Direction::Down);
        assert_eq!(s.heading, None);
        assert!(s.update().is_empty());
    }

    #[test]
    fn time_limits_shrink_with_level_down_to_a_floor() {
        assert_eq!(Session::time_limit_for_level(0), 45.0);
        assert_eq!(Session::time_limit_for_level(1), 42.0);
        assert_eq!(Session::time_limit_for_level(8), 21.0);
        assert_eq!(Session::time_limit_for_level(9), 20.0);
        assert_eq!(Session::time_limit_for_level(30), 20.0);

        for level in 0..30 {
            assert!(
                Session::time_limit_for_level(level + 1) <= Session::time_limit_for_level(level)
            );
        }
    }

    #[test]
    fn remaining_needed_consumes_duplicates_one_by_one() {
        let mut s = fixed_session();
        s.equation.operands = vec![4, 4, 2];
        s.collected = vec![4];

        assert_eq!(s.remaining_needed(), vec![4, 2]);
    }

    #[test]
    fn reset_returns_to_the_initial_state() {
        let mut s = fixed_session();
        s.score = 5;
        s.lives = 1;
        s.eggs.clear();
        s.time_remaining = 0.01;
        s.update();
        assert!(s.game_over);

        s.reset();

        assert!(!s.game_over);
        assert!(!s.paused);
        assert_eq!(s.heading, None);
        assert_eq!(s.score, 0);
        assert_eq!(s.level, 0);
        assert_eq!(s.lives, STARTING_LIVES);
        assert_eq!(s.base_speed, BASE_SPEED);
        assert_eq!(s.time_remaining, 45.0);
        assert_eq!(s.snake.len(), 1);
        assert!(!s.eggs.is_empty());
    }
}
