use std::{process::exit, thread::sleep, time::Duration};

use crate::audio::Audio;
use crate::session::{Session, GRID_HEIGHT, GRID_WIDTH};
use crate::snake::Direction;
use crate::term::TermManager;
use crate::TermInt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;

const TICK_INTERVAL_MS: u64 = 16; // ~60 Hz drive loop

// Each grid cell is two terminal columns, wide enough for a two-digit egg
const CELL_WIDTH: TermInt = 2;
const HUD_WIDTH: TermInt = GRID_WIDTH as TermInt * CELL_WIDTH + 2;
const FIELD_LEFT: TermInt = 0;
const FIELD_TOP: TermInt = 7;

const MIN_TERM_WIDTH: TermInt = HUD_WIDTH;
const MIN_TERM_HEIGHT: TermInt = FIELD_TOP + GRID_HEIGHT as TermInt + 2;

pub struct MathSnake {
    term: TermManager,
    session: Session,
    audio: Audio,
}

impl MathSnake {
    pub fn new() -> Self {
        MathSnake {
            term: TermManager::new(),
            session: Session::new(),
            audio: Audio::new(),
        }
    }

    pub fn initialize(&mut self) {
        let (w, h) = self.term.get_terminal_size();
        if w < MIN_TERM_WIDTH || h < MIN_TERM_HEIGHT {
            eprintln!(
                "Terminal too small: need at least {}x{}, got {}x{}",
                MIN_TERM_WIDTH, MIN_TERM_HEIGHT, w, h
            );
            exit(1);
        }

        self.term.setup();
    }

    pub fn show_intro(&mut self) {
        let lines = &[
            "MATH SNAKE",
            "",
            "Collect ALL the numbers of the equation!",
            "Wrong numbers cost a life and slow you down.",
            "",
            "Arrow keys or WASD to move",
            "P to pause, Esc to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines);

        let key = self.term.read_key_blocking();
        if is_quit(&key) {
            self.clean_exit();
        }

        self.term.hide_message();
    }

    pub fn play(&mut self) {
        self.session.reset();
        self.term.clear();
        self.term.draw_border_rect(
            (FIELD_LEFT, FIELD_TOP),
            GRID_WIDTH as TermInt * CELL_WIDTH + 2,
            GRID_HEIGHT as TermInt + 2,
        );
        self.term.hide_message();

        let mut frame: u64 = 0;

        loop {
            sleep(Duration::from_millis(TICK_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue() {
                match key_ev {
                    ev if is_quit(&ev) => self.clean_exit(),
                    KeyEvent { code, modifiers: _ } => match code {
                        KeyCode::Char('w') | KeyCode::Up => self.session.steer(Direction::Up),
                        KeyCode::Char('a') | KeyCode::Left => self.session.steer(Direction::Left),
                        KeyCode::Char('s') | KeyCode::Down => self.session.steer(Direction::Down),
                        KeyCode::Char('d') | KeyCode::Right => self.session.steer(Direction::Right),
                        KeyCode::Char('p') => self.toggle_pause(),
                        _ => {}
                    },
                }
            }

            if self.session.paused {
                continue;
            }

            frame += 1;
            if frame % self.session.current_speed == 0 {
                for event in self.session.update() {
                    self.audio.play(event);
                }
            }

            if self.session.game_over {
                self.show_game_over();
                break;
            }

            self.draw_frame();
        }

        // Stay in the game-over overlay until a restart or quit
        loop {
            let key = self.term.read_key_blocking();
            if is_quit(&key) {
                self.clean_exit();
            }
            if key.code == KeyCode::Char(' ') {
                return; // the caller starts the next round
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clean_exit(&mut self) {
        self.term.restore();
        exit(0);
    }

    fn toggle_pause(&mut self) {
        self.session.toggle_pause();

        if self.session.paused {
            self.term.show_message(&["Paused", "", "Press P to continue"]);
        } else {
            self.term.hide_message();
        }
    }

    fn draw_frame(&mut self) {
        self.draw_hud();
        self.draw_field();
        self.term.flush();
    }

    fn draw_hud(&mut self) {
        let s = &self.session;
        let width = HUD_WIDTH as usize;

        let equation = format!("{:^width$}", s.equation.text, width = width);
        self.term.print_colored_at((0, 0), &equation, Color::Blue);

        self.term.print_str_at((0, 1), &format!("Level: {:<3}", s.level));
        let score = format!("Score: {:<5}", s.score);
        self.term
            .print_colored_at((HUD_WIDTH - score.len() as TermInt, 1), &score, Color::Red);

        self.term
            .print_colored_at((0, 2), &format!("Lives: {:<2}", s.lives), Color::Red);
        let timer_color = if s.time_remaining < 10.0 {
            Color::Red
        } else if s.time_remaining < 20.0 {
            Color::DarkYellow
        } else {
            Color::White
        };
        let timer = format!("Time: {:>3}s ", s.time_remaining as i32);
        self.term
            .print_colored_at((HUD_WIDTH - timer.len() as TermInt, 2), &timer, timer_color);

        self.term.print_colored_at(
            (0, 3),
            &format!("Speed: {:<2}", s.display_speed()),
            Color::DarkGrey,
        );

        let collected = format!(
            "Collected: {:<width$}",
            join(&s.collected),
            width = width - 11
        );
        self.term.print_str_at((0, 4), &collected);

        let needed = format!(
            "Still need: {:<width$}",
            join(&s.remaining_needed()),
            width = width - 12
        );
        self.term.print_colored_at((0, 5), &needed, Color::Blue);

        let banner = if s.penalty {
            format!("WRONG NUMBER! Lives: {} - snake slowed!", s.lives)
        } else if s.heading.is_none() {
            "Eat the equation's numbers. 2 wrong eggs = game over!".to_string()
        } else {
            String::new()
        };
        let banner = format!("{:^width$}", banner, width = width);
        self.term.print_colored_at((0, 6), &banner, Color::Red);
    }

    fn draw_field(&mut self) {
        let s = &self.session;
        // the penalty gets its own color set so the slowdown reads at a glance
        let (head_color, body_color) = if s.penalty {
            (Color::Red, Color::DarkYellow)
        } else {
            (Color::Green, Color::DarkGreen)
        };

        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                let pos = (x, y);
                let cell = (
                    FIELD_LEFT + 1 + x as TermInt * CELL_WIDTH,
                    FIELD_TOP + 1 + y as TermInt,
                );

                if let Some(egg) = s.eggs.iter().find(|e| e.pos == pos && !e.collected) {
                    // targets and decoys look identical on purpose
                    let label = format!("{:>2}", egg.value);
                    self.term.print_colored_at(cell, &label, Color::Blue);
                } else if s.snake.head() == pos {
                    self.term.print_colored_at(cell, "██", head_color);
                } else if s.snake.contains(pos) {
                    self.term.print_colored_at(cell, "██", body_color);
                } else {
                    self.term.print_str_at(cell, "  ");
                }
            }
        }
    }

    fn show_game_over(&mut self) {
        let score_line = format!("Final score: {}", self.session.score);
        let level_line = format!("Reached level: {}", self.session.level);

        self.term.show_message(&[
            "GAME OVER!",
            self.session.game_over_reason,
            "",
            &score_line,
            &level_line,
            "",
            "Press SPACE to play again,",
            "or Esc to quit.",
        ]);
    }
}

fn join(values: &[i32]) -> String {
    values
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_quit(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Esc
        || matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
