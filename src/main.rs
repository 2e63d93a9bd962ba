mod audio;
mod eggs;
mod equation;
mod game;
mod session;
mod snake;
mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);

// Playfield cell, distinct from terminal coordinates
pub type GridPos = (i32, i32);

fn main() {
    let mut game = game::MathSnake::new();
    game.initialize();
    game.show_intro();

    loop {
        // Each round runs until game over; SPACE restarts, Esc exits cleanly
        game.play();
    }
}
