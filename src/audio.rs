use std::io::{stdout, Write};

use crate::session::GameEvent;

// Terminal-bell cues, one pattern per event. Writes are fire-and-forget: if
// the terminal swallows or refuses the bell, the game just stays silent.
pub struct Audio;

impl Audio {
    pub fn new() -> Self {
        Audio
    }

    pub fn play(&mut self, event: GameEvent) {
        let bells: usize = match event {
            GameEvent::TargetCollected => 1,
            GameEvent::DecoyCollected => 2,
            GameEvent::GameOver => 3,
        };

        let mut out = stdout();
        for _ in 0..bells {
            let _ = out.write_all(b"\x07");
        }
        let _ = out.flush();
    }
}
