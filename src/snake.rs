use crate::GridPos;
use Direction::*;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Collision {
    Wall,
    Body,
}

// Head lives at index 0.
pub struct Snake {
    body: Vec<GridPos>,
}

impl Snake {
    pub fn new(start: GridPos) -> Self {
        Snake { body: vec![start] }
    }

    pub fn head(&self) -> GridPos {
        self.body[0]
    }

    pub fn body(&self) -> &[GridPos] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.body.contains(&pos)
    }

    // The cell the head would move into, or the collision that move causes.
    // The tail cell still counts as occupied: it only vacates on commit.
    pub fn probe(&self, direction: Direction, width: i32, height: i32) -> Result<GridPos, Collision> {
        let (dx, dy) = direction.delta();
        let (x, y) = self.head();
        let next = (x + dx, y + dy);

        if next.0 < 0 || next.0 >= width || next.1 < 0 || next.1 >= height {
            Err(Collision::Wall)
        } else if self.body.contains(&next) {
            Err(Collision::Body)
        } else {
            Ok(next)
        }
    }

    // Commits a probed move. Growth skips the tail removal for this step.
    pub fn advance(&mut self, new_head: GridPos, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }
}
