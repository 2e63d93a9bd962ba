use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::GridPos;

const MAX_SAMPLE_ATTEMPTS: u32 = 128;

pub struct Egg {
    pub pos: GridPos,
    pub value: i32,
    pub is_target: bool,
    pub collected: bool,
}

// Places one target egg per operand occurrence (duplicates included), then
// `6 + level` decoys whose values match no operand. No two eggs share a cell
// and no egg lands on the snake.
pub fn spawn_eggs(
    operands: &[i32],
    level: u32,
    snake: &[GridPos],
    width: i32,
    height: i32,
    rng: &mut impl Rng,
) -> Vec<Egg> {
    let mut taken: HashSet<GridPos> = snake.iter().copied().collect();
    let mut eggs = vec![];

    for &value in operands {
        if let Some(pos) = free_cell(&taken, width, height, rng) {
            taken.insert(pos);
            eggs.push(Egg { pos, value, is_target: true, collected: false });
        }
    }

    for value in decoy_values(operands, level, rng) {
        if let Some(pos) = free_cell(&taken, width, height, rng) {
            taken.insert(pos);
            eggs.push(Egg { pos, value, is_target: false, collected: false });
        }
    }

    eggs
}

///////////////////////////////////////////////////////////////////////////

// Uniform free cell. Rejection-samples a bounded number of times, then falls
// back to choosing among the remaining free cells, so a crowded board can't
// stall placement. None means the board is full.
fn free_cell(
    taken: &HashSet<GridPos>,
    width: i32,
    height: i32,
    rng: &mut impl Rng,
) -> Option<GridPos> {
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let pos = (rng.gen_range(0..width), rng.gen_range(0..height));
        if !taken.contains(&pos) {
            return Some(pos);
        }
    }

    let free: Vec<GridPos> = (0..width)
        .flat_map(|x| (0..height).map(move |y| (x, y)))
        .filter(|pos| !taken.contains(pos))
        .collect();

    free.choose(rng).copied()
}

fn decoy_values(operands: &[i32], level: u32, rng: &mut impl Rng) -> Vec<i32> {
    let max_value = (operands.iter().copied().max().unwrap_or(0) + 10).max(20);

    // can't ask for more distinct decoys than the value range holds
    let available = (1..=max_value).filter(|v| !operands.contains(v)).count();
    let count = ((6 + level) as usize).min(available);

    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        let v = rng.gen_range(1..=max_value);
        if !operands.contains(&v) && !values.contains(&v) {
            values.push(v);
        }
    }

    values
}
