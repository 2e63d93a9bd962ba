use rand::seq::SliceRandom;
use rand::Rng;

use Op::*;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    pub fn symbol(self) -> char {
        match self {
            Add => '+',
            Sub => '-',
            Mul => 'x',
            Div => '/',
        }
    }
}

pub struct Equation {
    pub text: String,
    pub answer: i32,
    pub operands: Vec<i32>,
    pub operators: Vec<Op>,
}

impl Equation {
    // The answer is computed from the sampled operands right here; it is never
    // re-derived from the display text later on.
    pub fn generate(level: u32, rng: &mut impl Rng) -> Self {
        match level.min(5) {
            0 => Self::level_zero(rng),
            1 => Self::level_one(rng),
            2 => Self::two_terms(rng),
            3 => Self::three_terms(rng),
            4 => Self::four_terms(rng),
            _ => Self::five_terms(rng),
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn level_zero(rng: &mut impl Rng) -> Self {
        match *[Add, Sub].choose(rng).unwrap() {
            Sub => {
                // minuend sampled first so the answer can't go negative
                let a = rng.gen_range(10..=20);
                let b = rng.gen_range(1..a);
                Self::from_pair(a, Sub, b)
            }
            _ => {
                let a = rng.gen_range(1..=10);
                let b = rng.gen_range(1..=10);
                Self::from_pair(a, Add, b)
            }
        }
    }

    fn level_one(rng: &mut impl Rng) -> Self {
        match *[Add, Sub, Mul, Div].choose(rng).unwrap() {
            Add => {
                let a = rng.gen_range(5..=15);
                let b = rng.gen_range(5..=15);
                Self::from_pair(a, Add, b)
            }
            Sub => {
                let a = rng.gen_range(15..=25);
                let b = rng.gen_range(1..a);
                Self::from_pair(a, Sub, b)
            }
            Mul => {
                let a = rng.gen_range(2..=8);
                let b = rng.gen_range(2..=8);
                Self::from_pair(a, Mul, b)
            }
            Div => {
                // dividend built as answer x divisor, so division is exact
                let answer = rng.gen_range(2..=12);
                let divisor = rng.gen_range(2..=6);
                Self::from_pair(answer * divisor, Div, divisor)
            }
        }
    }

    fn two_terms(rng: &mut impl Rng) -> Self {
        let a = rng.gen_range(10..=20);
        let b = rng.gen_range(1..=10);
        let c = rng.gen_range(1..=(a + b - 1).min(10));

        Equation {
            text: format!("{} + {} - {} = ?", a, b, c),
            answer: a + b - c,
            operands: vec![a, b, c],
            operators: vec![Add, Sub],
        }
    }

    fn three_terms(rng: &mut impl Rng) -> Self {
        let a = rng.gen_range(2..=5);
        let b = rng.gen_range(2..=5);
        let c = rng.gen_range(5..=15);
        // the subtrahend can't exceed what's been accumulated
        let d = rng.gen_range(1..=(a * b + c).min(10));

        Equation {
            text: format!("{} x {} + {} - {} = ?", a, b, c, d),
            answer: a * b + c - d,
            operands: vec![a, b, c, d],
            operators: vec![Mul, Add, Sub],
        }
    }

    fn four_terms(rng: &mut impl Rng) -> Self {
        // divisor first, second factor built as a multiple of it
        let c = rng.gen_range(2..=4);
        let a = rng.gen_range(2..=6);
        let b = c * rng.gen_range(2..=4);
        let d = rng.gen_range(1..=10);

        Equation {
            text: format!("{} x {} / {} + {} = ?", a, b, c, d),
            answer: a * b / c + d,
            operands: vec![a, b, c, d],
            operators: vec![Mul, Div, Add],
        }
    }

    fn five_terms(rng: &mut impl Rng) -> Self {
        let a = rng.gen_range(5..=15);
        let b = rng.gen_range(2..=5);
        let c = rng.gen_range(2..=5);
        let e = rng.gen_range(2..=4);
        let d = e * rng.gen_range(2..=6);

        Equation {
            text: format!("{} + {} x {} - {} / {} = ?", a, b, c, d, e),
            answer: a + b * c - d / e,
            operands: vec![a, b, c, d, e],
            operators: vec![Add, Mul, Sub, Div],
        }
    }

    fn from_pair(a: i32, op: Op, b: i32) -> Self {
        let answer = match op {
            Add => a + b,
            Sub => a - b,
            Mul => a * b,
            Div => a / b,
        };

        Equation {
            text: format!("{} {} {} = ?", a, op.symbol(), b),
            answer,
            operands: vec![a, b],
            operators: vec![op],
        }
    }
}
