use crate::{env::Environment, stats::Report};

/// A one-dimensional walk toward a goal cell
///
/// The agent starts at the left end of a corridor of `len` cells and pays a
/// step penalty until it reaches the goal at the right end. Actions: `0`
/// moves left, `2` moves right, anything else stays put. Episodes are cut
/// off after `max_steps` decisions.
///
/// Intended for use with a [`QTableAgent`](crate::algo::tabular::QTableAgent).
pub struct Corridor {
    len: usize,
    pos: usize,
    steps: u64,
    max_steps: u64,
    pub report: Report,
}

impl Corridor {
    pub fn new(len: usize, max_steps: u64) -> Self {
        assert!(len >= 2, "corridor needs a start and a goal cell");
        Self {
            len,
            pos: 0,
            steps: 0,
            max_steps,
            report: Report::new(vec!["reward", "steps"]),
        }
    }
}

impl Environment for Corridor {
    fn num_states(&self) -> usize {
        self.len
    }

    fn num_actions(&self) -> usize {
        3
    }

    fn reset(&mut self) -> usize {
        self.pos = 0;
        self.steps = 0;
        self.pos
    }

    fn step(&mut self, action: usize) -> (usize, f64, bool) {
        self.steps += 1;
        *self.report.entry("steps") += 1.0;

        match action {
            0 if self.pos > 0 => self.pos -= 1,
            2 if self.pos < self.len - 1 => self.pos += 1,
            _ => {}
        }

        let goal = self.pos == self.len - 1;
        let reward = if goal { 1.0 } else { -0.1 };
        let done = goal || self.steps >= self.max_steps;

        *self.report.entry("reward") += reward;

        (self.pos, reward, done)
    }
}
