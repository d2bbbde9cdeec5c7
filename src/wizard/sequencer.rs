//! Step Sequencer: the active step of a fixed, ordered list.

/// Owns the active step index. `0 <= active < len` always holds; moving past
/// either end is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequencer {
    active: usize,
    len: usize,
}

impl StepSequencer {
    /// `len` is clamped to at least one step.
    pub fn new(len: usize) -> Self {
        Self {
            active: 0,
            len: len.max(1),
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn step_count(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.active == 0
    }

    pub fn is_last(&self) -> bool {
        self.active + 1 == self.len
    }

    /// Returns whether the index moved.
    pub fn go_next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.active += 1;
        true
    }

    /// Returns whether the index moved.
    pub fn go_back(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.active -= 1;
        true
    }

    /// Out-of-range targets are ignored.
    pub fn jump_to(&mut self, step: usize) -> bool {
        if step >= self.len || step == self.active {
            return false;
        }
        self.active = step;
        true
    }

    pub fn reset(&mut self) {
        self.active = 0;
    }
}
