//! Bounded history of saved states for stepping backwards.

use std::collections::VecDeque;

/// Ring of serialized states. Pushing past capacity drops the oldest state.
#[derive(Debug, Clone)]
pub struct RewindBuffer {
    states: VecDeque<Vec<u8>>,
    capacity: usize,
}

impl RewindBuffer {
    /// Rewind depth kept by the debugger.
    pub const DEFAULT_CAPACITY: usize = 100;

    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            states: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a state. Returns the state that fell off the far end, if any.
    pub fn push(&mut self, state: Vec<u8>) -> Option<Vec<u8>> {
        let dropped = if self.states.len() == self.capacity {
            self.states.pop_front()
        } else {
            None
        };
        self.states.push_back(state);
        dropped
    }

    /// Take the most recent state.
    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.states.pop_back()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Default for RewindBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
