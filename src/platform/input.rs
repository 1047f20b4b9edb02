//! Scripted input for replays, demos and tests

use std::collections::VecDeque;

use super::InputSource;
use crate::sim::TickInput;

/// Plays back a fixed sequence of inputs, then idles with `TickInput::default()`
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<TickInput>,
    /// Returned once the script runs out
    fallback: TickInput,
}

impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            queue: inputs.into_iter().collect(),
            fallback: TickInput::default(),
        }
    }

    /// Input returned after the script is exhausted
    pub fn with_fallback(mut self, fallback: TickInput) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, input: TickInput) {
        self.queue.push_back(input);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
