//! Reveal — an in-flight, ordered replay of a settled round
//!
//! The engine commits the outcome first, then hands the caller a [`Reveal`].
//! Steps come out strictly in order. A reentrant spin request only flips the
//! fast flag, which shortens the reel stops that have not been shown yet.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::Stage;
use crate::timing::{StepDelay, TimestampGenerator};

/// One queued step: the stage and the delay before it shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealStep {
    pub stage: Stage,
    pub delay: StepDelay,
}

/// Ordered reveal timeline with a fast-mode flag
#[derive(Debug, Clone, Default)]
pub struct Reveal {
    steps: VecDeque<RevealStep>,
    fast: bool,
    clock: TimestampGenerator,
    emitted: usize,
}

impl Reveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a step
    pub fn push(&mut self, stage: Stage, delay: StepDelay) {
        self.steps.push_back(RevealStep { stage, delay });
    }

    /// Builder form of [`Reveal::push`]
    pub fn then(mut self, stage: Stage, delay: StepDelay) -> Self {
        self.push(stage, delay);
        self
    }

    /// Request fast mode. Returns `true` only on the first request.
    pub fn fast_forward(&mut self) -> bool {
        if self.fast {
            return false;
        }
        self.fast = true;
        log::debug!(
            "[Reveal] Fast-forward with {} step(s) left",
            self.steps.len()
        );
        true
    }

    pub fn is_fast(&self) -> bool {
        self.fast
    }

    /// Emit the next step, stamped with the reveal clock
    pub fn next_event(&mut self) -> Option<StageEvent> {
        let step = self.steps.pop_front()?;
        let timestamp = self.clock.step(step.delay, self.fast);
        self.emitted += 1;

        let mut event = StageEvent::new(step.stage, timestamp);
        event.fast = self.fast;
        Some(event)
    }

    /// Peek at the next stage without emitting it
    pub fn peek(&self) -> Option<&Stage> {
        self.steps.front().map(|s| &s.stage)
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Time still to run under the current mode
    pub fn remaining_ms(&self) -> f64 {
        self.steps.iter().map(|s| s.delay.resolve(self.fast)).sum()
    }

    /// Current reveal clock
    pub fn elapsed_ms(&self) -> f64 {
        self.clock.current()
    }

    /// Emit everything that is left
    pub fn drain(&mut self) -> Vec<StageEvent> {
        let mut events = Vec::with_capacity(self.steps.len());
        while let Some(event) = self.next_event() {
            events.push(event);
        }
        events
    }

    /// Stages still queued, in order
    pub fn pending_stages(&self) -> impl Iterator<Item = &Stage> {
        self.steps.iter().map(|s| &s.stage)
    }
}

impl Iterator for Reveal {
    type Item = StageEvent;

    fn next(&mut self) -> Option<StageEvent> {
        self.next_event()
    }
}
