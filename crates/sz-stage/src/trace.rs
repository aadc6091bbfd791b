//! StageTrace — the events a round actually revealed
//!
//! Sessions record every emitted event so a round can be audited or replayed
//! after the fact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::StageCategory;

/// Every event revealed for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Round identifier (e.g. "slot-000042")
    pub trace_id: String,

    /// Game identifier ("slot", "wheel", "cases")
    pub game_id: String,

    /// RNG seed of the engine, when seeded
    #[serde(default)]
    pub seed: Option<u64>,

    /// Events in reveal order
    pub events: Vec<StageEvent>,

    /// When the round started
    pub recorded_at: DateTime<Utc>,
}

impl StageTrace {
    pub fn new(trace_id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            game_id: game_id.into(),
            seed: None,
            events: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Time from first to last event
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.type_name() == type_name)
    }

    /// Timestamps never decrease
    pub fn is_ordered(&self) -> bool {
        self.events
            .windows(2)
            .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
