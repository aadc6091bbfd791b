//! StageEvent — a stage placed on the reveal timeline

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage with its reveal timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The stage
    pub stage: Stage,

    /// Milliseconds from the start of the round
    pub timestamp_ms: f64,

    /// Reveal ran in fast mode when this event was emitted
    #[serde(default)]
    pub fast: bool,

    /// Free-form tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl StageEvent {
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            fast: false,
            tags: Vec::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}
