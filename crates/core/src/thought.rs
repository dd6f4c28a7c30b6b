//! Thought records — the unit of output of the recursion engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mode::RecursionMode;

/// One step of a recursive contemplation: an input/output pair with metadata.
///
/// Produced once per recursion step. Record i's `input` is record i-1's
/// `output`; record 1's `input` is the seed. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtRecord {
    /// 1-based position within the contemplation sequence.
    pub depth: u32,

    /// The text fed into this step.
    pub input: String,

    /// The (possibly decorated) text the step produced.
    pub output: String,

    /// The mode the step ran under.
    pub mode: RecursionMode,

    /// When the step completed.
    pub timestamp: DateTime<Utc>,
}

impl ThoughtRecord {
    pub fn new(
        depth: u32,
        input: impl Into<String>,
        output: impl Into<String>,
        mode: RecursionMode,
    ) -> Self {
        Self {
            depth,
            input: input.into(),
            output: output.into(),
            mode,
            timestamp: Utc::now(),
        }
    }
}
