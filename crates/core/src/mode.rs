//! Recursion modes — named presets controlling prompt phrasing, sampling
//! temperature, and optional output decoration.
//!
//! The set is closed: every mode, its instruction template, and its
//! temperature live in static tables here. Nothing mutates them at runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A thinking mode for the recursion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecursionMode {
    Standard,
    Poetic,
    Philosophical,
    Scientific,
    Psychological,
    Mystical,
}

/// Error returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode: {0}")]
pub struct ParseModeError(pub String);

impl RecursionMode {
    /// Every mode, in listing order.
    pub const ALL: [RecursionMode; 6] = [
        RecursionMode::Standard,
        RecursionMode::Poetic,
        RecursionMode::Philosophical,
        RecursionMode::Scientific,
        RecursionMode::Psychological,
        RecursionMode::Mystical,
    ];

    /// The lowercase wire name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            RecursionMode::Standard => "standard",
            RecursionMode::Poetic => "poetic",
            RecursionMode::Philosophical => "philosophical",
            RecursionMode::Scientific => "scientific",
            RecursionMode::Psychological => "psychological",
            RecursionMode::Mystical => "mystical",
        }
    }

    /// Fixed sampling temperature for this mode.
    pub fn temperature(self) -> f32 {
        match self {
            RecursionMode::Standard => 0.7,
            RecursionMode::Poetic => 0.9,
            RecursionMode::Philosophical => 0.8,
            RecursionMode::Scientific => 0.5,
            RecursionMode::Psychological => 0.75,
            RecursionMode::Mystical => 1.0,
        }
    }

    /// One-line description, surfaced by the modes listing.
    pub fn description(self) -> &'static str {
        match self {
            RecursionMode::Standard => "Standard recursive thought generation",
            RecursionMode::Poetic => "Poetic and metaphorical responses",
            RecursionMode::Philosophical => "Philosophical analysis and reflection",
            RecursionMode::Scientific => "Scientific explanation and reasoning",
            RecursionMode::Psychological => "Psychological perspective and analysis",
            RecursionMode::Mystical => "Mystical and esoteric interpretations",
        }
    }

    /// Render the mode's instruction around the current input.
    ///
    /// `standard` passes the input through unchanged.
    pub fn instruction(self, input: &str) -> String {
        match self {
            RecursionMode::Standard => input.to_string(),
            RecursionMode::Poetic => format!("Respond poetically about: {input}"),
            RecursionMode::Philosophical => format!("Analyze philosophically: {input}"),
            RecursionMode::Scientific => format!("Explain scientifically: {input}"),
            RecursionMode::Psychological => {
                format!("Analyze from psychological perspective: {input}")
            }
            RecursionMode::Mystical => format!("Respond mystically about: {input}"),
        }
    }
}

impl std::fmt::Display for RecursionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecursionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(RecursionMode::Standard),
            "poetic" => Ok(RecursionMode::Poetic),
            "philosophical" => Ok(RecursionMode::Philosophical),
            "scientific" => Ok(RecursionMode::Scientific),
            "psychological" => Ok(RecursionMode::Psychological),
            "mystical" => Ok(RecursionMode::Mystical),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

impl Default for RecursionMode {
    fn default() -> Self {
        RecursionMode::Standard
    }
}
