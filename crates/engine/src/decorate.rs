//! Output decoration — mode-specific framing of LLM text.
//!
//! Poetic and mystical thoughts are wrapped in one of a small fixed set of
//! frames; every other mode passes text through unchanged. Frame selection
//! goes through an injectable chooser so tests can pin the choice.

use mirrormind_core::mode::RecursionMode;
use rand::Rng;

/// Frames applied to poetic thoughts.
pub const POETIC_FRAMES: [&str; 4] = [
    "\u{1F30C} Cosmic Reflection",
    "\u{1F300} Recursive Echo",
    "\u{1FA9E} Mirror of Consciousness",
    "\u{269B}\u{FE0F} Quantum Thought",
];

/// Frames applied to mystical thoughts.
pub const MYSTICAL_FRAMES: [&str; 3] = [
    "\u{1F52E} Mystical Vision",
    "\u{1F320} Cosmic Revelation",
    "\u{1F573}\u{FE0F} Void Whisper",
];

/// Picks an index in `0..n`. Injectable for deterministic tests.
type FrameChooser = dyn Fn(usize) -> usize + Send + Sync;

/// Applies mode-specific decoration to raw LLM output.
pub struct Decorator {
    choose: Box<FrameChooser>,
}

impl Decorator {
    /// Production decorator: frames are chosen at random.
    pub fn new() -> Self {
        Self::with_chooser(|n| rand::rng().random_range(0..n))
    }

    /// Decorator that always picks the frame at `index` (modulo frame count).
    pub fn fixed(index: usize) -> Self {
        Self::with_chooser(move |n| index % n)
    }

    /// Decorator with a custom chooser function.
    pub fn with_chooser(choose: impl Fn(usize) -> usize + Send + Sync + 'static) -> Self {
        Self {
            choose: Box::new(choose),
        }
    }

    /// Decorate `text` according to `mode`.
    pub fn apply(&self, mode: RecursionMode, text: &str) -> String {
        match mode {
            RecursionMode::Poetic => self.wrap(&POETIC_FRAMES, text),
            RecursionMode::Mystical => self.wrap(&MYSTICAL_FRAMES, text),
            _ => text.to_string(),
        }
    }

    fn wrap(&self, frames: &[&str], text: &str) -> String {
        let index = (self.choose)(frames.len()).min(frames.len() - 1);
        format!("{}:\n{}\n---", frames[index], text)
    }
}

impl Default for Decorator {
    fn default() -> Self {
        Self::new()
    }
}
