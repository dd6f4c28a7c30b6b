//! Recursive contemplation engine for MirrorMind.
//!
//! The engine feeds each LLM response back in as the next prompt for a fixed
//! number of iterations, producing an ordered sequence of thought records.
//! Both the HTTP gateway and the chat channels are thin callers of this loop.

pub mod decorate;
pub mod engine;
pub mod journal;

pub use decorate::{Decorator, MYSTICAL_FRAMES, POETIC_FRAMES};
pub use engine::{ContemplationEngine, FailurePolicy};
pub use journal::ThoughtJournal;
