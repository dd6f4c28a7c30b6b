//! # MirrorMind Core
//!
//! Domain types, traits, and error definitions for the MirrorMind recursive
//! self-dialogue runtime. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem boundary is defined as a trait here. Implementations live
//! in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod channel;
pub mod error;
pub mod message;
pub mod mode;
pub mod provider;
pub mod thought;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, ChannelId, ChannelMessage};
pub use error::{ChannelError, EngineError, Error, ProviderError, Result};
pub use message::{Message, Role};
pub use mode::{ParseModeError, RecursionMode};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use thought::ThoughtRecord;
