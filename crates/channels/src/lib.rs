//! Chat channel implementations for MirrorMind.
//!
//! Each channel connects to a chat surface and relays command messages
//! to/from the contemplation engine. Channels are trait-based and
//! platform-agnostic.
//!
//! Available pieces:
//! - **CLI** — Interactive terminal chat (stdin/stdout)
//! - **Discord** — Discord Bot API adapter (stub transport; serenity in
//!   production)
//! - **Registry** — Central channel manager merging inbound streams
//! - **Dispatcher** — Parses `!think` / `!mode` / `!modes` and drives the
//!   engine

pub mod cli;
pub mod discord;
pub mod dispatcher;
pub mod registry;

pub use cli::CliChannel;
pub use discord::{DiscordChannel, DiscordConfig};
pub use dispatcher::{ChatCommand, ChatDispatcher};
pub use registry::ChannelRegistry;
