//! Chat command dispatcher — the chat-facing facade over the engine.
//!
//! Three plain-text commands map 1:1 onto the contemplation loop:
//! - `!think <text>` — run a contemplation and stream each thought as its
//!   own message, paced by a fixed delay
//! - `!mode <name>` — switch the chat's thinking mode
//! - `!modes` — list every mode with description and temperature
//!
//! The current mode is tracked per chat id, so concurrent channels cannot
//! trample each other's selection.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, mpsc};
use tracing::{info, warn};

use mirrormind_core::channel::ChannelMessage;
use mirrormind_core::error::ChannelError;
use mirrormind_core::mode::RecursionMode;
use mirrormind_engine::ContemplationEngine;

use crate::registry::ChannelRegistry;

/// Seed used when `!think` arrives with no text.
const DEFAULT_SEED: &str = "What is the nature of consciousness?";

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start a contemplation from the given seed (may be empty).
    Think(String),
    /// Switch the chat's mode to the named one.
    Mode(String),
    /// List available modes.
    Modes,
}

impl ChatCommand {
    /// Parse a message body into a command. Non-command chatter yields `None`.
    pub fn parse(text: &str) -> Option<ChatCommand> {
        let text = text.trim();
        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (text, ""),
        };

        match head {
            "!think" => Some(ChatCommand::Think(rest.to_string())),
            "!mode" => Some(ChatCommand::Mode(rest.to_string())),
            "!modes" => Some(ChatCommand::Modes),
            _ => None,
        }
    }
}

/// Routes chat commands to the engine and streams results back out.
pub struct ChatDispatcher {
    engine: Arc<ContemplationEngine>,
    registry: Arc<ChannelRegistry>,
    /// Current mode per chat id. Unset chats start in `standard`.
    modes: RwLock<HashMap<String, RecursionMode>>,
    pacing: Duration,
    think_depth: u32,
}

impl ChatDispatcher {
    pub fn new(engine: Arc<ContemplationEngine>, registry: Arc<ChannelRegistry>) -> Self {
        Self {
            engine,
            registry,
            modes: RwLock::new(HashMap::new()),
            pacing: Duration::from_secs(1),
            think_depth: 3,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_think_depth(mut self, depth: u32) -> Self {
        self.think_depth = depth;
        self
    }

    /// The mode currently selected for a chat.
    pub async fn current_mode(&self, chat_id: &str) -> RecursionMode {
        self.modes
            .read()
            .await
            .get(chat_id)
            .copied()
            .unwrap_or_default()
    }

    /// Consume the merged channel stream, one command at a time.
    pub async fn run(
        self: Arc<Self>,
        mut rx: mpsc::Receiver<(String, Result<ChannelMessage, ChannelError>)>,
    ) {
        while let Some((channel_name, result)) = rx.recv().await {
            let msg = match result {
                Ok(msg) => msg,
                Err(e) => {
                    warn!(channel = %channel_name, error = %e, "Channel stream error");
                    continue;
                }
            };

            let allowed = self
                .registry
                .get(&channel_name)
                .map(|ch| ch.is_allowed(&msg.sender_id))
                .unwrap_or(false);
            if !allowed {
                warn!(
                    channel = %channel_name,
                    sender = %msg.sender_id,
                    "Dropping message from unauthorized sender"
                );
                continue;
            }

            if let Err(e) = self.handle(&channel_name, &msg).await {
                warn!(channel = %channel_name, error = %e, "Command handling failed");
            }
        }
    }

    /// Handle one inbound message.
    pub async fn handle(
        &self,
        channel_name: &str,
        msg: &ChannelMessage,
    ) -> Result<(), ChannelError> {
        match ChatCommand::parse(&msg.content) {
            Some(ChatCommand::Think(seed)) => self.handle_think(channel_name, msg, &seed).await,
            Some(ChatCommand::Mode(name)) => self.handle_mode(channel_name, msg, &name).await,
            Some(ChatCommand::Modes) => {
                self.registry
                    .send_to(channel_name, &msg.chat_id, &self.mode_listing())
                    .await
            }
            None => Ok(()), // not a command, ignore
        }
    }

    async fn handle_think(
        &self,
        channel_name: &str,
        msg: &ChannelMessage,
        seed: &str,
    ) -> Result<(), ChannelError> {
        let mode = self.current_mode(&msg.chat_id).await;
        let seed = if seed.is_empty() { DEFAULT_SEED } else { seed };

        info!(channel = %channel_name, mode = %mode, "Chat contemplation requested");

        self.registry
            .send_to(
                channel_name,
                &msg.chat_id,
                &format!("\u{1F300} Initiating {mode} recursion:\n> '{seed}'"),
            )
            .await?;

        let records = match self.engine.contemplate(seed, self.think_depth, mode).await {
            Ok(records) => records,
            Err(e) => {
                return self
                    .registry
                    .send_to(
                        channel_name,
                        &msg.chat_id,
                        &format!("\u{26A0}\u{FE0F} Contemplation failed: {e}"),
                    )
                    .await;
            }
        };

        for record in records {
            self.registry
                .send_to(
                    channel_name,
                    &msg.chat_id,
                    &format!(
                        "**Depth {} ({})**\n{}\n`{}`",
                        record.depth,
                        record.mode,
                        record.output,
                        record.timestamp.to_rfc3339()
                    ),
                )
                .await?;
            tokio::time::sleep(self.pacing).await;
        }

        Ok(())
    }

    async fn handle_mode(
        &self,
        channel_name: &str,
        msg: &ChannelMessage,
        name: &str,
    ) -> Result<(), ChannelError> {
        match name.parse::<RecursionMode>() {
            Ok(mode) => {
                self.modes
                    .write()
                    .await
                    .insert(msg.chat_id.clone(), mode);
                self.registry
                    .send_to(
                        channel_name,
                        &msg.chat_id,
                        &format!(
                            "\u{1F504} Mode changed to **{mode}** (temperature {})",
                            mode.temperature()
                        ),
                    )
                    .await
            }
            // Unknown mode: leave the current one untouched, answer with
            // the listing instead
            Err(_) => {
                self.registry
                    .send_to(channel_name, &msg.chat_id, &self.mode_listing())
                    .await
            }
        }
    }

    fn mode_listing(&self) -> String {
        let mut listing = String::from("\u{1F52E} Available thinking modes:\n");
        for mode in RecursionMode::ALL {
            listing.push_str(&format!(
                "- **{}**: {} (temp: {})\n",
                mode,
                mode.description(),
                mode.temperature()
            ));
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::{DiscordChannel, DiscordConfig};
    use async_trait::async_trait;
    use mirrormind_core::channel::ChannelId;
    use mirrormind_core::error::ProviderError;
    use mirrormind_core::message::Message;
    use mirrormind_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use mirrormind_engine::{Decorator, ThoughtJournal};
    use std::sync::Mutex as StdMutex;

    struct MockProvider {
        requests: StdMutex<Vec<ProviderRequest>>,
        fail: bool,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                requests: StdMutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                requests: StdMutex::new(Vec::new()),
                fail: true,
            }
        }

        fn requests(&self) -> Vec<ProviderRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(ProviderError::Network("connection refused".into()));
            }
            let prompt = &request.messages[0].content;
            Ok(ProviderResponse {
                message: Message::assistant(format!("echo [{prompt}]")),
                model: request.model.clone(),
                usage: None,
            })
        }
    }

    struct Harness {
        provider: Arc<MockProvider>,
        discord: Arc<DiscordChannel>,
        dispatcher: ChatDispatcher,
        _tmp: tempfile::TempDir,
    }

    fn harness_with(provider: MockProvider) -> Harness {
        let provider = Arc::new(provider);
        let tmp = tempfile::tempdir().unwrap();
        let journal = ThoughtJournal::new(tmp.path()).unwrap();
        let engine = Arc::new(
            ContemplationEngine::new(provider.clone(), "tinyllama", journal)
                .with_decorator(Decorator::fixed(0)),
        );

        let discord = Arc::new(DiscordChannel::new(DiscordConfig {
            bot_token: "tok".into(),
            allowed_users: vec!["*".into()],
        }));
        let mut registry = ChannelRegistry::new();
        registry.register(discord.clone());

        let dispatcher = ChatDispatcher::new(engine, Arc::new(registry))
            .with_pacing(Duration::ZERO);

        Harness {
            provider,
            discord,
            dispatcher,
            _tmp: tmp,
        }
    }

    fn harness() -> Harness {
        harness_with(MockProvider::new())
    }

    fn chat_msg(content: &str) -> ChannelMessage {
        ChannelMessage {
            channel_id: ChannelId("discord".into()),
            sender_id: "user1".into(),
            sender_name: Some("Alice".into()),
            content: content.into(),
            chat_id: "chat-a".into(),
        }
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            ChatCommand::parse("!think what is time?"),
            Some(ChatCommand::Think("what is time?".into()))
        );
        assert_eq!(
            ChatCommand::parse("!think"),
            Some(ChatCommand::Think(String::new()))
        );
        assert_eq!(
            ChatCommand::parse("!mode poetic"),
            Some(ChatCommand::Mode("poetic".into()))
        );
        assert_eq!(ChatCommand::parse("!modes"), Some(ChatCommand::Modes));
        assert_eq!(ChatCommand::parse("  !modes  "), Some(ChatCommand::Modes));
        assert_eq!(ChatCommand::parse("hello there"), None);
        assert_eq!(ChatCommand::parse("!unknown"), None);
    }

    #[tokio::test]
    async fn think_streams_announce_plus_one_message_per_depth() {
        let h = harness();

        h.dispatcher
            .handle("discord", &chat_msg("!think the self"))
            .await
            .unwrap();

        let sent = h.discord.sent_messages().await;
        // 1 announcement + 3 thought messages (default depth 3)
        assert_eq!(sent.len(), 4);
        assert!(sent[0].1.contains("standard recursion"));
        assert!(sent[0].1.contains("the self"));
        assert!(sent[1].1.contains("Depth 1"));
        assert!(sent[2].1.contains("Depth 2"));
        assert!(sent[3].1.contains("Depth 3"));
        // All answers land in the originating chat
        assert!(sent.iter().all(|(chat, _)| chat == "chat-a"));
    }

    #[tokio::test]
    async fn empty_think_uses_default_seed() {
        let h = harness();

        h.dispatcher
            .handle("discord", &chat_msg("!think"))
            .await
            .unwrap();

        let sent = h.discord.sent_messages().await;
        assert!(sent[0].1.contains("What is the nature of consciousness?"));
    }

    #[tokio::test]
    async fn mode_change_applies_to_subsequent_think() {
        let h = harness();

        h.dispatcher
            .handle("discord", &chat_msg("!mode mystical"))
            .await
            .unwrap();
        assert_eq!(
            h.dispatcher.current_mode("chat-a").await,
            RecursionMode::Mystical
        );

        let sent = h.discord.sent_messages().await;
        assert!(sent[0].1.contains("mystical"));
        assert!(sent[0].1.contains("1"));

        h.dispatcher
            .handle("discord", &chat_msg("!think the void"))
            .await
            .unwrap();

        // Every completion ran at the mystical temperature
        for request in h.provider.requests() {
            assert_eq!(request.temperature, 1.0);
        }
    }

    #[tokio::test]
    async fn unknown_mode_lists_modes_and_keeps_current() {
        let h = harness();

        h.dispatcher
            .handle("discord", &chat_msg("!mode poetic"))
            .await
            .unwrap();
        h.dispatcher
            .handle("discord", &chat_msg("!mode quantum"))
            .await
            .unwrap();

        // Mode unchanged by the bad request
        assert_eq!(
            h.dispatcher.current_mode("chat-a").await,
            RecursionMode::Poetic
        );

        let sent = h.discord.sent_messages().await;
        let listing = &sent[1].1;
        for mode in RecursionMode::ALL {
            assert!(listing.contains(mode.as_str()), "missing {mode}");
        }
    }

    #[tokio::test]
    async fn modes_command_lists_descriptions_and_temperatures() {
        let h = harness();

        h.dispatcher
            .handle("discord", &chat_msg("!modes"))
            .await
            .unwrap();

        let sent = h.discord.sent_messages().await;
        assert_eq!(sent.len(), 1);
        let listing = &sent[0].1;
        assert!(listing.contains("Philosophical analysis and reflection"));
        assert!(listing.contains("0.5"));
        assert!(listing.contains("mystical"));
    }

    #[tokio::test]
    async fn mode_is_tracked_per_chat() {
        let h = harness();

        h.dispatcher
            .handle("discord", &chat_msg("!mode scientific"))
            .await
            .unwrap();

        assert_eq!(
            h.dispatcher.current_mode("chat-a").await,
            RecursionMode::Scientific
        );
        assert_eq!(
            h.dispatcher.current_mode("chat-b").await,
            RecursionMode::Standard
        );
    }

    #[tokio::test]
    async fn non_command_chatter_is_ignored() {
        let h = harness();

        h.dispatcher
            .handle("discord", &chat_msg("just talking"))
            .await
            .unwrap();

        assert!(h.discord.sent_messages().await.is_empty());
        assert!(h.provider.requests().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_chat_message() {
        let h = harness_with(MockProvider::failing());

        h.dispatcher
            .handle("discord", &chat_msg("!think doomed"))
            .await
            .unwrap();

        let sent = h.discord.sent_messages().await;
        // Announcement, then the failure notice
        assert_eq!(sent.len(), 2);
        assert!(sent[1].1.contains("Contemplation failed"));
    }

    #[tokio::test]
    async fn run_drops_unauthorized_senders() {
        let provider = Arc::new(MockProvider::new());
        let tmp = tempfile::tempdir().unwrap();
        let journal = ThoughtJournal::new(tmp.path()).unwrap();
        let engine = Arc::new(ContemplationEngine::new(
            provider.clone(),
            "tinyllama",
            journal,
        ));

        let discord = Arc::new(DiscordChannel::new(DiscordConfig {
            bot_token: "tok".into(),
            allowed_users: vec!["alice".into()],
        }));
        let mut registry = ChannelRegistry::new();
        registry.register(discord.clone());
        let registry = Arc::new(registry);

        let rx = registry.start_all().await.unwrap();
        let dispatcher =
            Arc::new(ChatDispatcher::new(engine, registry).with_pacing(Duration::ZERO));
        let handle = tokio::spawn(dispatcher.run(rx));

        let mut msg = chat_msg("!modes");
        msg.sender_id = "mallory".into();
        discord.inject_message(msg).await.unwrap();

        let mut allowed_msg = chat_msg("!modes");
        allowed_msg.sender_id = "alice".into();
        discord.inject_message(allowed_msg).await.unwrap();

        // Give the dispatcher a moment to drain both messages
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();

        // Only alice's command produced output
        let sent = discord.sent_messages().await;
        assert_eq!(sent.len(), 1);
    }
}
