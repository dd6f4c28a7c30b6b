//! `mirrormind daemon` — Gateway and chat channels over one shared engine.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use mirrormind_channels::{ChannelRegistry, ChatDispatcher, DiscordChannel, DiscordConfig};
use mirrormind_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("\u{1FA9E} MirrorMind Daemon");
    println!(
        "   Gateway:  {}:{}",
        config.gateway.host, config.gateway.port
    );
    println!("   Model:    {}", config.model);

    let router = mirrormind_providers::router::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    let engine = Arc::new(mirrormind_gateway::build_engine(&config, provider)?);

    // Wire enabled chat channels
    let mut registry = ChannelRegistry::new();
    if let Some(discord_cfg) = config.channels.get("discord").filter(|c| c.enabled) {
        let bot_token = discord_cfg
            .settings
            .get("bot_token")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        registry.register(Arc::new(DiscordChannel::new(DiscordConfig {
            bot_token,
            allowed_users: discord_cfg.allowed_users.clone(),
        })));
    }
    println!("   Channels: {}", registry.len());

    if !registry.is_empty() {
        let registry = Arc::new(registry);
        let rx = registry.start_all().await?;
        let dispatcher = Arc::new(
            ChatDispatcher::new(engine.clone(), registry)
                .with_pacing(Duration::from_millis(config.chat.pacing_ms))
                .with_think_depth(config.chat.think_depth),
        );
        tokio::spawn(dispatcher.run(rx));
        info!("Chat dispatcher started");
    } else {
        info!("No chat channels enabled, running gateway only");
    }

    // Start gateway (this blocks)
    mirrormind_gateway::serve(engine, &config).await?;

    Ok(())
}
