//! `mirrormind chat` — Interactive chat mode in the terminal.
//!
//! Runs the same command set as the bot channels (!think, !mode, !modes)
//! against a stdin/stdout channel.

use std::sync::Arc;
use std::time::Duration;

use mirrormind_channels::{ChannelRegistry, ChatDispatcher, CliChannel};
use mirrormind_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let router = mirrormind_providers::router::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    let engine = Arc::new(mirrormind_gateway::build_engine(&config, provider)?);

    let mut registry = ChannelRegistry::new();
    registry.register(Arc::new(CliChannel::new()));
    let registry = Arc::new(registry);

    println!();
    println!("  MirrorMind — Interactive Chat");
    println!("  Model: {}", config.model);
    println!();
    println!("  Commands:");
    println!("    !think [prompt]  Generate recursive thoughts");
    println!("    !mode [mode]     Change thinking mode");
    println!("    !modes           List available modes");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let rx = registry.start_all().await?;
    let dispatcher = Arc::new(
        ChatDispatcher::new(engine, registry)
            .with_pacing(Duration::from_millis(config.chat.pacing_ms))
            .with_think_depth(config.chat.think_depth),
    );

    // Blocks until stdin closes
    dispatcher.run(rx).await;

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}
