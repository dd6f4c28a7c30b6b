//! `mirrormind status` — Show resolved configuration and provider health.

use mirrormind_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("\u{1FA9E} MirrorMind Status");
    println!("==================");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Provider:       {}", config.provider);
    println!("  Model:          {}", config.model);
    println!("  Journal dir:    {}", config.journal.dir.display());
    println!("  Default depth:  {}", config.engine.default_depth);
    println!("  Max depth:      {}", config.engine.max_depth);
    println!("  Failure policy: {}", config.engine.failure_policy);
    println!(
        "  Gateway:        {}:{}",
        config.gateway.host, config.gateway.port
    );

    let enabled_channels: Vec<&str> = config
        .channels
        .iter()
        .filter(|(_, c)| c.enabled)
        .map(|(name, _)| name.as_str())
        .collect();
    println!(
        "  Channels:       {}",
        if enabled_channels.is_empty() {
            "none".to_string()
        } else {
            enabled_channels.join(", ")
        }
    );

    // Probe the provider endpoint
    let router = mirrormind_providers::router::build_from_config(&config);
    if let Some(provider) = router.default() {
        match provider.health_check().await {
            Ok(true) => println!("\n  Provider reachable"),
            Ok(false) => println!("\n  Provider responded with an error"),
            Err(e) => println!("\n  Provider unreachable: {e}"),
        }
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  Config file found");
    } else {
        println!("  No config file — run `mirrormind onboard` first");
    }

    Ok(())
}
