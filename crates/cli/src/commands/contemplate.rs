//! `mirrormind contemplate` — One-shot recursion from the terminal.

use std::sync::Arc;

use mirrormind_config::AppConfig;
use mirrormind_core::mode::RecursionMode;

pub async fn run(
    prompt: String,
    depth: Option<u32>,
    mode: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let mode: RecursionMode = mode
        .parse()
        .map_err(|e| format!("{e} (try `mirrormind modes`)"))?;
    let depth = depth.unwrap_or(config.engine.default_depth);

    let router = mirrormind_providers::router::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    let engine = Arc::new(mirrormind_gateway::build_engine(&config, provider)?);

    println!();
    println!("  Mode:  {} (temperature {})", mode, mode.temperature());
    println!("  Model: {}", config.model);
    println!("  Seed:  {prompt}");
    println!();

    let records = engine.contemplate(&prompt, depth, mode).await?;

    for record in &records {
        println!("── Depth {} ─────────────────────────────", record.depth);
        println!("{}", record.output);
        println!();
    }

    Ok(())
}
