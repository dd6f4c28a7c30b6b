//! `mirrormind onboard` — First-time setup.

use mirrormind_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("\u{1FA9E} MirrorMind — First-Time Setup");
    println!("===============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    let journal_dir = AppConfig::default().journal.dir;
    if !journal_dir.exists() {
        std::fs::create_dir_all(&journal_dir)?;
        println!("Created journal directory: {}", journal_dir.display());
    }

    if config_path.exists() {
        println!("\nConfig already exists at: {}", config_path.display());
        println!("Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("Created config.toml at: {}", config_path.display());
        println!("\nNext steps:");
        println!("   1. Make sure Ollama is running: ollama serve");
        println!("   2. Pull the default model: ollama pull tinyllama");
        println!("   3. Run: mirrormind contemplate -p \"What is consciousness?\"");
        println!();
    }

    println!("Setup complete.\n");

    Ok(())
}
