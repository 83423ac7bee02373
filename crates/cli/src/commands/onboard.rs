//! `scribeloop onboard` — First-time setup.

use scribeloop_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("📝 Scribeloop — First-Time Setup");
    println!("================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    let defaults = AppConfig::default();
    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());

    println!("\n📝 Next steps:");
    println!("   1. Start Ollama and pull the model: ollama pull {}", defaults.provider.model);
    println!("   2. Check the setup:  scribeloop doctor");
    println!("   3. Write a post:     scribeloop run --topic \"Solar Power\"");
    println!("   4. Or open the UI:   scribeloop serve\n");

    Ok(())
}
