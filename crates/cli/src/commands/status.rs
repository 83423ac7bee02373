//! `scribeloop status` — Show the effective configuration.

use scribeloop_config::AppConfig;

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("📝 Scribeloop Status");
    println!("====================");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Provider:       {}", config.provider.kind);
    println!("  Endpoint:       {}", config.provider.effective_base_url());
    println!("  Model:          {}", config.provider.model);
    println!("  Temperature:    {}", config.provider.temperature);
    println!("  Timeout:        {}s", config.provider.request_timeout_secs);
    println!("  Search:         {} (max {} results)", config.search.backend, config.search.max_results);
    println!("  Max revisions:  {}", config.pipeline.max_revisions);
    println!("  Approval mode:  {}", config.pipeline.approval_mode.as_str());
    println!("  Gateway:        {}:{}", config.gateway.host, config.gateway.port);

    if AppConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, using defaults (run `scribeloop onboard`)");
    }

    Ok(())
}
