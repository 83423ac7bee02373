//! `scribeloop serve` — Start the HTTP gateway and front end.

use scribeloop_config::AppConfig;

pub async fn run(mut config: AppConfig, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config.gateway.port = port;
    }

    println!("📝 Scribeloop Gateway");
    println!("   Open:     http://{}:{}/", config.gateway.host, config.gateway.port);
    println!("   Provider: {} ({})", config.provider.kind, config.provider.effective_base_url());
    println!("   Model:    {}", config.provider.model);
    println!("   Search:   {}\n", config.search.backend);

    scribeloop_gateway::start(config).await
}
