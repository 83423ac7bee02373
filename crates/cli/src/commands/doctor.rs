//! `scribeloop doctor` — Diagnose config, provider and search health.

use scribeloop_config::{AppConfig, ConfigError};
use scribeloop_core::ProviderHealth;

pub async fn run(config: Result<AppConfig, ConfigError>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Scribeloop Doctor — System Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_path();
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults (run `scribeloop onboard`)");
    }

    let config = match config {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  1 issue found. Fix the config and re-run doctor.");
            return Err(format!("invalid config: {e}").into());
        }
    };

    match scribeloop_providers::build_from_config(&config.provider) {
        Ok(provider) => {
            let endpoint = provider.endpoint().to_string();
            match provider.health_check().await {
                Ok(ProviderHealth::Connected) => {
                    println!("  ✅ Connected to {} at {endpoint}", provider.name());
                    match provider.list_models().await {
                        Ok(models) if has_model(&models, &config.provider.model) => {
                            println!("  ✅ Model available: {}", config.provider.model);
                        }
                        Ok(_) => {
                            println!(
                                "  ⚠️  Model '{}' not found on the server",
                                config.provider.model
                            );
                            if config.provider.kind == "ollama" {
                                println!("     Run: ollama pull {}", config.provider.model);
                            }
                            issues += 1;
                        }
                        Err(e) => {
                            println!("  ⚠️  Could not list models: {e}");
                            issues += 1;
                        }
                    }
                }
                Ok(ProviderHealth::Unexpected { status_code }) => {
                    println!("  ⚠️  {endpoint} answered with status code {status_code}");
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Connection Failed: {e}");
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ Provider could not be built: {e}");
            issues += 1;
        }
    }

    match scribeloop_search::build_from_config(&config.search) {
        Ok(search) => println!("  ✅ Search backend ready: {}", search.name()),
        Err(e) => {
            println!("  ❌ Search backend unavailable: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
        return Err(format!("doctor found {issues} issue(s)").into());
    }

    Ok(())
}

/// Ollama lists untagged models with an explicit `:latest`.
fn has_model(models: &[String], wanted: &str) -> bool {
    models
        .iter()
        .any(|m| m == wanted || m.strip_suffix(":latest") == Some(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_config_fails_the_command() {
        let config = Err(ConfigError::ValidationError(
            "provider.model must not be empty".into(),
        ));
        let err = run(config).await.unwrap_err();
        assert!(err.to_string().contains("provider.model must not be empty"));
    }

    #[tokio::test]
    async fn unreachable_provider_fails_the_command() {
        let mut config = AppConfig::default();
        config.provider.base_url = Some("http://127.0.0.1:9".into());
        config.search.backend = "offline".into();

        let err = run(Ok(config)).await.unwrap_err();
        assert!(err.to_string().contains("1 issue(s)"));
    }

    #[test]
    fn matches_latest_tag() {
        let models = vec!["llama3:latest".to_string(), "deepseek-r1:8b".to_string()];
        assert!(has_model(&models, "llama3"));
        assert!(has_model(&models, "deepseek-r1:8b"));
        assert!(!has_model(&models, "deepseek-r1:14b"));
    }
}
