//! `medizap serve`: start the HTTP API server.

use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🩺 Medizap API");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "   Provider:  {} ({})",
        config.default_provider,
        medizap_providers::default_model(&config)
    );
    println!("   Diseases:  {}", config.knowledge.disease_path.display());
    println!("   Drugs:     {}", config.knowledge.drug_path.display());
    println!(
        "   Auth:      {}",
        if config.gateway.bearer_tokens.is_empty() {
            "open".to_string()
        } else {
            format!("{} bearer token(s)", config.gateway.bearer_tokens.len())
        }
    );

    medizap_gateway::start(config).await?;

    Ok(())
}
