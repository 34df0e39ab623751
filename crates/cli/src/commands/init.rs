//! `medizap init`: first-time setup.

use std::path::Path;

use medizap_config::AppConfig;

pub async fn run(
    config_path: Option<&Path>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = super::config_file(config_path);

    println!("🩺 Medizap: First-Time Setup");
    println!("============================\n");

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        } else {
            println!("  Config directory exists: {}", dir.display());
        }
    }

    if config_path.exists() && !force {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or re-run with --force to overwrite.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote config.toml at: {}", config_path.display());

    let defaults = AppConfig::default();
    println!("\n📝 Next steps:");
    println!(
        "   1. Point [knowledge] at your data (default: {} and {})",
        defaults.knowledge.disease_path.display(),
        defaults.knowledge.drug_path.display()
    );
    println!(
        "   2. Start a completion server for `{}` (llama.cpp listens on :8080)",
        defaults.default_model
    );
    println!("   3. Run: medizap doctor\n");

    Ok(())
}
