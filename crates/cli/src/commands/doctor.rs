//! `medizap doctor`: diagnose config, knowledge files, and provider.

use std::path::Path;

use medizap_core::record::{DiseaseRecord, DrugRecord};
use medizap_retrieval::store::load_records;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Medizap Doctor: System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    // Config
    let file = super::config_file(config_path);
    if !file.exists() {
        println!("  ⚠️  No config file at {}, using defaults (run `medizap init`)", file.display());
        issues += 1;
    }
    let config = match super::load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ {e}");
            println!("\n  ⚠️  Fix the config file and re-run doctor.");
            return Ok(());
        }
    };

    // Knowledge base
    match load_records::<DiseaseRecord>(&config.knowledge.disease_path) {
        Ok(records) => {
            let valid = records.iter().filter(|r| r.is_valid()).count();
            println!(
                "  ✅ Disease knowledge: {valid} records ({})",
                config.knowledge.disease_path.display()
            );
            if valid < records.len() {
                println!(
                    "  ⚠️  {} disease records have no name and will be skipped",
                    records.len() - valid
                );
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    match load_records::<DrugRecord>(&config.knowledge.drug_path) {
        Ok(records) => {
            let valid = records.iter().filter(|r| r.is_valid()).count();
            println!(
                "  ✅ Drug knowledge: {valid} records ({})",
                config.knowledge.drug_path.display()
            );
            if valid < records.len() {
                println!(
                    "  ⚠️  {} drug records have no name and will be skipped",
                    records.len() - valid
                );
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    // Provider
    let router = medizap_providers::build_from_config(&config);
    match router.default() {
        Some(provider) => match provider.health_check().await {
            Ok(true) => println!(
                "  ✅ Provider `{}` reachable (model: {})",
                provider.name(),
                medizap_providers::default_model(&config)
            ),
            Ok(false) => {
                println!("  ⚠️  Provider `{}` answered but reported unhealthy", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider `{}` unreachable: {e}", provider.name());
                issues += 1;
            }
        },
        None => {
            println!("  ❌ No default provider configured");
            issues += 1;
        }
    }

    // Gateway
    if config.gateway.bearer_tokens.is_empty() {
        println!("  ⚠️  No bearer tokens configured, the API is open to any caller");
    } else {
        println!("  ✅ {} bearer token(s) configured", config.gateway.bearer_tokens.len());
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
