//! `medizap symptoms`: rank diseases by a comma-separated symptom list.

use std::path::Path;

use medizap_retrieval::lookup::title_case;
use medizap_retrieval::{DEFAULT_LOOKUP_LIMIT, parse_symptoms, rank_by_symptoms};

pub async fn run(config_path: Option<&Path>, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let symptoms = parse_symptoms(text);
    if symptoms.is_empty() {
        println!("Please provide some symptoms, separated by commas.");
        return Ok(());
    }

    let config = super::load_config(config_path)?;
    let store = super::load_store(&config).await?;

    let matches = rank_by_symptoms(&store, &symptoms, DEFAULT_LOOKUP_LIMIT);
    if matches.is_empty() {
        println!("No diseases found matching: {}", symptoms.join(", "));
        return Ok(());
    }

    println!("  {:<7}  DISEASE", "MATCHES");
    for m in matches {
        println!(
            "  {:<7}  {}",
            format!("{}/{}", m.match_count, symptoms.len()),
            title_case(&m.record.disease)
        );
    }

    Ok(())
}
