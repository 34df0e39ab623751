//! `medizap lookup`: find diseases by name, no model involved.

use std::path::Path;

use medizap_retrieval::lookup::{capitalize, title_case};
use medizap_retrieval::{DEFAULT_LOOKUP_LIMIT, lookup_diseases};

pub async fn run(config_path: Option<&Path>, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = super::load_store(&config).await?;

    let found = lookup_diseases(&store, name, DEFAULT_LOOKUP_LIMIT);
    if found.is_empty() {
        println!("No information found for '{}'.", name.trim());
        return Ok(());
    }

    println!("Found information related to '{}':", name.trim());
    for disease in found {
        println!();
        println!("  {}", title_case(&disease.disease));
        if !disease.description.is_empty() {
            println!("    Description: {}", capitalize(&disease.description));
        }
        if !disease.symptoms.is_empty() {
            println!("    Symptoms:    {}", capitalize(&disease.symptoms.join(", ")));
        }
        if !disease.medicines.is_empty() {
            println!("    Medicines:   {}", capitalize(&disease.medicines.join(", ")));
        }
    }

    Ok(())
}
