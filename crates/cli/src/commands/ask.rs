//! `medizap ask`: one question, or an interactive session.

use std::path::Path;

use medizap_agent::{DISCLAIMER, MedicalAssistant};
use medizap_retrieval::KnowledgeStore;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    config_path: Option<&Path>,
    query: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = super::load_store(&config).await?;

    let router = medizap_providers::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;
    let model = medizap_providers::default_model(&config);
    let assistant = MedicalAssistant::from_config(provider, &model, &config);
    tracing::debug!(
        provider = %assistant.provider_name(),
        model = %assistant.model(),
        "Assistant ready"
    );

    if store.is_empty() {
        eprintln!("  ⚠️  Knowledge base is empty; answers will not be grounded in any records.");
        eprintln!("     Check [knowledge] paths in {}", super::config_file(config_path).display());
    }

    match query {
        Some(q) => {
            eprint!("  Thinking...");
            let answer = assistant.answer(&store, &q).await;
            eprint!("\r              \r");
            println!("{}", answer?.text);
            println!();
            println!("{DISCLAIMER}");
        }
        None => interactive(&assistant, &store, &config.default_provider, &model).await?,
    }

    Ok(())
}

async fn interactive(
    assistant: &MedicalAssistant,
    store: &KnowledgeStore,
    provider: &str,
    model: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = store.stats();

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        Medizap Assistant: Interactive        ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {provider}");
    println!("  Model:     {model}");
    println!("  Knowledge: {} diseases, {} drugs", stats.diseases, stats.drugs);
    println!();
    println!("  Describe your symptoms or ask about a medicine.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();
    println!("  {DISCLAIMER}");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "exit" || line == "quit" {
            break;
        }

        eprint!("  ...");
        match assistant.answer(store, line).await {
            Ok(answer) => {
                eprint!("\r     \r");
                println!();
                for text_line in answer.text.lines() {
                    println!("  Medizap > {text_line}");
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Take care! 👋");
    println!();

    Ok(())
}
