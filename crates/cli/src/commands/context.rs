//! `medizap context`: show what retrieval finds for a question.

use std::path::Path;

use medizap_retrieval::{CandidateKind, Retriever, Tokenizer};

pub async fn run(
    config_path: Option<&Path>,
    query: &str,
    show_prompt: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let store = super::load_store(&config).await?;

    let retriever = Retriever::new(
        Tokenizer::new(config.retrieval.min_keyword_len),
        config.retrieval.top_n,
    );
    let (retrieval, prompt) = retriever.prompt(&store, query);

    println!("🔎 Keywords: {}", display_list(&retrieval.keywords));
    println!();

    if retrieval.candidates.is_empty() {
        println!("  No matching records.");
    } else {
        println!("  {:<6}  {:<8}  NAME", "SCORE", "KIND");
        for candidate in &retrieval.candidates {
            let kind = match candidate.kind {
                CandidateKind::Disease => "disease",
                CandidateKind::Drug => "drug",
            };
            println!("  {:<6}  {:<8}  {}", candidate.score, kind, candidate.name);
        }
    }

    println!();
    println!("── Context ─────────────────────────────────────");
    println!("{}", retrieval.context);

    if show_prompt {
        println!();
        println!("── Prompt ──────────────────────────────────────");
        println!("{prompt}");
    }

    Ok(())
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
