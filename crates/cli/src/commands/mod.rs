pub mod ask;
pub mod context;
pub mod doctor;
pub mod init;
pub mod lookup;
pub mod serve;
pub mod symptoms;

use medizap_config::AppConfig;
use medizap_retrieval::KnowledgeStore;
use std::path::{Path, PathBuf};

/// Load config from `path` or the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load_with(path).map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Where the config file lives for this invocation.
pub fn config_file(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

/// Read both knowledge files named in `config`.
pub async fn load_store(config: &AppConfig) -> Result<KnowledgeStore, Box<dyn std::error::Error>> {
    let disease_path = config.knowledge.disease_path.clone();
    let drug_path = config.knowledge.drug_path.clone();
    let store =
        tokio::task::spawn_blocking(move || KnowledgeStore::load(&disease_path, &drug_path))
            .await?;
    Ok(store)
}
