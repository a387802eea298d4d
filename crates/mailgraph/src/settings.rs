//! Network configuration loading.

use std::path::{Path, PathBuf};

use anyhow::Context;
use mailgraph_core::NetworkConfig;

/// Default location of the network description.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailgraph")
        .join("network.json")
}

/// Loads the network description.
///
/// An explicit path must exist. Without one, the default location is tried
/// and the built-in demo network is used if nothing is there.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<NetworkConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_path();
            if !path.exists() {
                tracing::info!("No configuration at {:?}, using demo network", path);
                return Ok(NetworkConfig::demo());
            }
            path
        }
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("reading configuration {}", path.display()))?;
    let config = NetworkConfig::from_json(&contents)
        .with_context(|| format!("parsing configuration {}", path.display()))?;

    tracing::info!("Loaded configuration from {:?}", path);
    Ok(config)
}
