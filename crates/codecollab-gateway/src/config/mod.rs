//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use tracing::warn;

use codecollab_core::error::{CodeCollabError, Result};

pub use schema::{GatewayConfig, GatewaySection};

/// Default config path when none is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "codecollab.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CodeCollabError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
pub fn load_or_default(path: &str) -> Result<GatewayConfig> {
    if Path::new(path).exists() {
        return load_from_file(path);
    }
    warn!(%path, "config file not found; using defaults");
    Ok(GatewayConfig::default())
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| CodeCollabError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
