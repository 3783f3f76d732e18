use std::path::Path;

use anyhow::Context;

use crate::foundation::error::WorkbenchResult;
use crate::host::WindowOptions;
use crate::persist::DEFAULT_ORDERS_KEY;

/// Session configuration. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Panel options passed to the host on startup.
    pub window: WindowOptions,
    /// Client storage key holding saved orders.
    pub storage_key: String,
    /// Timeout for transient error notifications.
    pub error_timeout_ms: u64,
    /// Seed for trait randomization; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Raster preview canvas.
    pub preview: PreviewSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PreviewSize {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            window: WindowOptions::default(),
            storage_key: DEFAULT_ORDERS_KEY.to_string(),
            error_timeout_ms: 2000,
            seed: None,
            preview: PreviewSize::default(),
        }
    }
}

impl WorkbenchConfig {
    pub fn from_json_file(path: &Path) -> WorkbenchResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
