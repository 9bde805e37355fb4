//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{RecError, Result};

/// Default number of recommendations per strategy.
pub const DEFAULT_LIMIT: usize = 20;

/// Ranked collaborative candidates examined before category filtering.
pub const DEFAULT_SCAN_WINDOW: usize = 99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum content-based results.
    pub content_limit: usize,

    /// Maximum collaborative results, applied after category filtering.
    pub collaborative_limit: usize,

    /// How far past the self-match the collaborative scan reaches.
    pub scan_window: usize,

    /// Run both strategies concurrently on the rayon pool.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_limit: DEFAULT_LIMIT,
            collaborative_limit: DEFAULT_LIMIT,
            scan_window: DEFAULT_SCAN_WINDOW,
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RecError::FileNotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan_window < self.collaborative_limit {
            return Err(RecError::Config(format!(
                "scan_window ({}) must be at least collaborative_limit ({})",
                self.scan_window, self.collaborative_limit
            )));
        }
        Ok(())
    }

    /// Use the same limit for both strategies.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.content_limit = limit;
        self.collaborative_limit = limit;
        self
    }
}
