use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use birrcheck_verify::{VerifierConfig, DEFAULT_BASE_URL, SUCCESS_MARKER};

use crate::cli::Cli;

/// Settings the driver needs beyond what the CLI carries. Loaded from an
/// optional TOML file; CLI flags win over file values, file values win over
/// defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub base_url: String,
    pub success_marker: String,
    pub timeout_secs: u64,
    /// Tesseract data directory, used when built with the `tesseract` feature.
    pub tessdata: Option<String>,
    /// Recognition language passed to the OCR engine.
    pub lang: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            success_marker: SUCCESS_MARKER.to_string(),
            timeout_secs: 10,
            tessdata: None,
            lang: "eng".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config file {}", p.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("parsing config file {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(marker) = &cli.marker {
            self.success_marker = marker.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = secs;
        }
    }

    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig {
            base_url: self.base_url.clone(),
            success_marker: self.success_marker.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
