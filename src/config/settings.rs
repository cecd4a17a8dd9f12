//! Configuration settings for the Marina SAT client and proxy

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Public Marina deployment used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://marina-solver-sat-rajharit77.onrender.com";

/// Environment variable overriding `solver.base_url`
pub const BASE_URL_ENV: &str = "MARINA_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub solver: SolverConfig,
    pub proxy: ProxyConfig,
    pub output: OutputConfig,
    pub interpretation: InterpretationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub bind_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub report_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationConfig {
    pub unsat_rule: UnsatRule,
}

/// How an assignment string is recognised as "no assignment exists"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UnsatRule {
    /// Only the exact sentinel `(,false)` means UNSAT
    #[default]
    Sentinel,
    /// The sentinel, or any pair whose value is `false`
    AnyFalse,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solver: SolverConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            proxy: ProxyConfig {
                bind_address: "127.0.0.1:3000".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                report_directory: PathBuf::from("output/reports"),
            },
            interpretation: InterpretationConfig {
                unsat_rule: UnsatRule::Sentinel,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!("config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.solver.base_url)
            .with_context(|| format!("Invalid solver base URL: {}", self.solver.base_url))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("Solver base URL must use http or https, got {}", url.scheme());
        }

        self.proxy.bind_address.parse::<SocketAddr>()
            .with_context(|| format!("Invalid proxy bind address: {}", self.proxy.bind_address))?;

        Ok(())
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            self.apply_base_url_override(Some(url));
        }
    }

    fn apply_base_url_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.solver.base_url = url;
        }
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        self.apply_base_url_override(cli_overrides.base_url.clone());
        if let Some(ref bind_address) = cli_overrides.bind_address {
            self.proxy.bind_address = bind_address.clone();
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(rule) = cli_overrides.unsat_rule {
            self.interpretation.unsat_rule = rule;
        }
        if let Some(ref dir) = cli_overrides.report_directory {
            self.output.report_directory = dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub bind_address: Option<String>,
    pub format: Option<OutputFormat>,
    pub unsat_rule: Option<UnsatRule>,
    pub report_directory: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.solver.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.interpretation.unsat_rule, UnsatRule::Sentinel);
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.solver.base_url = "http://localhost:8000".to_string();
        settings.output.format = OutputFormat::Json;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.solver.base_url, "http://localhost:8000");
        assert_eq!(loaded.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_yaml_uses_snake_case_enums() {
        let yaml = serde_yaml::to_string(&Settings::default()).unwrap();
        assert!(yaml.contains("unsat_rule: sentinel"));
        assert!(yaml.contains("format: text"));
    }

    #[test]
    fn test_invalid_settings() {
        let mut settings = Settings::default();
        settings.solver.base_url = "not a url".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.solver.base_url = "ftp://example.com".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.proxy.bind_address = "localhost".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = tempdir().unwrap();
        let settings = Settings::load_or_default(&temp_dir.path().join("missing.yaml")).unwrap();
        assert_eq!(settings.proxy.bind_address, "127.0.0.1:3000");
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            base_url: Some("http://127.0.0.1:9000".to_string()),
            unsat_rule: Some(UnsatRule::AnyFalse),
            ..Default::default()
        });

        assert_eq!(settings.solver.base_url, "http://127.0.0.1:9000");
        assert_eq!(settings.interpretation.unsat_rule, UnsatRule::AnyFalse);
        assert_eq!(settings.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_blank_url_override_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_base_url_override(Some("   ".to_string()));
        assert_eq!(settings.solver.base_url, DEFAULT_BASE_URL);
    }
}
