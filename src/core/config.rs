//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.ronin/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoninConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub responder: ResponderConfig,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_model: Option<String>,
    /// Whether the chat panel starts visible next to the editor.
    pub show_chat: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// OpenAI-compatible base URL; `/models` is appended.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ResponderConfig {
    /// Shell command that reads a prompt on stdin and writes the reply to stdout.
    pub command: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelEntry {
    pub name: String,
    pub description: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values where a default exists)
// ============================================================================

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub file: Option<PathBuf>,
    pub project: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: Option<String>,
    pub show_chat: bool,
    pub catalog_url: Option<String>,
    pub catalog_api_key: Option<String>,
    pub responder_command: Option<String>,
    pub models: Vec<String>,
    pub file: Option<PathBuf>,
    pub project_root: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.ronin/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".ronin").join("config.toml"))
}

/// Load config from `~/.ronin/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RoninConfig::default()`.
pub fn load_config() -> Result<RoninConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(RoninConfig::default());
    };
    load_config_from(&path)
}

/// Load config from an explicit path, generating the default file if absent.
pub fn load_config_from(path: &Path) -> Result<RoninConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(RoninConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RoninConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG: &str = r#"# Ronin Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_model = "qwen2.5-coder-32b"   # Or set RONIN_MODEL
# show_chat = true

# [catalog]
# base_url = "http://localhost:1234/v1" # Or set RONIN_CATALOG_URL
# api_key = "sk-..."                    # Or set RONIN_CATALOG_API_KEY

# [responder]
# Reads the prompt on stdin, writes the reply to stdout.
# The selected model is exported as RONIN_MODEL.
# command = "llm -m \"$RONIN_MODEL\""   # Or set RONIN_RESPONDER

# [[models]]
# name = "qwen2.5-coder-32b"
# description = "Local coding model"
"#;

fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RoninConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &RoninConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Model: CLI → env → config
    let model_name = cli
        .model
        .clone()
        .or_else(|| env("RONIN_MODEL"))
        .or_else(|| config.general.default_model.clone());

    let catalog_url = env("RONIN_CATALOG_URL").or_else(|| config.catalog.base_url.clone());
    let catalog_api_key =
        env("RONIN_CATALOG_API_KEY").or_else(|| config.catalog.api_key.clone());
    let responder_command = env("RONIN_RESPONDER").or_else(|| config.responder.command.clone());

    // Project root: CLI → parent of --file → current directory
    let project_root = cli
        .project
        .clone()
        .or_else(|| {
            cli.file
                .as_ref()
                .and_then(|f| f.parent())
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    ResolvedConfig {
        model_name,
        show_chat: config.general.show_chat.unwrap_or(true),
        catalog_url,
        catalog_api_key,
        responder_command,
        models: config.models.iter().map(|m| m.name.clone()).collect(),
        file: cli.file.clone(),
        project_root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = RoninConfig::default();
        assert!(config.models.is_empty());
        assert!(config.general.default_model.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&RoninConfig::default(), &CliOverrides::default(), no_env);
        assert!(resolved.model_name.is_none());
        assert!(resolved.show_chat);
        assert!(resolved.catalog_url.is_none());
        assert!(resolved.responder_command.is_none());
    }

    #[test]
    fn test_resolve_precedence_cli_env_file() {
        let config = RoninConfig {
            general: GeneralConfig {
                default_model: Some("from-file".to_string()),
                show_chat: Some(false),
            },
            ..Default::default()
        };
        let env = |key: &str| (key == "RONIN_MODEL").then(|| "from-env".to_string());

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.model_name.as_deref(), Some("from-env"));
        assert!(!resolved.show_chat);

        let cli = CliOverrides {
            model: Some("from-cli".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.model_name.as_deref(), Some("from-cli"));
    }

    #[test]
    fn test_env_overrides_responder_and_catalog() {
        let config = RoninConfig {
            catalog: CatalogConfig {
                base_url: Some("http://file".to_string()),
                api_key: None,
            },
            responder: ResponderConfig {
                command: Some("cat".to_string()),
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "RONIN_CATALOG_URL" => Some("http://env".to_string()),
            "RONIN_RESPONDER" => Some("llm".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.catalog_url.as_deref(), Some("http://env"));
        assert_eq!(resolved.responder_command.as_deref(), Some("llm"));
    }

    #[test]
    fn test_project_root_from_file_parent() {
        let cli = CliOverrides {
            file: Some(PathBuf::from("/work/app/src/main.rs")),
            ..Default::default()
        };
        let resolved = resolve_with_env(&RoninConfig::default(), &cli, no_env);
        assert_eq!(resolved.project_root, PathBuf::from("/work/app/src"));
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
default_model = "qwen"
show_chat = false

[catalog]
base_url = "http://localhost:1234/v1"

[responder]
command = "llm"

[[models]]
name = "qwen"
description = "Local"

[[models]]
name = "gpt"
"#;
        let config: RoninConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_model.as_deref(), Some("qwen"));
        assert_eq!(config.responder.command.as_deref(), Some("llm"));
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[1].description, None);
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.models.is_empty());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Ronin Configuration"));
        // Everything is commented out, so it parses back to defaults
        let reparsed: RoninConfig = toml::from_str(&written).unwrap();
        assert!(reparsed.general.default_model.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
