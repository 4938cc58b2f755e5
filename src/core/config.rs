//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.qcalc/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The VM itself is described by a separate JSON file (see `launcher::settings`)
//! because the in-app editor rewrites it.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::engine::Operator;
use crate::core::trigger::{TriggerPattern, Triggers};
use crate::launcher::paths;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QcalcConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub triggers: TriggersConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub decimal_separator: Option<String>,
    pub vm_settings_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TriggersConfig {
    pub launch: Option<TriggerPattern>,
    pub settings: Option<TriggerPattern>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DECIMAL_SEPARATOR: &str = ".";
pub const DEFAULT_VM_SETTINGS_FILE: &str = "vm.json";

pub const DEFAULT_LAUNCH_TRIGGER: TriggerPattern = TriggerPattern {
    left: 1337.0,
    right: 42.0,
    operator: Operator::Add,
};

pub const DEFAULT_SETTINGS_TRIGGER: TriggerPattern = TriggerPattern {
    left: 1337.0,
    right: 42.0,
    operator: Operator::Subtract,
};

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub decimal_separator: String,
    pub vm_settings_path: PathBuf,
    pub triggers: Triggers,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub decimal_separator: Option<&'a str>,
    pub vm_settings: Option<&'a Path>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.qcalc/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".qcalc"))
}

/// Returns the path to `~/.qcalc/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.qcalc/config.toml`.
pub fn load_config() -> Result<QcalcConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(QcalcConfig::default())
        }
    }
}

/// Load config from an explicit path.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `QcalcConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<QcalcConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(QcalcConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: QcalcConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# qcalc Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# decimal_separator = "."            # Or set QCALC_DECIMAL_SEPARATOR
# vm_settings_file = "vm.json"       # Relative to ~/.qcalc/, or QCALC_VM_SETTINGS

# Evaluating `left operator right =` fires the trigger.
# Operators: "add", "subtract", "multiply", "divide".

# [triggers.launch]                  # Boots the virtual machine
# left = 1337
# right = 42
# operator = "add"

# [triggers.settings]                # Opens the VM settings editor
# left = 1337
# right = 42
# operator = "subtract"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &QcalcConfig, cli: CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &QcalcConfig,
    cli: CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Separator: CLI → env → config → default
    let requested_separator = cli
        .decimal_separator
        .map(|s| s.to_string())
        .or_else(|| env("QCALC_DECIMAL_SEPARATOR"))
        .or_else(|| config.general.decimal_separator.clone());
    let decimal_separator = match requested_separator {
        Some(sep) if is_valid_separator(&sep) => sep,
        Some(sep) => {
            warn!(
                "Invalid decimal separator '{}', using '{}'",
                sep, DEFAULT_DECIMAL_SEPARATOR
            );
            DEFAULT_DECIMAL_SEPARATOR.to_string()
        }
        None => DEFAULT_DECIMAL_SEPARATOR.to_string(),
    };

    // VM settings: CLI → env → config (relative to ~/.qcalc/) → default
    let base_dir = config_dir().unwrap_or_default();
    let vm_settings_path = cli
        .vm_settings
        .map(Path::to_path_buf)
        .or_else(|| env("QCALC_VM_SETTINGS").map(|p| paths::expand_home(&p)))
        .unwrap_or_else(|| {
            let file = config
                .general
                .vm_settings_file
                .as_deref()
                .unwrap_or(DEFAULT_VM_SETTINGS_FILE);
            paths::resolve_path(file, &base_dir)
        });

    let triggers = Triggers {
        launch: Some(config.triggers.launch.unwrap_or(DEFAULT_LAUNCH_TRIGGER)),
        settings: Some(config.triggers.settings.unwrap_or(DEFAULT_SETTINGS_TRIGGER)),
    };

    ResolvedConfig {
        decimal_separator,
        vm_settings_path,
        triggers,
    }
}

/// Characters the calculator keymap already binds to an operation.
const KEY_BOUND_CHARS: &[char] = &['+', '-', '*', 'x', 'X', '/', '=', '%', 's', 'r', 'q', 'n'];

/// A separator is one character that cannot be confused with a digit,
/// a sign or an exponent marker, and is not a calculator key.
pub fn is_valid_separator(sep: &str) -> bool {
    let mut chars = sep.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            !c.is_ascii_digit()
                && !c.is_whitespace()
                && !matches!(c, 'e' | 'E')
                && !KEY_BOUND_CHARS.contains(&c)
        }
        _ => false,
    }
}
