//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.vitrine/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::core::state::SurfacePreference;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VitrineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub site_name: Option<String>,
    pub surface: Option<SurfacePreference>,
    /// Terminal width (columns) at which the wide surface takes over.
    pub breakpoint: Option<u16>,
    pub nav_path: Option<String>,
    pub fragments_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Grace delay before a pointer-leave closes the dropdown.
    pub close_delay_ms: Option<u64>,
    /// Debounce for viewport-resize surface relocation.
    pub resize_debounce_ms: Option<u64>,
    /// Cadence of the narrow surface's readiness wait.
    pub ready_poll_ms: Option<u64>,
    /// Upper bound on the readiness wait before giving up.
    pub ready_timeout_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SITE_NAME: &str = "Storefront";
pub const DEFAULT_BREAKPOINT: u16 = 100;
pub const DEFAULT_NAV_PATH: &str = "demos/nav.md";
pub const DEFAULT_FRAGMENTS_DIR: &str = "demos/fragments";
pub const DEFAULT_CLOSE_DELAY_MS: u64 = 100;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 150;
pub const DEFAULT_READY_POLL_MS: u64 = 50;
pub const DEFAULT_READY_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub site_name: String,
    pub surface: SurfacePreference,
    pub breakpoint: u16,
    pub nav_path: PathBuf,
    pub fragments_dir: PathBuf,
    pub close_delay_ms: u64,
    pub resize_debounce_ms: u64,
    pub ready_poll_ms: u64,
    pub ready_timeout_ms: u64,
}

/// CLI flags that participate in resolution (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub nav_path: Option<PathBuf>,
    pub fragments_dir: Option<PathBuf>,
    pub surface: Option<SurfacePreference>,
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

/// Returns the path to `~/.vitrine/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".vitrine").join("config.toml"))
}

/// Load config from `~/.vitrine/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `VitrineConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<VitrineConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(VitrineConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(VitrineConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: VitrineConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Vitrine Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# site_name = "Storefront"
# surface = "auto"            # "auto", "wide", or "narrow"
# breakpoint = 100            # columns; wide surface at or above this width
# nav_path = "demos/nav.md"
# fragments_dir = "demos/fragments"

# [timing]
# close_delay_ms = 100        # dropdown leave grace delay
# resize_debounce_ms = 150    # surface relocation debounce
# ready_poll_ms = 50          # narrow-surface readiness cadence
# ready_timeout_ms = 5000     # readiness wait upper bound
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

/// Resolve the final config by collapsing: defaults → config file → env
/// vars → CLI flags.
pub fn resolve(config: &VitrineConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Surface: CLI → config → default (no env var; it's an interactive choice)
    let surface = cli
        .surface
        .or(config.general.surface)
        .unwrap_or_default();

    // Nav document: CLI → env → config → default
    let nav_path = cli
        .nav_path
        .clone()
        .or_else(|| std::env::var("VITRINE_NAV").ok().map(PathBuf::from))
        .or_else(|| config.general.nav_path.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_NAV_PATH));

    // Fragments directory: CLI → env → config → default
    let fragments_dir = cli
        .fragments_dir
        .clone()
        .or_else(|| std::env::var("VITRINE_FRAGMENTS").ok().map(PathBuf::from))
        .or_else(|| config.general.fragments_dir.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FRAGMENTS_DIR));

    ResolvedConfig {
        site_name: config
            .general
            .site_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
        surface,
        breakpoint: config.general.breakpoint.unwrap_or(DEFAULT_BREAKPOINT),
        nav_path,
        fragments_dir,
        close_delay_ms: config.timing.close_delay_ms.unwrap_or(DEFAULT_CLOSE_DELAY_MS),
        resize_debounce_ms: config
            .timing
            .resize_debounce_ms
            .unwrap_or(DEFAULT_RESIZE_DEBOUNCE_MS),
        ready_poll_ms: config.timing.ready_poll_ms.unwrap_or(DEFAULT_READY_POLL_MS),
        ready_timeout_ms: config
            .timing
            .ready_timeout_ms
            .unwrap_or(DEFAULT_READY_TIMEOUT_MS),
    }
}
