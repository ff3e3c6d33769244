use anyhow::{Context, Result};
use db::DbConnConfig;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration with strongly-typed global sections
/// and a flexible per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Core server configuration.
    pub server: ServerConfig,
    /// Database connection (optional; `--mock` runs without one).
    pub database: Option<DbConnConfig>,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base directory for relative log paths; normalized to an absolute path on load.
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub timeout_sec: u64,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // "logs/api.log"
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Empty => $HOME/.users-api
            home_dir: String::new(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            timeout_sec: 0,
        }
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/users-server.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: None,
            logging: Some(default_logging_config()),
            modules: HashMap::new(),
        }
    }
}

/// Legacy variables of the original deployment: plain strings, copied verbatim.
const LEGACY_STRING_VARS: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.dbname"),
    ("HOST", "server.host"),
];

/// Legacy port variables.
const LEGACY_PORT_VARS: &[(&str, &str)] = &[("DB_PORT", "database.port"), ("PORT", "server.port")];

impl AppConfig {
    /// Load configuration with layered loading:
    /// defaults → YAML file → legacy env (`DB_*`, `PORT`, `HOST`) → `APP__*` env.
    /// Also normalizes `server.home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        // Optional sections stay None unless YAML/ENV provide them.
        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };

        let mut figment = Figment::new().merge(Serialized::defaults(base));
        if let Some(path) = config_path {
            let path = path.as_ref();
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let figment = merge_legacy_env(figment)?
            // Example: APP__SERVER__PORT=8087 maps to server.port
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .context("Failed to extract config from figment")?;

        normalize_home_dir_inplace(&mut config.server)
            .context("Failed to resolve server.home_dir")?;

        Ok(config)
    }

    /// Deserialize `modules.<name>`; a missing section yields `T::default()`.
    pub fn module_config<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        match self.modules.get(name) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid configuration for module '{name}'")),
            None => Ok(T::default()),
        }
    }

    /// Serialize configuration to YAML with credentials masked.
    pub fn to_yaml(&self) -> Result<String> {
        let printable = AppConfig {
            database: self.database.as_ref().map(DbConnConfig::redacted),
            ..self.clone()
        };
        serde_yaml::to_string(&printable).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        // Set logging level based on verbose flags for "default" section.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }
}

/// Command line switches that affect configuration or startup.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub verbose: u8,
    /// Use in-memory SQLite instead of the configured database.
    pub mock: bool,
}

fn merge_legacy_env(mut figment: Figment) -> Result<Figment> {
    for (var, key) in LEGACY_STRING_VARS {
        if let Ok(value) = std::env::var(var) {
            figment = figment.merge(Serialized::default(key, value));
        }
    }
    for (var, key) in LEGACY_PORT_VARS {
        if let Ok(value) = std::env::var(var) {
            let port: u16 = value
                .trim()
                .parse()
                .with_context(|| format!("{var} must be a port number, got '{value}'"))?;
            figment = figment.merge(Serialized::default(key, port));
        }
    }
    Ok(figment)
}

const DEFAULT_SUBDIR: &str = ".users-api";

/// Normalize `server.home_dir` (empty, `~/...`, relative) into an absolute, existing directory.
fn normalize_home_dir_inplace(server: &mut ServerConfig) -> Result<()> {
    let raw = server.home_dir.trim();
    let user_home = || -> Result<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .context("HOME is not set")
    };

    let resolved = if raw.is_empty() {
        user_home()?.join(DEFAULT_SUBDIR)
    } else if raw == "~" {
        user_home()?
    } else if let Some(rest) = raw.strip_prefix("~/") {
        user_home()?.join(rest)
    } else {
        let p = PathBuf::from(raw);
        if p.is_absolute() {
            p
        } else {
            std::env::current_dir()?.join(p)
        }
    };

    std::fs::create_dir_all(&resolved)
        .with_context(|| format!("Cannot create home_dir {}", resolved.display()))?;
    server.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}
