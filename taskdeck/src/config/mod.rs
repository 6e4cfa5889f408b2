//! Configuration system for the `Taskdeck` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskdeck/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use taskdeck_proto::task::{Priority, Status};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    board: BoardFileConfig,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    url: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// `[board]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardFileConfig {
    due_format: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the task board API.
    pub api_url: String,
    /// Timeout for establishing an HTTP connection.
    pub connect_timeout: Duration,
    /// Timeout for a whole request/response exchange.
    pub request_timeout: Duration,
    /// Due date display format string (chrono).
    pub due_format: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:4000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            due_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. If no `--config` is given, the default path
    /// (`~/.config/taskdeck/config.toml`) is tried and silently ignored
    /// if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. This is separated from `load()` to
    /// enable unit testing without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            api_url: cli
                .api_url
                .clone()
                .or_else(|| file.api.url.clone())
                .unwrap_or(defaults.api_url),
            connect_timeout: file
                .api
                .connect_timeout_secs
                .map_or(defaults.connect_timeout, Duration::from_secs),
            request_timeout: file
                .api
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            due_format: file
                .board
                .due_format
                .clone()
                .unwrap_or(defaults.due_format),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug)]
#[command(version, about = "Shared task board client")]
pub struct CliArgs {
    /// Base URL of the task board API.
    #[arg(long, env = "TASKDECK_API_URL")]
    pub api_url: Option<String>,

    /// Account email to sign in with.
    #[arg(long, env = "TASKDECK_EMAIL")]
    pub email: String,

    /// Account password.
    #[arg(long, env = "TASKDECK_PASSWORD")]
    pub password: String,

    /// Create the account before signing in.
    #[arg(long)]
    pub sign_up: bool,

    /// Path to config file (default: `~/.config/taskdeck/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    pub log_level: String,

    /// Path to log file (default: stderr).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Board operations exposed on the command line.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Show the board grouped by status column.
    Board {
        /// Only show tasks assigned to this user id.
        #[arg(long)]
        assignee: Option<String>,

        /// Only show tasks with this priority.
        #[arg(long)]
        priority: Option<Priority>,
    },

    /// List known users.
    Users,

    /// Create a task.
    Create {
        /// Task title.
        #[arg(long)]
        title: String,

        /// Task description.
        #[arg(long)]
        description: String,

        /// Task priority.
        #[arg(long, default_value = "MEDIUM")]
        priority: Priority,

        /// Assignee user id.
        #[arg(long)]
        assignee: Option<String>,

        /// Due instant (RFC 3339 or `YYYY-MM-DDTHH:MM`, treated as UTC).
        #[arg(long)]
        due: String,
    },

    /// Move a task to a new status.
    Move {
        /// Task id.
        id: String,

        /// Target status.
        status: Status,
    },

    /// Show one task with its comment thread.
    Show {
        /// Task id.
        id: String,
    },

    /// Comment on a task.
    Comment {
        /// Task id.
        id: String,

        /// Comment body.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and a missing
/// file is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir available — use defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskdeck").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
