use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "case-forms",
    version,
    about = "Dependency-driven engine for server-described case forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Case engine API root, e.g. https://host/prweb/api/v1/
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token for the case engine
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to config file (default: case-forms.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append trace events to this JSONL file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the dependency graph of a view JSON file
    Graph {
        /// View JSON file (a bare view or a {"view": ...} response)
        #[arg(long)]
        view: String,
    },

    /// Propagate one value change through a view offline
    Propagate {
        /// View JSON file
        #[arg(long)]
        view: String,

        /// Reference of the changed field
        #[arg(long)]
        reference: String,

        /// New value
        #[arg(long)]
        value: String,

        /// Option table JSON: {"<dataPageID>": {"pxResults": [...]}}
        #[arg(long)]
        options: Option<String>,
    },

    /// Load an assignment from the case engine and print its form
    Open {
        /// Assignment ID
        #[arg(long)]
        assignment: String,

        /// Case ID
        #[arg(long)]
        case: String,

        /// Action to open instead of the flow action
        #[arg(long)]
        action: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `case-forms.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Check widget validity before performing an action
    #[serde(default = "default_true")]
    pub validate_on_submit: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            validate_on_submit: true,
        }
    }
}

// Serde default helpers
fn default_true() -> bool { true }

pub const URL_ENV: &str = "CASE_FORMS_URL";
pub const TOKEN_ENV: &str = "CASE_FORMS_TOKEN";

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("case-forms.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Setting resolution (CLI > config > env)
// ============================================================================

/// First non-empty value of the CLI flag, the config entry and the
/// environment variable.
pub fn resolve_setting(cli: Option<&str>, config: Option<&str>, env_var: &str) -> Option<String> {
    cli.or(config)
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|v| !v.is_empty())
}
