use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use pharmadocs_core::ask::DEFAULT_ASK_DELAY;

const DEFAULT_API_ADDR: &str = "127.0.0.1:3001";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_API_MAX_BODY_BYTES: usize = 1024 * 1024;
const DEFAULT_ASK_BACKEND: &str = "fixed";

#[derive(Parser, Debug)]
#[command(name = "pharmadocsd", version, about = "Pharmadocs daemon.")]
#[allow(clippy::struct_excessive_bools)]
struct CliArgs {
    #[arg(
        long,
        env = "PHARMADOCS_API_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    api_serve: bool,

    #[arg(long, env = "PHARMADOCS_API_ADDR", default_value = DEFAULT_API_ADDR)]
    api_addr: SocketAddr,

    #[arg(
        long,
        env = "PHARMADOCS_API_TIMEOUT_SECS",
        default_value_t = DEFAULT_API_TIMEOUT_SECS
    )]
    api_timeout_secs: u64,

    #[arg(
        long,
        env = "PHARMADOCS_API_MAX_BODY_BYTES",
        default_value_t = DEFAULT_API_MAX_BODY_BYTES
    )]
    api_max_body_bytes: usize,

    /// One of `fixed`, `canned` or `http`.
    #[arg(long, env = "PHARMADOCS_ASK_BACKEND", default_value = DEFAULT_ASK_BACKEND)]
    ask_backend: String,

    #[arg(long, env = "PHARMADOCS_ASK_DELAY_MS")]
    ask_delay_ms: Option<u64>,

    #[arg(long, env = "PHARMADOCS_ASK_URL")]
    ask_url: Option<String>,

    #[arg(long, env = "PHARMADOCS_SEED_PATH")]
    seed_path: Option<PathBuf>,

    #[arg(long, env = "PHARMADOCS_CURRENT_USER")]
    current_user: Option<String>,

    #[arg(
        long,
        env = "PHARMADOCS_MCP_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "PHARMADOCS_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long = "stdio",
        env = "PHARMADOCS_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(long, env = "PHARMADOCS_LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(
        long,
        env = "PHARMADOCS_NO_COLOR",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    no_color: bool,
}

/// Where `/api/ask` answers come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskBackend {
    /// One answer with two cited sources for every question.
    Fixed { delay: Duration },
    /// Exact-match question table with a fallback answer.
    Canned { delay: Duration },
    /// Another server's `/api/ask`.
    Http { base_url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AskBackendKind {
    Fixed,
    Canned,
    Http,
}

impl FromStr for AskBackendKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "canned" => Ok(Self::Canned),
            "http" => Ok(Self::Http),
            _ => Err(()),
        }
    }
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct PharmaConfig {
    pub api_serve: bool,
    pub api_addr: SocketAddr,
    pub api_timeout: Duration,
    pub api_max_body_bytes: usize,
    pub ask_backend: AskBackend,
    pub seed_path: Option<PathBuf>,
    pub current_user: Option<String>,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub enable_stdio: bool,
    pub log_level: Option<String>,
    pub no_color: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
    NothingToServe,
    Logging(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
            Self::NothingToServe => {
                write!(f, "API, MCP HTTP and stdio serving are all disabled")
            }
            Self::Logging(message) => write!(f, "failed to initialize logging: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl PharmaConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for PharmaConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if !args.api_serve && !args.mcp_serve && !args.enable_stdio {
            return Err(ConfigError::NothingToServe);
        }

        if args.api_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "PHARMADOCS_API_TIMEOUT_SECS",
                value: args.api_timeout_secs.to_string(),
            });
        }

        let kind = args
            .ask_backend
            .parse::<AskBackendKind>()
            .map_err(|()| ConfigError::InvalidSetting {
                name: "PHARMADOCS_ASK_BACKEND",
                value: args.ask_backend.clone(),
            })?;
        let delay = args.ask_delay_ms.map(Duration::from_millis);
        let ask_url = args.ask_url.filter(|value| !value.trim().is_empty());

        let ask_backend = match kind {
            AskBackendKind::Fixed => AskBackend::Fixed {
                delay: delay.unwrap_or(Duration::ZERO),
            },
            AskBackendKind::Canned => AskBackend::Canned {
                delay: delay.unwrap_or(DEFAULT_ASK_DELAY),
            },
            AskBackendKind::Http => {
                let base_url = ask_url.ok_or(ConfigError::MissingSetting("PHARMADOCS_ASK_URL"))?;
                if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                    return Err(ConfigError::InvalidSetting {
                        name: "PHARMADOCS_ASK_URL",
                        value: base_url,
                    });
                }
                AskBackend::Http { base_url }
            }
        };

        let current_user = args
            .current_user
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let log_level = args.log_level.filter(|value| !value.trim().is_empty());

        Ok(Self {
            api_serve: args.api_serve,
            api_addr: args.api_addr,
            api_timeout: Duration::from_secs(args.api_timeout_secs),
            api_max_body_bytes: args.api_max_body_bytes,
            ask_backend,
            seed_path: args.seed_path,
            current_user,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            enable_stdio: args.enable_stdio,
            log_level,
            no_color: args.no_color,
        })
    }
}
