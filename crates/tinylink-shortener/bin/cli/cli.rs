use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::{Display, Formatter};
use tinylink_core::codec::DEFAULT_ALPHABET;

pub const ALPHABET_ENV: &str = "TINYLINK_ALPHABET";
pub const SALT_ENV: &str = "TINYLINK_SALT";
pub const PADDING_ENV: &str = "TINYLINK_PADDING";
pub const STORAGE_BACKEND_ENV: &str = "TINYLINK_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "TINYLINK_MYSQL_DSN";
pub const HOSTNAME_ENV: &str = "TINYLINK_HOSTNAME";
pub const LOG_FORMAT_ENV: &str = "TINYLINK_LOG_FORMAT";

pub const DEFAULT_HOSTNAME: &str = "http://localhost";
pub const DEFAULT_PADDING: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

/// How the short URLs of a `shorten` call are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Xml,
    Html,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL, optionally under a vanity alias.
    Shorten {
        url: String,
        #[arg(long)]
        vanity: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Resolve a token or vanity alias and print the original URL.
    Resolve { candidate: String },
    /// Point an existing record at a new URL.
    Edit {
        id: u64,
        url: String,
        #[arg(long)]
        vanity: Option<String>,
    },
    /// Print every stored record as JSON.
    List,
    /// Print the token of an id.
    Encode { id: u64 },
    /// Print the id behind a token.
    Decode { token: String },
    /// Run commands from stdin, one per line, against a single store.
    ///
    /// Arguments are split on whitespace. Blank lines and lines starting
    /// with `#` are skipped.
    Batch,
}

/// One line of a `batch` session.
#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub struct BatchLine {
    #[command(subcommand)]
    pub command: Command,
}

impl BatchLine {
    /// Parses a batch line. Returns `None` for blank lines and comments.
    pub fn parse_line(line: &str) -> Result<Option<Command>, clap::Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let parsed = Self::try_parse_from(line.split_whitespace())?;
        Ok(Some(parsed.command))
    }
}

#[derive(Debug, Parser)]
#[command(name = "tinylink", version, about = "Salted short links for stored URLs")]
pub struct CLI {
    #[arg(long, global = true, env = ALPHABET_ENV, default_value = DEFAULT_ALPHABET)]
    pub alphabet: String,

    #[arg(long, global = true, env = SALT_ENV, default_value = "", hide_env_values = true)]
    pub salt: String,

    #[arg(long, global = true, env = PADDING_ENV, default_value_t = DEFAULT_PADDING)]
    pub padding: u32,

    #[arg(
        long,
        global = true,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, global = true, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, global = true, env = HOSTNAME_ENV, default_value = DEFAULT_HOSTNAME)]
    pub hostname: String,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}
