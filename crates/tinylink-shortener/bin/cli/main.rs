mod cli;
mod render;

use crate::cli::{BatchLine, Command, LogFormatArg, StorageBackendArg, CLI};
use anyhow::{bail, Context};
use clap::Parser;
use tinylink_core::Repository;
use tinylink_shortener::{Shortener, ShortenerService, TokenCodec, TokenSettings};
use tinylink_storage::{InMemoryRepository, MySqlRepository};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    let settings = TokenSettings::builder()
        .alphabet(config.alphabet.as_str())
        .salt(config.salt.as_str())
        .padding(config.padding)
        .build();
    let codec = TokenCodec::new(settings).context("invalid token settings")?;

    info!(
        storage_backend = %config.storage,
        salted = codec.is_salted(),
        padding = codec.padding(),
        "starting tinylink"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            if matches!(
                config.command,
                Command::Resolve { .. } | Command::Edit { .. } | Command::List
            ) {
                warn!("in-memory storage starts empty on every run, use `batch` or `--storage mysql`");
            }
            run(ShortenerService::new(InMemoryRepository::new(), codec), &config).await
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(mysql_dsn).await?;
            repository.ensure_schema().await?;
            run(ShortenerService::new(repository, codec), &config).await
        }
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run<R: Repository>(service: ShortenerService<R>, config: &CLI) -> anyhow::Result<()> {
    match &config.command {
        Command::Batch => run_batch(&service, &config.hostname).await,
        command => {
            println!("{}", execute(&service, command, &config.hostname).await?);
            Ok(())
        }
    }
}

/// Executes stdin commands against one service until end of input.
///
/// A failing line is reported and does not stop the session.
async fn run_batch<R: Repository>(
    service: &ShortenerService<R>,
    hostname: &str,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match BatchLine::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                warn!(line = %line, error = %err, "invalid batch line");
                println!("error: invalid command");
                continue;
            }
        };

        match execute(service, &command, hostname).await {
            Ok(output) => println!("{output}"),
            Err(err) => {
                warn!(line = %line, error = %err, "batch command failed");
                println!("error: {err:#}");
            }
        }
    }
    Ok(())
}

async fn execute<R: Repository>(
    service: &ShortenerService<R>,
    command: &Command,
    hostname: &str,
) -> anyhow::Result<String> {
    let output = match command {
        Command::Shorten {
            url,
            vanity,
            format,
        } => {
            let shortened = service.create(url, vanity.as_deref()).await?;
            render::render_urls(&shortened.to_urls(hostname), *format)?
        }
        Command::Resolve { candidate } => match service.resolve(candidate).await? {
            Some(record) => record.url,
            None => {
                warn!(candidate = %candidate, "short code not found");
                bail!("not found: {candidate}");
            }
        },
        Command::Edit { id, url, vanity } => match service.edit(*id, url, vanity.as_deref()).await? {
            Some(record) => serde_json::to_string_pretty(&record)?,
            None => bail!("not found: record {id}"),
        },
        Command::List => render::render_records(&service.list_all().await?)?,
        Command::Encode { id } => service.encode(*id),
        Command::Decode { token } => service.decode(token)?.to_string(),
        Command::Batch => bail!("batch sessions cannot be nested"),
    };
    Ok(output)
}
