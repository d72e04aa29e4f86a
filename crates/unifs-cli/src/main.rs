//! unifs command-line tool
//!
//! Operates on a repository stored in a local directory.
//!
//! ## Usage
//!
//! ```bash
//! unifs [--config FILE] [--base-dir DIR] [--root PATH] [--etag] <COMMAND>
//!
//! unifs put /notes/today.md "hello"
//! unifs cat /notes/today.md --start 2 --length 3
//! unifs ls /notes
//! ```

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use unifs::{FileSystemAdapter, FsResult, LocalDriver, ReadOptions, WriteOptions};

use crate::config::CliConfig;

/// File operations on a local unifs repository.
///
/// Failures are printed to stderr as JSON.
#[derive(Parser, Debug)]
#[command(name = "unifs")]
#[command(about = "File operations on a local unifs repository")]
struct Cli {
    /// RON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage directory (default: the user data dir + /unifs)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Repository root inside the storage directory (default: /)
    #[arg(long, global = true)]
    root: Option<String>,

    /// Compute content hashes for stat
    #[arg(long, global = true)]
    etag: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Show size, modified time and etag
    Stat { path: String },
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print a file or a byte range of it
    Cat {
        path: String,
        /// Byte offset to start at
        #[arg(long)]
        start: Option<u64>,
        /// Number of bytes to read
        #[arg(long)]
        length: Option<u64>,
    },
    /// Replace a file with the given text
    Put { path: String, text: String },
    /// Remove a file
    Rm { path: String },
    /// Create a directory (parent must exist)
    Mkdir { path: String },
    /// Remove an empty directory
    Rmdir { path: String },
    /// Print the storage address of a path
    Url { path: String },
}

/// Merge the config file (if any) with command-line overrides.
fn resolve_config(cli: &Cli) -> Result<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if let Some(dir) = &cli.base_dir {
        config.base_dir = Some(dir.clone());
    }
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    if cli.etag {
        config.options.use_etag = true;
    }
    Ok(config)
}

async fn open(config: &CliConfig) -> Result<FileSystemAdapter> {
    let base = config.resolved_base_dir()?;
    tokio::fs::create_dir_all(&base)
        .await
        .with_context(|| format!("failed to create {}", base.display()))?;

    let driver = Arc::new(LocalDriver::new(&base));
    let fs = FileSystemAdapter::new(&config.root, driver, config.options.clone());
    let status = fs.ready().await;
    tracing::debug!(root = %fs.root_address(), status = ?status, "repository opened");
    Ok(fs)
}

/// Run one command and return what should go to stdout.
async fn run(fs: &FileSystemAdapter, command: &Command) -> FsResult<Vec<u8>> {
    let mut out = Vec::new();
    match command {
        Command::Stat { path } => {
            let stats = fs.head(path).await?;
            let modified = stats
                .modified
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs());
            let json = serde_json::json!({
                "path": fs.get_file(path).full_path(),
                "directory": stats.is_directory(),
                "size": stats.size,
                "modified": modified,
                "etag": stats.etag,
            });
            out = format!("{json:#}\n").into_bytes();
        }
        Command::Ls { path } => {
            for item in fs.get_directory(path).list().await? {
                out.extend_from_slice(item.path.as_bytes());
                out.push(b'\n');
            }
        }
        Command::Cat {
            path,
            start,
            length,
        } => {
            let options = ReadOptions {
                start: *start,
                length: *length,
                ..Default::default()
            };
            out = fs.read_file(path, &options).await?;
        }
        Command::Put { path, text } => {
            fs.write_file(path, text.as_str(), &WriteOptions::default()).await?;
        }
        Command::Rm { path } => fs.get_file(path).remove().await?,
        Command::Mkdir { path } => fs.get_directory(path).mkdir().await?,
        Command::Rmdir { path } => fs.get_directory(path).rmdir().await?,
        Command::Url { path } => {
            out = format!("{}\n", fs.to_address(path)).into_bytes();
        }
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let fs = match resolve_config(&cli) {
        Ok(config) => open(&config).await,
        Err(e) => Err(e),
    };
    let fs = match fs {
        Ok(fs) => fs,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&fs, &cli.command).await {
        Ok(out) => {
            if let Err(e) = std::io::stdout().write_all(&out) {
                eprintln!("failed to write output: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            match serde_json::to_string_pretty(&e.payload()) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}
