//! Command-line uploader for the netdisk service.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use netdisk_client::Client;
use netdisk_upload::{UploadStream, Uploader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::NetdiskConfig;

#[derive(Parser)]
#[command(name = "netdisk")]
#[command(about = "Upload files to the netdisk service")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, env = "NETDISK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a local file into a remote directory
    Upload {
        /// File to upload
        local_file: PathBuf,
        /// Absolute remote directory, e.g. /apps/backup
        remote_dir: String,
        /// Concurrent slice uploads, 1-32 (overrides config)
        #[arg(long)]
        threads: Option<i64>,
        /// Remote file name (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the config file location
    ConfigPath,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::config_path);

    match cli.command {
        Commands::ConfigPath => {
            println!("{}", config_path.display());
            Ok(())
        }
        Commands::Upload {
            local_file,
            remote_dir,
            threads,
            name,
        } => {
            let config = NetdiskConfig::load_from(&config_path)
                .with_context(|| format!("failed to load {}", config_path.display()))?;
            if config.access_token.trim().is_empty() {
                bail!("access_token is not set in {}", config_path.display());
            }
            upload(&config, &local_file, &remote_dir, threads, name).await
        }
    }
}

async fn upload(
    config: &NetdiskConfig,
    local_file: &Path,
    remote_dir: &str,
    threads: Option<i64>,
    name: Option<String>,
) -> Result<()> {
    let client =
        Client::new(&config.access_token)?.with_endpoints(&config.api_base, &config.upload_url);

    let mut upload_config = config.upload_config();
    if let Some(threads) = threads {
        upload_config = upload_config.with_threads(threads);
    }

    let name = match name {
        Some(name) => name,
        None => local_file
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .context("local path has no file name")?,
    };

    let file = tokio::fs::File::open(local_file)
        .await
        .with_context(|| format!("failed to open {}", local_file.display()))?;
    let size = file.metadata().await?.len();

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, cancelling upload");
                cancel.cancel();
            }
        }
    });

    info!(
        local = %local_file.display(),
        remote_dir,
        size,
        threads = upload_config.upload_threads,
        "starting upload"
    );

    let uploader = Uploader::new(&client, cancel).with_config(upload_config);
    let progress = |pct: u8| eprint!("\r{name}: {pct:>3}%");
    let result = uploader
        .upload(UploadStream::new(name.clone(), size, file), remote_dir, &progress)
        .await;
    interrupt.abort();
    eprintln!();

    match result {
        Ok(remote) => {
            println!("{}\t{} bytes", remote.path, remote.size);
            Ok(())
        }
        Err(e) if e.is_cancelled() => bail!("upload cancelled"),
        Err(e) => Err(e).context("upload failed"),
    }
}
