// src/commands.rs
//! Command implementations for the debforge CLI

use crate::cli::{Cli, RepoArgs, StorageArgs};
use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use debforge::config::{ConfigFile, RepoConfig, StorageSection};
use debforge::repository::{index, pool_path, repo_path};
use debforge::storage::DEFAULT_REGION;
use debforge::{DebExtractor, LocalStorage, Publisher, S3Config, S3Storage, Storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Load the config file if one was given
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Ok(ConfigFile::load(path)?)
        }
        None => Ok(ConfigFile::default()),
    }
}

/// Merge repository flags over the config file
fn resolve_repo(file: &ConfigFile, args: RepoArgs) -> RepoConfig {
    let mut section = file.repository.clone();
    args.apply(&mut section);
    section.into_config()
}

/// Where and how the repository is stored
#[derive(Debug)]
enum StorageTarget {
    Local(PathBuf),
    S3(S3Config),
}

fn resolve_storage(file: &StorageSection, args: StorageArgs) -> Result<StorageTarget> {
    if let Some(root) = args.local_root.or_else(|| file.local_root.clone()) {
        return Ok(StorageTarget::Local(root));
    }

    let Some(bucket) = args.bucket.or_else(|| file.bucket.clone()) else {
        bail!("No bucket given (use --bucket, DEBFORGE_BUCKET or [storage] bucket)");
    };
    let Some(endpoint) = args.endpoint.or_else(|| file.endpoint.clone()) else {
        bail!("No endpoint given (use --endpoint, DEBFORGE_ENDPOINT or [storage] endpoint)");
    };
    let Some(access_key) = args.access_key else {
        bail!("No access key given (use --access-key or AWS_ACCESS_KEY_ID)");
    };
    let Some(secret_key) = args.secret_key else {
        bail!("No secret key given (use --secret-key or AWS_SECRET_ACCESS_KEY)");
    };

    Ok(StorageTarget::S3(S3Config {
        endpoint,
        bucket,
        region: args
            .region
            .or_else(|| file.region.clone())
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        access_key,
        secret_key,
        secure: args.secure.or(file.secure).unwrap_or(true),
    }))
}

fn open_storage(target: &StorageTarget) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match target {
        StorageTarget::Local(root) => Arc::new(LocalStorage::new(root)),
        StorageTarget::S3(config) => {
            Arc::new(S3Storage::new(config).context("Failed to set up S3 storage")?)
        }
    };
    Ok(storage)
}

/// Cancel `token` on Ctrl-C or after `timeout` seconds
fn spawn_cancellation(token: &CancellationToken, timeout: Option<u64>) {
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling pending storage calls");
            on_signal.cancel();
        }
    });

    if let Some(secs) = timeout {
        let on_deadline = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            warn!("Timeout of {}s reached, cancelling pending storage calls", secs);
            on_deadline.cancel();
        });
    }
}

fn read_package(file: &Path) -> Result<Vec<u8>> {
    std::fs::read(file).with_context(|| format!("Failed to read package: {}", file.display()))
}

/// Publish a package
pub async fn cmd_publish(
    config_file: &ConfigFile,
    file: &Path,
    repo: RepoArgs,
    storage: StorageArgs,
    timeout: Option<u64>,
) -> Result<()> {
    let config = resolve_repo(config_file, repo);
    let target = resolve_storage(&config_file.storage, storage)?;
    let storage = open_storage(&target)?;
    let package = read_package(file)?;

    info!(
        "Publishing {} to {}/{}/binary-{} via {}",
        file.display(),
        config.archive,
        config.component,
        config.architecture,
        storage.name()
    );

    let cancel = CancellationToken::new();
    spawn_cancellation(&cancel, timeout);

    let publisher = Publisher::new(storage, Arc::new(DebExtractor), config);
    let report = publisher
        .publish(&package, &cancel)
        .await
        .with_context(|| format!("Failed to publish {}", file.display()))?;

    println!(
        "Published {} {} ({})",
        report.metadata.name(),
        report.metadata.version(),
        report.metadata.architecture()
    );
    println!("  Package: {}", report.pool_path);
    if report.index_changed {
        println!("  Index: {} (updated)", report.repo_path);
    } else {
        println!("  Index: {} (already listed)", report.repo_path);
    }
    for entry in &report.checksums {
        println!("  {} {} {}", entry.filename, entry.size, entry.sha256);
    }
    println!(
        "  Suite manifest: {} ({} artifacts)",
        report.suite_manifest, report.suite_entries
    );
    Ok(())
}

/// Show what publishing a package would write, without storage access
pub fn cmd_inspect(config_file: &ConfigFile, file: &Path, repo: RepoArgs) -> Result<()> {
    let config = resolve_repo(config_file, repo);
    let package = read_package(file)?;
    let metadata = debforge::packages::deb::extract(package.as_slice())
        .with_context(|| format!("Failed to read control metadata from {}", file.display()))?;

    println!("Pool path: {}", pool_path(config.component, &metadata));
    println!(
        "Index: {}/Index",
        repo_path(config.archive, config.component, config.architecture)
    );
    println!();
    print!("{}", index::render(&metadata));
    Ok(())
}

/// Generate shell completions
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "debforge", &mut std::io::stdout());
}
