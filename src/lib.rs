//! Build Linux package repositories from package pointer files.
//!
//! The storage directory holds small pointer files in place of the actual
//! package binaries. Each pointer is resolved against JFrog Artifactory, the
//! package metadata published next to the binary is fetched, and the
//! repository index is written on disk.

pub mod artifactory;
pub mod config;
pub mod error;
pub mod logging;
pub mod pointer;
pub mod repo;
pub mod resolver;
pub mod scanner;
pub mod tools;

pub use error::{Error, Result};

use artifactory::{ArtifactStore, ArtifactoryClient};
use config::Config;
use repo::{RepoCook, RepositoryInfo};

/// Scan the storage root, resolve every package through `store` and write
/// the repository index.
pub async fn cook_repository<S: ArtifactStore + ?Sized>(config: &Config, store: &S) -> Result<()> {
    scanner::check_directory_exists(&config.storage_root).await?;
    let repo_root = config.repo_root();

    let (kind, files) = scanner::collect_packages(&config.storage_root, config.package_type).await?;
    let cook = RepoCook::new(kind, config);

    log::info!("Cook the [{}] repository:", kind);
    log::info!(" * Storage: {}", config.storage_root.display());
    log::info!(" * Repository: {}", repo_root.display());
    if config.dry_run {
        log::info!(" * Dry run: nothing will be written");
    }

    let packages = resolver::collect_entries(store, &cook, &config.storage_root, &files).await?;

    cook.make_repository(RepositoryInfo {
        root_path: repo_root.to_path_buf(),
        packages,
    })
    .await
}

/// Cook the repository described by `config` using Artifactory.
pub async fn run(config: &Config) -> Result<()> {
    let client = ArtifactoryClient::from_args(&config.artifactory)?;
    cook_repository(config, &client).await
}
