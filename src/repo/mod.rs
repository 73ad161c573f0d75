//! Repository builders, one per package system.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{Config, PackageKind};
use crate::error::Result;

pub mod debian;
pub mod rpm;

pub use debian::DebianRepoCook;
pub use rpm::RpmRepoCook;

/// Side files published next to a package in the artifact store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SideFile {
    /// Control metadata of the package.
    Meta,
    /// Changelog of the package.
    ChangeLog,
}

impl SideFile {
    pub fn key(&self) -> &'static str {
        match self {
            SideFile::Meta => "meta",
            SideFile::ChangeLog => "changeLog",
        }
    }
}

/// One package file found in the storage directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageEntry {
    /// Path relative to the storage root, prefixed with `./`.
    pub relative_path: String,
    /// Side files that could be fetched.
    pub additional_content: BTreeMap<SideFile, String>,
}

impl PackageEntry {
    pub fn new<S: Into<String>>(relative_path: S) -> Self {
        Self {
            relative_path: relative_path.into(),
            additional_content: BTreeMap::new(),
        }
    }

    /// Add side file content.
    pub fn with_content<S: Into<String>>(mut self, key: SideFile, content: S) -> Self {
        self.additional_content.insert(key, content.into());
        self
    }

    /// Content of a side file, if it was fetched and is not empty.
    pub fn content(&self, key: SideFile) -> Option<&str> {
        self.additional_content
            .get(&key)
            .map(String::as_str)
            .filter(|content| !content.is_empty())
    }
}

/// Everything a builder needs to (re)write a repository.
#[derive(Debug, Clone)]
pub struct RepositoryInfo {
    /// Repository root.
    pub root_path: PathBuf,
    /// Packages in discovery order.
    pub packages: Vec<PackageEntry>,
}

/// Repository builder for the detected package system.
#[derive(Debug, Clone)]
pub enum RepoCook {
    Debian(DebianRepoCook),
    Rpm(RpmRepoCook),
}

impl RepoCook {
    /// Select the builder for `kind`.
    pub fn new(kind: PackageKind, config: &Config) -> Self {
        match kind {
            PackageKind::Deb => RepoCook::Debian(DebianRepoCook::from_config(config)),
            PackageKind::Rpm => RepoCook::Rpm(RpmRepoCook),
        }
    }

    /// Names of the side files to fetch for the package called `file_name`.
    pub fn side_file_names(&self, file_name: &str) -> Option<BTreeMap<SideFile, String>> {
        match self {
            RepoCook::Debian(cook) => cook.side_file_names(file_name),
            RepoCook::Rpm(cook) => cook.side_file_names(file_name),
        }
    }

    /// Write the repository index files.
    pub async fn make_repository(&self, repo: RepositoryInfo) -> Result<()> {
        match self {
            RepoCook::Debian(cook) => cook.make_repository(repo).await,
            RepoCook::Rpm(cook) => cook.make_repository(repo).await,
        }
    }
}
