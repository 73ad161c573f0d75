//! Command line configuration.
//!
//! The configuration is parsed once in `main` and handed to every component
//! that needs it by reference.

use clap::{Parser, ValueEnum};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::logging::LoggingArgs;

/// Package system requested on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Rpm,
    Deb,
    Auto,
}

/// Package system a repository is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    Rpm,
    Deb,
}

impl PackageKind {
    /// File extension of package files, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            PackageKind::Rpm => "rpm",
            PackageKind::Deb => "deb",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn mask_secret<T: ?Sized, S: Serializer>(_secret: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("***")
}

#[derive(clap::Args, Debug, Clone, Serialize)]
pub struct ArtifactoryArgs {
    #[clap(long, env = "ARTIFACTORY_HOST")]
    /// JFrog Artifactory host.
    pub artifactory_host: String,

    #[clap(long, env = "ARTIFACTORY_USER")]
    /// JFrog Artifactory user.
    pub artifactory_user: String,

    #[clap(long, env = "ARTIFACTORY_APIKEY", hide_env_values = true)]
    /// JFrog Artifactory user's API key.
    #[serde(serialize_with = "mask_secret")]
    pub artifactory_apikey: String,

    #[clap(long, default_value = "https")]
    /// Protocol used to reach the Artifactory host.
    pub artifactory_protocol: String,
}

#[derive(clap::Args, Debug, Clone, Serialize)]
pub struct DebianArgs {
    #[clap(long, default_value = "stable")]
    /// Debian repository distribution name.
    pub deb_dist: String,

    #[clap(long, default_value = "main")]
    /// Debian repository component name.
    pub deb_component: String,

    #[clap(long, default_value = apt_repository::release::DEFAULT_ORIGIN)]
    /// Origin written to per-architecture Release files.
    pub deb_origin: String,

    #[clap(long, default_value = apt_repository::release::DEFAULT_LABEL)]
    /// Label written to per-architecture Release files.
    pub deb_label: String,

    #[clap(long, default_value = apt_repository::release::DEFAULT_CODENAME)]
    /// Codename written to per-architecture Release files.
    pub deb_codename: String,

    #[clap(long, short = 'k')]
    /// Key used to sign the Release file. Without it the repository is left unsigned.
    pub gpg_key_name: Option<String>,
}

#[derive(clap::Args, Debug, Clone, Serialize)]
pub struct ToolArgs {
    #[clap(long = "apt-ftparchive", default_value = "apt-ftparchive")]
    /// apt-ftparchive executable.
    pub apt_ftparchive: String,

    #[clap(long = "gpg", default_value = "gpg")]
    /// gpg executable.
    pub gpg: String,
}

#[derive(Parser, Debug, Clone, Serialize)]
#[command(name = "repo-cook", version, about = "Cook a Linux package repository from package pointer files")]
pub struct Config {
    #[clap(long, short = 's')]
    /// Directory to scan for package files.
    pub storage_root: PathBuf,

    #[clap(long, short = 'r')]
    /// Repository root. Defaults to the storage root.
    pub repo_root: Option<PathBuf>,

    #[clap(long, short = 'p', value_enum, default_value_t = PackageType::Auto)]
    /// Package system to be used.
    pub package_type: PackageType,

    #[clap(flatten)]
    pub artifactory: ArtifactoryArgs,

    #[clap(flatten)]
    pub debian: DebianArgs,

    #[clap(flatten)]
    pub tools: ToolArgs,

    #[clap(long, short = 'n')]
    /// Dry run: only print what would be done.
    pub dry_run: bool,

    #[clap(long)]
    /// Print the configuration in use.
    pub show_conf: bool,

    #[clap(flatten)]
    #[serde(skip)]
    pub logging: LoggingArgs,
}

impl Config {
    /// Root of the repository to write.
    pub fn repo_root(&self) -> &Path {
        self.repo_root.as_deref().unwrap_or(&self.storage_root)
    }

    /// Configuration rendered as pretty-printed JSON, secrets masked.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
