//! Error types for repository cooking.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a repository cooking run.
#[derive(Error, Debug)]
pub enum Error {
    /// A required directory argument was empty.
    #[error("Required directory path is empty")]
    EmptyDirectoryPath,

    /// A required directory does not exist.
    #[error("Does not exist: ({})", .0.display())]
    DirectoryMissing(PathBuf),

    /// A path that should be a directory is something else.
    #[error("Is not a directory: ({})", .0.display())]
    NotADirectory(PathBuf),

    /// I/O operation on a specific path failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Both .deb and .rpm files were found with automatic detection.
    #[error("Fail to auto detect package type, because there are .rpm and .deb packages found at the same time")]
    AmbiguousPackageType,

    /// Neither .deb nor .rpm files were found with automatic detection.
    #[error("Package type is auto, but no .deb or .rpm packages are found")]
    NoPackagesFound,

    /// The package file is not a meta-pointer.
    #[error("Only 'meta-pointer' files are supported: {}", .0.display())]
    PointerFormatUnsupported(PathBuf),

    /// The pointer names an artifact source other than Artifactory.
    #[error("Unknown source ({tag}) at {}", .path.display())]
    UnknownSource {
        /// Source tag found in the pointer.
        tag: String,
        /// Pointer file.
        path: PathBuf,
    },

    /// No artifact store item matches the pointer.
    #[error("No artifactory item found for (\"{kind}\": \"{value}\")")]
    ItemNotFound {
        /// Identifier kind, e.g. `sha256`.
        kind: String,
        /// Identifier value.
        value: String,
    },

    /// More than one artifact store item matches the pointer.
    #[error("Expected single artifactory item for (\"{kind}\": \"{value}\"), found {count}")]
    AmbiguousItem {
        /// Identifier kind, e.g. `sha256`.
        kind: String,
        /// Identifier value.
        value: String,
        /// Number of matching items.
        count: usize,
    },

    /// HTTP request to the artifact store failed.
    #[error("Artifactory request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An artifact store URL could not be built.
    #[error("Invalid artifactory URL: {0}")]
    Url(#[from] url::ParseError),

    /// A package entry carries no usable metadata.
    #[error("Invalid meta for: {0}")]
    InvalidMeta(String),

    /// APT index composition failed.
    #[error(transparent)]
    AptRepository(#[from] apt_repository::AptRepositoryError),

    /// An external tool could not be started.
    #[error("Failed to run {tool}: {source}")]
    ToolSpawn {
        /// Executable name.
        tool: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("{tool} failed with {status}")]
    ToolFailed {
        /// Executable name.
        tool: String,
        /// Exit status as reported by the OS.
        status: std::process::ExitStatus,
    },

    /// The requested repository backend is not available.
    #[error("{0} repository cooking is not implemented yet")]
    NotImplemented(&'static str),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for repository cooking operations.
pub type Result<T> = std::result::Result<T, Error>;
