//! On-disk layout of an APT repository.

use std::path::{Path, PathBuf};

/// Paths of the index files for one distribution and component of a
/// repository rooted at `root`:
///
/// ```text
/// <root>/dists/<dist>/{Release,Release.gpg,InRelease}
/// <root>/dists/<dist>/<component>/binary-<arch>/{Packages,Release}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLayout {
    root: PathBuf,
    dist: String,
    component: String,
}

impl RepositoryLayout {
    /// Create a layout for `dist`/`component` below `root`.
    pub fn new<P: AsRef<Path>, S: Into<String>>(root: P, dist: S, component: S) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            dist: dist.into(),
            component: component.into(),
        }
    }

    /// Distribution name.
    pub fn dist(&self) -> &str {
        &self.dist
    }

    /// Component name.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// `<root>/dists/<dist>`
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("dists").join(&self.dist)
    }

    /// `<root>/dists/<dist>/<component>/binary-<arch>`
    pub fn binary_dir(&self, arch: &str) -> PathBuf {
        self.dist_dir()
            .join(&self.component)
            .join(format!("binary-{}", arch))
    }

    /// Packages file for an architecture.
    pub fn packages_path(&self, arch: &str) -> PathBuf {
        self.binary_dir(arch).join("Packages")
    }

    /// Per-architecture Release file.
    pub fn component_release_path(&self, arch: &str) -> PathBuf {
        self.binary_dir(arch).join("Release")
    }

    /// Top-level Release file of the distribution.
    pub fn release_path(&self) -> PathBuf {
        self.dist_dir().join("Release")
    }

    /// Detached signature of the top-level Release file.
    pub fn release_gpg_path(&self) -> PathBuf {
        self.dist_dir().join("Release.gpg")
    }

    /// Clear-signed top-level Release file.
    pub fn in_release_path(&self) -> PathBuf {
        self.dist_dir().join("InRelease")
    }

    /// Signature files, in the order they are produced.
    pub fn signature_paths(&self) -> [PathBuf; 2] {
        [self.release_gpg_path(), self.in_release_path()]
    }
}
