//! Packages file composition for APT repositories.

use crate::{AptRepositoryError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// Architecture assumed for control data that does not declare one.
pub const DEFAULT_ARCHITECTURE: &str = "amd64";

/// Extract the architecture declared in a control paragraph, if any.
pub fn architecture_of(control: &str) -> Option<&str> {
    lazy_regex::regex_captures!(r"Architecture:\s*(\S+)", control).map(|(_, arch)| arch)
}

fn check_architecture(arch: &str) -> Result<()> {
    let valid = !arch.is_empty()
        && arch
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AptRepositoryError::invalid_field("Architecture", arch))
    }
}

/// A binary package stanza in a Packages file.
///
/// The control text is kept as provided by the package metadata; only empty
/// lines are dropped and a `Filename` field pointing at the package is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    architecture: String,
    filename: String,
    control: String,
}

impl Package {
    /// Create a package stanza from its control metadata and its path relative
    /// to the repository root.
    pub fn from_meta<S: Into<String>>(meta: &str, filename: S) -> Result<Self> {
        let filename = filename.into();
        if meta.trim().is_empty() {
            return Err(AptRepositoryError::invalid_package(format!(
                "empty control data for {}",
                filename
            )));
        }
        if filename.is_empty() {
            return Err(AptRepositoryError::missing_field("Filename"));
        }

        let architecture = architecture_of(meta).unwrap_or(DEFAULT_ARCHITECTURE);
        check_architecture(architecture)?;

        Ok(Self {
            architecture: architecture.to_string(),
            filename,
            control: meta.to_string(),
        })
    }

    /// Architecture the package belongs to.
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    /// Path of the package relative to the repository root.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Convert the package to a control file paragraph (without a trailing
    /// newline).
    pub fn to_paragraph(&self) -> String {
        let filename_line = format!("Filename: {}", self.filename);
        let mut lines: Vec<&str> = self.control.split('\n').filter(|l| !l.is_empty()).collect();
        lines.push(&filename_line);
        lines.join("\n")
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_paragraph())
    }
}

/// A collection of packages that can be written to a Packages file.
#[derive(Debug, Clone, Default)]
pub struct PackageFile {
    packages: Vec<Package>,
}

impl PackageFile {
    /// Create a new empty package file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package to the file.
    pub fn add_package(&mut self, package: Package) {
        self.packages.push(package);
    }

    /// Get all packages, in insertion order.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Get the number of packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Check if the package file is empty.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl fmt::Display for PackageFile {
    /// Paragraphs are separated by a single blank line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, package) in self.packages.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            f.write_str(&package.to_paragraph())?;
        }
        if !self.packages.is_empty() {
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Packages grouped by architecture.
#[derive(Debug, Clone, Default)]
pub struct ArchitectureIndex {
    buckets: BTreeMap<String, PackageFile>,
}

impl ArchitectureIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package to the bucket of its architecture.
    pub fn add_package(&mut self, package: Package) {
        self.buckets
            .entry(package.architecture().to_string())
            .or_default()
            .add_package(package);
    }

    /// Iterate over `(architecture, packages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageFile)> {
        self.buckets.iter().map(|(arch, file)| (arch.as_str(), file))
    }
}
