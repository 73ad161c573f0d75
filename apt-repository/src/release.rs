//! Per-architecture Release file generation for APT repositories.

use std::fmt;

/// Origin used when none is configured.
pub const DEFAULT_ORIGIN: &str = "desktop stable";

/// Label used when none is configured.
pub const DEFAULT_LABEL: &str = "desktop stable";

/// Codename used when none is configured.
pub const DEFAULT_CODENAME: &str = "tradingview";

/// The Release file that lives next to a `binary-<arch>` Packages file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRelease {
    /// Origin of the repository.
    pub origin: String,
    /// Label for the repository.
    pub label: String,
    /// Archive (distribution) name.
    pub archive: String,
    /// Architecture of the component index.
    pub architecture: String,
    /// Component name.
    pub component: String,
    /// Codename.
    pub codename: String,
}

impl ComponentRelease {
    /// Create a Release for one component/architecture with default origin,
    /// label and codename.
    pub fn new<S: Into<String>>(archive: S, component: S, architecture: S) -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            label: DEFAULT_LABEL.to_string(),
            archive: archive.into(),
            architecture: architecture.into(),
            component: component.into(),
            codename: DEFAULT_CODENAME.to_string(),
        }
    }

    /// Set the origin.
    pub fn origin<S: Into<String>>(mut self, origin: S) -> Self {
        self.origin = origin.into();
        self
    }

    /// Set the label.
    pub fn label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Set the codename.
    pub fn codename<S: Into<String>>(mut self, codename: S) -> Self {
        self.codename = codename.into();
        self
    }
}

impl fmt::Display for ComponentRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin: {}", self.origin)?;
        writeln!(f, "Label: {}", self.label)?;
        writeln!(f, "Archive: {}", self.archive)?;
        writeln!(f, "Architecture: {}", self.architecture)?;
        writeln!(f, "Component: {}", self.component)?;
        writeln!(f, "Codename: {}", self.codename)
    }
}
