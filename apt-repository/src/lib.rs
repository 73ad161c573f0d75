//! # APT Repository Library
//!
//! Building blocks for composing the index files of a flat APT repository:
//! `Packages` stanzas grouped by architecture, the per-architecture `Release`
//! file, and the `dists/` directory layout. Generation of the top-level
//! `Release` checksums and signing is left to `apt-ftparchive` and `gpg`.
//!
//! ## Example
//!
//! ```rust
//! use apt_repository::{ArchitectureIndex, ComponentRelease, Package, RepositoryLayout};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut index = ArchitectureIndex::new();
//! index.add_package(Package::from_meta("Package: hello\nArchitecture: arm64\n", "./hello.deb")?);
//!
//! let layout = RepositoryLayout::new("/srv/repo", "stable", "main");
//! for (arch, packages) in index.iter() {
//!     let _packages_path = layout.packages_path(arch);
//!     let _release = ComponentRelease::new("stable", "main", arch);
//!     assert_eq!(packages.len(), 1);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod packages;
pub mod release;
pub mod repository;

pub use error::{AptRepositoryError, Result};
pub use packages::{architecture_of, ArchitectureIndex, Package, PackageFile, DEFAULT_ARCHITECTURE};
pub use release::ComponentRelease;
pub use repository::RepositoryLayout;
