//! Discovery of package files in the storage directory.

use futures::future::{try_join_all, BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{PackageKind, PackageType};
use crate::error::{Error, Result};

/// Predicate applied to every candidate file path.
pub type PathFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Check that `target_dir` names an existing directory.
pub async fn check_directory_exists(target_dir: &Path) -> Result<()> {
    if target_dir.as_os_str().is_empty() {
        return Err(Error::EmptyDirectoryPath);
    }

    match tokio::fs::metadata(target_dir).await {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(target_dir.to_path_buf())),
        Err(_) => Err(Error::DirectoryMissing(target_dir.to_path_buf())),
    }
}

/// List the files and symbolic links below `root` that match `filter`.
///
/// A directory's own matches come first, followed by the matches of each of
/// its subdirectories in listing order. Subdirectories are listed
/// concurrently.
pub async fn list_files(root: &Path, filter: Option<PathFilter>) -> Result<Vec<PathBuf>> {
    iterate_directory(root.to_path_buf(), filter).await
}

fn iterate_directory(dir: PathBuf, filter: Option<PathFilter>) -> BoxFuture<'static, Result<Vec<PathBuf>>> {
    async move {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| Error::io(&dir, e))?;

        let mut files = Vec::new();
        let mut subdirs = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(|e| Error::io(&dir, e))? {
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(|e| Error::io(&path, e))?;

            if file_type.is_dir() {
                subdirs.push(iterate_directory(path, filter.clone()));
            } else if file_type.is_symlink() || file_type.is_file() {
                if filter.as_ref().map_or(true, |f| f(&path)) {
                    files.push(path);
                }
            }
        }

        for nested in try_join_all(subdirs).await? {
            files.extend(nested);
        }

        Ok(files)
    }
    .boxed()
}

/// Filter matching paths with the given extension (without the dot).
pub fn extension_filter(extension: &'static str) -> PathFilter {
    Arc::new(move |path: &Path| path.extension().is_some_and(|ext| ext == extension))
}

/// Find the package files to publish and decide which package system they
/// belong to.
///
/// With [`PackageType::Auto`] exactly one of `.deb` and `.rpm` files must be
/// present. An explicit package type accepts an empty result.
pub async fn collect_packages(
    storage_root: &Path,
    package_type: PackageType,
) -> Result<(PackageKind, Vec<PathBuf>)> {
    let list_kind = |kind: PackageKind| list_files(storage_root, Some(extension_filter(kind.extension())));

    let (kind, files) = match package_type {
        PackageType::Deb => (PackageKind::Deb, list_kind(PackageKind::Deb).await?),
        PackageType::Rpm => (PackageKind::Rpm, list_kind(PackageKind::Rpm).await?),
        PackageType::Auto => {
            let deb_files = list_kind(PackageKind::Deb).await?;
            let rpm_files = list_kind(PackageKind::Rpm).await?;
            match (deb_files.is_empty(), rpm_files.is_empty()) {
                (false, false) => return Err(Error::AmbiguousPackageType),
                (true, true) => return Err(Error::NoPackagesFound),
                (false, true) => (PackageKind::Deb, deb_files),
                (true, false) => (PackageKind::Rpm, rpm_files),
            }
        }
    };

    if files.is_empty() {
        log::warn!(
            "No .{} packages found in {}",
            kind.extension(),
            storage_root.display()
        );
    }

    Ok((kind, files))
}
