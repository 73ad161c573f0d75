//! Resolution of package pointers into repository entries.

use reqwest::Url;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::artifactory::{find_items_query, ArtifactStore};
use crate::error::{Error, Result};
use crate::pointer::MetaPointer;
use crate::repo::{PackageEntry, RepoCook, SideFile};

/// A package binary located in the artifact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub uri: Url,
}

/// URI of a file stored next to `uri` under the name `file_name`.
pub fn sibling_uri(uri: &Url, file_name: &str) -> Result<Url> {
    let mut sibling = uri.clone();
    sibling
        .path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop()
        .push(file_name);
    Ok(sibling)
}

/// Find the artifact a pointer file refers to.
pub async fn resolve<S: ArtifactStore + ?Sized>(
    store: &S,
    pointer_path: &Path,
) -> Result<ResolvedArtifact> {
    let pointer = MetaPointer::from_file(pointer_path)
        .await?
        .ok_or_else(|| Error::PointerFormatUnsupported(pointer_path.to_path_buf()))?;

    if !pointer.is_artifactory() {
        return Err(Error::UnknownSource {
            tag: pointer.source,
            path: pointer_path.to_path_buf(),
        });
    }

    let mut items = store
        .query(&find_items_query(&pointer.oid.kind, &pointer.oid.value))
        .await?;
    let item = match items.len() {
        0 => {
            return Err(Error::ItemNotFound {
                kind: pointer.oid.kind,
                value: pointer.oid.value,
            })
        }
        1 => items.remove(0),
        count => {
            return Err(Error::AmbiguousItem {
                kind: pointer.oid.kind,
                value: pointer.oid.value,
                count,
            })
        }
    };

    Ok(ResolvedArtifact {
        uri: store.resolve_uri(&item)?,
    })
}

/// Download the side files kept next to an artifact.
///
/// Files that cannot be fetched are left out of the result.
pub async fn fetch_side_files<S: ArtifactStore + ?Sized>(
    store: &S,
    uri: &Url,
    names: &BTreeMap<SideFile, String>,
) -> Result<BTreeMap<SideFile, String>> {
    let mut content = BTreeMap::new();
    for (key, name) in names {
        let side_uri = sibling_uri(uri, name)?;
        match store.fetch_text(&side_uri).await {
            Some(text) => {
                log::info!("  > additional item [{}]: {}", key.key(), side_uri);
                content.insert(*key, text);
            }
            None => log::debug!("  > additional item [{}] not available: {}", key.key(), side_uri),
        }
    }
    Ok(content)
}

fn relative_path(storage_root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(storage_root).unwrap_or(file);
    format!("./{}", relative.display())
}

/// Resolve every package file and gather what the builder needs about it.
pub async fn collect_entries<S: ArtifactStore + ?Sized>(
    store: &S,
    cook: &RepoCook,
    storage_root: &Path,
    files: &[PathBuf],
) -> Result<Vec<PackageEntry>> {
    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        log::info!(" * package file: {}", file.display());
        let artifact = resolve(store, file).await?;
        log::info!("  > resolve artifactory item: {}", artifact.uri);

        let mut entry = PackageEntry::new(relative_path(storage_root, file));
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(names) = cook.side_file_names(&file_name) {
            entry.additional_content = fetch_side_files(store, &artifact.uri, &names).await?;
        }
        entries.push(entry);
    }
    Ok(entries)
}
