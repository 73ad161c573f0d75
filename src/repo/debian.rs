//! Debian (APT) repository builder.

use apt_repository::{ArchitectureIndex, ComponentRelease, Package, RepositoryLayout};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{RepositoryInfo, SideFile};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::tools::{exec_tool_to_file, remove_if_exists};

/// Path of the changelog kept next to a `.deb` file.
pub fn changelog_path(deb_path: &Path) -> PathBuf {
    let file_name = deb_path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let base_name = file_name.strip_suffix(".deb").unwrap_or(file_name.as_ref());
    deb_path.with_file_name(format!("{}.changelog", base_name))
}

/// Builds a flat APT repository with one component.
#[derive(Debug, Clone)]
pub struct DebianRepoCook {
    dist: String,
    component: String,
    origin: String,
    label: String,
    codename: String,
    gpg_key_name: Option<String>,
    apt_ftparchive: String,
    gpg: String,
    dry_run: bool,
}

impl DebianRepoCook {
    pub fn from_config(config: &Config) -> Self {
        Self {
            dist: config.debian.deb_dist.clone(),
            component: config.debian.deb_component.clone(),
            origin: config.debian.deb_origin.clone(),
            label: config.debian.deb_label.clone(),
            codename: config.debian.deb_codename.clone(),
            gpg_key_name: config.debian.gpg_key_name.clone(),
            apt_ftparchive: config.tools.apt_ftparchive.clone(),
            gpg: config.tools.gpg.clone(),
            dry_run: config.dry_run,
        }
    }

    pub fn side_file_names(&self, file_name: &str) -> Option<BTreeMap<SideFile, String>> {
        let changelog = changelog_path(Path::new(file_name));
        Some(BTreeMap::from([
            (SideFile::Meta, format!("{}.meta", file_name)),
            (SideFile::ChangeLog, changelog.to_string_lossy().into_owned()),
        ]))
    }

    pub async fn make_repository(&self, repo: RepositoryInfo) -> Result<()> {
        let layout = RepositoryLayout::new(&repo.root_path, self.dist.as_str(), self.component.as_str());

        // Everything is validated and composed before the first write.
        let mut index = ArchitectureIndex::new();
        let mut changelogs = Vec::new();
        for entry in &repo.packages {
            let meta = entry
                .content(SideFile::Meta)
                .filter(|meta| !meta.trim().is_empty())
                .ok_or_else(|| Error::InvalidMeta(entry.relative_path.clone()))?;
            index.add_package(Package::from_meta(meta, entry.relative_path.as_str())?);

            if let Some(changelog) = entry.content(SideFile::ChangeLog) {
                let relative = Path::new(&entry.relative_path);
                let relative = relative.strip_prefix(".").unwrap_or(relative);
                changelogs.push((repo.root_path.join(changelog_path(relative)), changelog));
            }
        }

        for (path, content) in changelogs {
            if path_exists(&path).await? {
                log::info!(
                    "Change log file already exists, will not be overwritten: {}",
                    path.display()
                );
            } else {
                log::info!("Create change log file: {}", path.display());
                log::debug!("{}", content);
                if let Some(parent) = path.parent() {
                    self.create_dir_all(parent).await?;
                }
                self.write_file(&path, content).await?;
            }
        }

        for (arch, packages) in index.iter() {
            self.create_dir_all(&layout.binary_dir(arch)).await?;

            let packages_path = layout.packages_path(arch);
            log::info!("Compose Packages: {}", packages_path.display());
            self.write_file(&packages_path, &packages.to_string()).await?;

            let release_path = layout.component_release_path(arch);
            if !path_exists(&release_path).await? {
                let release = ComponentRelease::new(layout.dist(), layout.component(), arch)
                    .origin(self.origin.as_str())
                    .label(self.label.as_str())
                    .codename(self.codename.as_str())
                    .to_string();
                log::info!("Compose Release: {}", release_path.display());
                log::debug!("{}", release);
                self.write_file(&release_path, &release).await?;
            }
        }

        self.create_dir_all(&layout.dist_dir()).await?;
        self.generate_dist_release(&layout).await?;

        match self.gpg_key_name.as_deref() {
            Some(key_name) => self.sign_release(&layout, key_name).await,
            None => {
                log::warn!("Key name is not specified. Release file will not be signed.");
                self.remove_signatures(&layout).await
            }
        }
    }

    async fn generate_dist_release(&self, layout: &RepositoryLayout) -> Result<()> {
        let dist_dir = layout.dist_dir();
        let release_path = layout.release_path();
        self.exec(
            &self.apt_ftparchive,
            vec!["release".into(), dist_dir.into_os_string()],
            Some(release_path.as_path()),
        )
        .await
    }

    async fn sign_release(&self, layout: &RepositoryLayout, key_name: &str) -> Result<()> {
        // gpg refuses to overwrite its output in non-interactive mode.
        self.remove_signatures(layout).await?;

        let release_path = layout.release_path().into_os_string();
        self.exec(
            &self.gpg,
            vec![
                "--default-key".into(),
                key_name.into(),
                "-abs".into(),
                "-o".into(),
                layout.release_gpg_path().into_os_string(),
                release_path.clone(),
            ],
            None,
        )
        .await?;
        self.exec(
            &self.gpg,
            vec![
                "--default-key".into(),
                key_name.into(),
                "--clearsign".into(),
                "-o".into(),
                layout.in_release_path().into_os_string(),
                release_path,
            ],
            None,
        )
        .await
    }

    async fn remove_signatures(&self, layout: &RepositoryLayout) -> Result<()> {
        for path in layout.signature_paths() {
            if path_exists(&path).await? {
                if self.dry_run {
                    log::info!("Dry run: not removing {}", path.display());
                } else {
                    log::info!("Remove: {}", path.display());
                    remove_if_exists(&path).await?;
                }
            }
        }
        Ok(())
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if self.dry_run {
            log::info!("Dry run: not writing {}", path.display());
            return Ok(());
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| Error::io(path, e))
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        if self.dry_run || path_exists(path).await? {
            return Ok(());
        }
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| Error::io(path, e))
    }

    async fn exec(
        &self,
        tool: &str,
        args: Vec<std::ffi::OsString>,
        output_path: Option<&Path>,
    ) -> Result<()> {
        if self.dry_run {
            log::info!(
                "Dry run: not executing {} {}",
                tool,
                args.iter()
                    .map(|arg| arg.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" ")
            );
            return Ok(());
        }
        exec_tool_to_file(tool, args, output_path).await
    }
}

async fn path_exists(path: &Path) -> Result<bool> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| Error::io(path, e))
}
