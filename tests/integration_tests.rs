#![cfg(unix)]

use async_trait::async_trait;
use clap::Parser;
use reqwest::Url;
use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use repo_cook::artifactory::{find_items_query, ArtifactStore, ItemMeta};
use repo_cook::config::Config;
use repo_cook::{cook_repository, Error, Result};

const BASE: &str = "https://art.example.com/artifactory";

/// Artifact store backed by a map of items and side files.
#[derive(Default)]
struct MemoryStore {
    items: HashMap<String, Vec<ItemMeta>>,
    files: HashMap<String, String>,
}

impl MemoryStore {
    /// Publish a package and its side files in the `deb` repository.
    fn publish(&mut self, sha256: &str, name: &str, side_files: &[(&str, &str)]) {
        self.items
            .entry(find_items_query("sha256", sha256))
            .or_default()
            .push(ItemMeta {
                repo: "deb".to_string(),
                path: "pool".to_string(),
                name: name.to_string(),
                extra: Default::default(),
            });
        for (file_name, content) in side_files {
            self.files
                .insert(format!("{}/deb/pool/{}", BASE, file_name), content.to_string());
        }
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn query(&self, aql: &str) -> Result<Vec<ItemMeta>> {
        Ok(self.items.get(aql).cloned().unwrap_or_default())
    }

    fn resolve_uri(&self, item: &ItemMeta) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/{}/{}/{}",
            BASE, item.repo, item.path, item.name
        ))?)
    }

    async fn fetch_text(&self, uri: &Url) -> Option<String> {
        self.files.get(uri.as_str()).cloned()
    }
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(fixture.storage()).unwrap();
        fs::create_dir_all(fixture.tools()).unwrap();

        fixture.write_tool(
            "apt-ftparchive",
            "#!/bin/sh\necho \"apt-ftparchive $*\" >> \"$(dirname \"$0\")/calls\"\nprintf 'Origin: test\\nSuite: stable\\n'\n",
        );
        fixture.write_tool(
            "gpg",
            concat!(
                "#!/bin/sh\n",
                "echo \"gpg $*\" >> \"$(dirname \"$0\")/calls\"\n",
                "out=\"\"\n",
                "while [ $# -gt 0 ]; do\n",
                "  if [ \"$1\" = \"-o\" ]; then out=\"$2\"; shift; fi\n",
                "  shift\n",
                "done\n",
                "echo signed > \"$out\"\n",
            ),
        );
        fixture
    }

    fn storage(&self) -> PathBuf {
        self.dir.path().join("storage")
    }

    fn tools(&self) -> PathBuf {
        self.dir.path().join("tools")
    }

    fn dist(&self) -> PathBuf {
        self.storage().join("dists/stable")
    }

    fn write_tool(&self, name: &str, script: &str) {
        let path = self.tools().join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn tool_calls(&self) -> Vec<String> {
        fs::read_to_string(self.tools().join("calls"))
            .map(|calls| calls.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn add_pointer(&self, relative: &str, sha256: &str) {
        let path = self.storage().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            path,
            format!(
                r#"{{"source": "jfrogart", "oid": {{"kind": "sha256", "value": "{}"}}}}"#,
                sha256
            ),
        )
        .unwrap();
    }

    fn config(&self, extra: &[&str]) -> Config {
        let storage = self.storage();
        let apt_ftparchive = self.tools().join("apt-ftparchive");
        let gpg = self.tools().join("gpg");
        let mut args = vec![
            "repo-cook",
            "-s",
            storage.to_str().unwrap(),
            "--artifactory-host",
            "art.example.com",
            "--artifactory-user",
            "builder",
            "--artifactory-apikey",
            "key",
            "--apt-ftparchive",
            apt_ftparchive.to_str().unwrap(),
            "--gpg",
            gpg.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);
        Config::try_parse_from(args).unwrap()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_unsigned_repository() {
    let fixture = Fixture::new();
    fixture.add_pointer("a.deb", "aaaa");
    let mut store = MemoryStore::default();
    store.publish("aaaa", "a.deb", &[("a.deb.meta", "Architecture: amd64\n")]);

    cook_repository(&fixture.config(&[]), &store).await.unwrap();

    let binary = fixture.dist().join("main/binary-amd64");
    assert_eq!(
        read(&binary.join("Packages")),
        "Architecture: amd64\nFilename: ./a.deb\n"
    );
    assert_eq!(
        read(&binary.join("Release")),
        "Origin: desktop stable\nLabel: desktop stable\nArchive: stable\nArchitecture: amd64\nComponent: main\nCodename: tradingview\n"
    );
    assert_eq!(read(&fixture.dist().join("Release")), "Origin: test\nSuite: stable\n");
    assert!(!fixture.dist().join("Release.gpg").exists());
    assert!(!fixture.dist().join("InRelease").exists());

    let dist = fixture.dist();
    assert_eq!(
        fixture.tool_calls(),
        vec![format!("apt-ftparchive release {}", dist.display())]
    );
}

#[tokio::test]
async fn test_signed_repository() {
    let fixture = Fixture::new();
    fixture.add_pointer("pool/a_1.0_arm64.deb", "aaaa");
    fixture.add_pointer("b_1.0_amd64.deb", "bbbb");
    let mut store = MemoryStore::default();
    store.publish(
        "aaaa",
        "a_1.0_arm64.deb",
        &[
            ("a_1.0_arm64.deb.meta", "Package: a\nArchitecture: arm64\n"),
            ("a_1.0_arm64.changelog", "a (1.0) stable; urgency=low\n"),
        ],
    );
    store.publish("bbbb", "b_1.0_amd64.deb", &[("b_1.0_amd64.deb.meta", "Package: b\n")]);

    cook_repository(&fixture.config(&["-k", "ABCDEF"]), &store)
        .await
        .unwrap();

    let main = fixture.dist().join("main");
    assert_eq!(
        read(&main.join("binary-arm64/Packages")),
        "Package: a\nArchitecture: arm64\nFilename: ./pool/a_1.0_arm64.deb\n"
    );
    assert_eq!(
        read(&main.join("binary-amd64/Packages")),
        "Package: b\nFilename: ./b_1.0_amd64.deb\n"
    );
    assert_eq!(
        read(&fixture.storage().join("pool/a_1.0_arm64.changelog")),
        "a (1.0) stable; urgency=low\n"
    );
    assert_eq!(read(&fixture.dist().join("Release.gpg")), "signed\n");
    assert_eq!(read(&fixture.dist().join("InRelease")), "signed\n");

    let release = fixture.dist().join("Release");
    let calls = fixture.tool_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[1],
        format!(
            "gpg --default-key ABCDEF -abs -o {} {}",
            fixture.dist().join("Release.gpg").display(),
            release.display()
        )
    );
    assert_eq!(
        calls[2],
        format!(
            "gpg --default-key ABCDEF --clearsign -o {} {}",
            fixture.dist().join("InRelease").display(),
            release.display()
        )
    );
}

#[tokio::test]
async fn test_second_run_keeps_release_and_changelog() {
    let fixture = Fixture::new();
    fixture.add_pointer("a.deb", "aaaa");
    let mut store = MemoryStore::default();
    store.publish(
        "aaaa",
        "a.deb",
        &[("a.deb.meta", "Package: a\n"), ("a.changelog", "first\n")],
    );

    cook_repository(&fixture.config(&["-k", "ABCDEF"]), &store)
        .await
        .unwrap();

    let release = fixture.dist().join("main/binary-amd64/Release");
    let changelog = fixture.storage().join("a.changelog");
    fs::write(&release, "custom release\n").unwrap();

    store
        .files
        .insert(format!("{}/deb/pool/a.deb.meta", BASE), "Package: a\nVersion: 2\n".to_string());
    store
        .files
        .insert(format!("{}/deb/pool/a.changelog", BASE), "second\n".to_string());

    // Unsigned this time: stale signatures go away.
    cook_repository(&fixture.config(&[]), &store).await.unwrap();

    assert_eq!(read(&release), "custom release\n");
    assert_eq!(read(&changelog), "first\n");
    assert_eq!(
        read(&fixture.dist().join("main/binary-amd64/Packages")),
        "Package: a\nVersion: 2\nFilename: ./a.deb\n"
    );
    assert!(!fixture.dist().join("Release.gpg").exists());
    assert!(!fixture.dist().join("InRelease").exists());
}

#[tokio::test]
async fn test_separate_repository_root() {
    let fixture = Fixture::new();
    fixture.add_pointer("a.deb", "aaaa");
    let mut store = MemoryStore::default();
    store.publish("aaaa", "a.deb", &[("a.deb.meta", "Package: a\n")]);

    let repo = fixture.dir.path().join("repo");
    cook_repository(&fixture.config(&["-r", repo.to_str().unwrap()]), &store)
        .await
        .unwrap();

    assert!(repo.join("dists/stable/main/binary-amd64/Packages").exists());
    assert!(!fixture.dist().exists());
}

#[tokio::test]
async fn test_changelog_under_separate_repository_root() {
    let fixture = Fixture::new();
    fixture.add_pointer("pool/a.deb", "aaaa");
    let mut store = MemoryStore::default();
    store.publish(
        "aaaa",
        "a.deb",
        &[("a.deb.meta", "Package: a\n"), ("a.changelog", "a (1.0) stable; urgency=low\n")],
    );

    let repo = fixture.dir.path().join("repo");
    fs::create_dir_all(&repo).unwrap();
    cook_repository(&fixture.config(&["-r", repo.to_str().unwrap()]), &store)
        .await
        .unwrap();

    assert_eq!(
        read(&repo.join("pool/a.changelog")),
        "a (1.0) stable; urgency=low\n"
    );
    assert_eq!(
        read(&repo.join("dists/stable/main/binary-amd64/Packages")),
        "Package: a\nFilename: ./pool/a.deb\n"
    );
    assert!(!fixture.storage().join("pool/a.changelog").exists());
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
    let fixture = Fixture::new();
    fixture.add_pointer("a.deb", "aaaa");
    let mut store = MemoryStore::default();
    store.publish(
        "aaaa",
        "a.deb",
        &[("a.deb.meta", "Package: a\n"), ("a.changelog", "changes\n")],
    );

    cook_repository(&fixture.config(&["-n", "-k", "ABCDEF"]), &store)
        .await
        .unwrap();

    let mut names: Vec<_> = fs::read_dir(fixture.storage())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.deb"]);
    assert!(fixture.tool_calls().is_empty());
}

#[tokio::test]
async fn test_missing_meta_writes_nothing() {
    let fixture = Fixture::new();
    fixture.add_pointer("a.deb", "aaaa");
    fixture.add_pointer("b.deb", "bbbb");
    let mut store = MemoryStore::default();
    store.publish("aaaa", "a.deb", &[("a.deb.meta", "Package: a\n"), ("a.changelog", "x\n")]);
    store.publish("bbbb", "b.deb", &[]);

    let err = cook_repository(&fixture.config(&[]), &store)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidMeta(ref path) if path == "./b.deb"));
    assert!(!fixture.dist().exists());
    assert!(!fixture.storage().join("a.changelog").exists());
}

#[tokio::test]
async fn test_package_type_detection_failures() {
    let fixture = Fixture::new();
    let store = MemoryStore::default();

    let err = cook_repository(&fixture.config(&[]), &store)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoPackagesFound));

    fixture.add_pointer("a.deb", "aaaa");
    fixture.add_pointer("b.rpm", "bbbb");
    let err = cook_repository(&fixture.config(&[]), &store)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AmbiguousPackageType));
}

#[tokio::test]
async fn test_rpm_is_not_implemented() {
    let fixture = Fixture::new();
    fixture.add_pointer("a.rpm", "aaaa");
    let mut store = MemoryStore::default();
    store.publish("aaaa", "a.rpm", &[("a.rpm.meta", "Name: a\n")]);

    let err = cook_repository(&fixture.config(&[]), &store)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotImplemented(_)));
}

#[tokio::test]
async fn test_missing_storage_root() {
    let fixture = Fixture::new();
    let missing = fixture.dir.path().join("missing");
    let mut config = fixture.config(&[]);
    config.storage_root = missing;

    let err = cook_repository(&config, &MemoryStore::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DirectoryMissing(_)));
}

#[tokio::test]
async fn test_unresolvable_pointer_aborts() {
    let fixture = Fixture::new();
    fixture.add_pointer("a.deb", "aaaa");

    let err = cook_repository(&fixture.config(&[]), &MemoryStore::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ItemNotFound { .. }));
    assert!(!fixture.dist().exists());
}
