//! JFrog Artifactory access.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::config::ArtifactoryArgs;
use crate::error::Result;

const USER_AGENT: &str = concat!("repo-cook/", env!("CARGO_PKG_VERSION"));

/// An item as returned by an AQL query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Repository holding the item.
    pub repo: String,
    /// Directory of the item inside the repository, `.` for the root.
    pub path: String,
    /// File name.
    pub name: String,
    /// Any further properties included in the query.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResult<T> {
    results: Vec<T>,
}

/// AQL expression finding the items whose `kind` property equals `value`.
pub fn find_items_query(kind: &str, value: &str) -> String {
    let quote = |s: &str| serde_json::Value::String(s.to_string()).to_string();
    format!("items.find({{{}: {}}}).include(\"*\")", quote(kind), quote(value))
}

/// Remote store holding package binaries and their metadata.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Run a query and return the matching items.
    async fn query(&self, aql: &str) -> Result<Vec<ItemMeta>>;

    /// Download URI of an item.
    fn resolve_uri(&self, item: &ItemMeta) -> Result<Url>;

    /// Fetch a text document. Any failure yields `None`.
    async fn fetch_text(&self, uri: &Url) -> Option<String>;
}

#[derive(Debug, Clone)]
pub enum Credentials {
    None,
    ApiKey { user: String, api_key: String },
}

impl Credentials {
    fn set_credentials(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Credentials::None => builder,
            Credentials::ApiKey { user, api_key } => builder
                .basic_auth(user, Some(api_key))
                .header("X-JFrog-Art-Api", api_key),
        }
    }
}

/// Artifactory REST client.
#[derive(Debug, Clone)]
pub struct ArtifactoryClient {
    client: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl ArtifactoryClient {
    /// Create a client for the Artifactory instance at `base_url`
    /// (e.g. `https://example.com/artifactory/`).
    pub fn new(mut base_url: Url, credentials: Credentials) -> Result<Self> {
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Create a client from command line arguments.
    pub fn from_args(args: &ArtifactoryArgs) -> Result<Self> {
        let base_url = Url::parse(&format!(
            "{}://{}/artifactory/",
            args.artifactory_protocol, args.artifactory_host
        ))?;
        Self::new(
            base_url,
            Credentials::ApiKey {
                user: args.artifactory_user.clone(),
                api_key: args.artifactory_apikey.clone(),
            },
        )
    }

    /// Base URL of the Artifactory instance.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl ArtifactStore for ArtifactoryClient {
    async fn query(&self, aql: &str) -> Result<Vec<ItemMeta>> {
        let url = self.base_url.join("api/search/aql")?;
        log::debug!("Sending AQL query to {}: {}", url, aql);

        let builder = self
            .client
            .post(url)
            .header("Content-Type", "text/plain")
            .body(aql.to_string());
        let response = self
            .credentials
            .set_credentials(builder)
            .send()
            .await?
            .error_for_status()?;

        let result: QueryResult<ItemMeta> = response.json().await?;
        Ok(result.results)
    }

    fn resolve_uri(&self, item: &ItemMeta) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty().push(&item.repo);
            if item.path != "." {
                segments.extend(item.path.split('/').filter(|s| !s.is_empty()));
            }
            segments.push(&item.name);
        }
        Ok(url)
    }

    async fn fetch_text(&self, uri: &Url) -> Option<String> {
        let builder = self.client.get(uri.clone());
        let response = match self.credentials.set_credentials(builder).send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("Fetching {} failed: {}", uri, e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            log::debug!("Fetching {} returned {}", uri, response.status());
            return None;
        }

        response.text().await.ok()
    }
}
