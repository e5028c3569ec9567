//! GitHub Releases API connector
//!
//! Implements the `ReleaseAssetStore` trait for the assets of one release.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::storage::{ReleaseAssetStore, RemoteAsset};
use core_runtime::config::ReleaseTarget;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::GitHubError;
use crate::types::{GitHubAsset, GitHubErrorBody, GitHubRelease};

/// GitHub REST API base URL
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// REST API version the connector is written against
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Maximum assets per page (GitHub API limit)
const ASSETS_PER_PAGE: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub release asset connector
///
/// Lists and deletes the assets of the release identified by a
/// [`ReleaseTarget`]. Each API call is sent once, with no internal retry.
///
/// # Example
///
/// ```ignore
/// use provider_github::GitHubReleaseConnector;
/// use bridge_traits::storage::ReleaseAssetStore;
///
/// let connector = GitHubReleaseConnector::new(http_client, token, target);
/// let assets = connector.list_assets().await?;
/// ```
pub struct GitHubReleaseConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Bearer token with `contents: write` permission
    token: String,

    /// Release whose assets are managed
    target: ReleaseTarget,

    /// API base, overridable for GitHub Enterprise
    api_base: String,
}

impl GitHubReleaseConnector {
    /// Create a new connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `token` - bearer credential presented on every request
    /// * `target` - owner, repository and tag of the release
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        token: impl Into<String>,
        target: ReleaseTarget,
    ) -> Self {
        Self {
            http_client,
            token: token.into(),
            target,
            api_base: GITHUB_API_BASE.to_string(),
        }
    }

    /// Use a different API base, e.g. `https://github.example.com/api/v3`
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn target(&self) -> &ReleaseTarget {
        &self.target
    }

    fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_base,
            urlencoding::encode(&self.target.owner),
            urlencoding::encode(&self.target.repo)
        )
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest::new(method, url)
            .bearer_token(self.token.as_str())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .timeout(REQUEST_TIMEOUT)
    }

    /// Send a request exactly once.
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, GitHubError> {
        let response = self.http_client.execute(request).await?;
        debug!(status = response.status, "GitHub API responded");
        Ok(response)
    }

    fn api_error(response: &HttpResponse) -> GitHubError {
        let message = serde_json::from_slice::<GitHubErrorBody>(&response.body)
            .map(|body| body.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).to_string());

        GitHubError::ApiError {
            status_code: response.status,
            message,
        }
    }

    /// Look up the release by tag
    #[instrument(skip(self), fields(tag = %self.target.tag))]
    async fn fetch_release(&self) -> std::result::Result<GitHubRelease, GitHubError> {
        let url = format!(
            "{}/releases/tags/{}",
            self.repo_url(),
            urlencoding::encode(&self.target.tag)
        );

        let response = self.send(self.request(HttpMethod::Get, url)).await?;

        match response.status {
            200 => serde_json::from_slice(&response.body).map_err(|e| {
                GitHubError::ParseError(format!("Failed to parse release: {}", e))
            }),
            404 => Err(GitHubError::ReleaseNotFound {
                owner: self.target.owner.clone(),
                repo: self.target.repo.clone(),
                tag: self.target.tag.clone(),
            }),
            _ => Err(Self::api_error(&response)),
        }
    }

    /// Fetch every asset of a release, following pagination
    async fn fetch_assets(
        &self,
        release_id: u64,
    ) -> std::result::Result<Vec<GitHubAsset>, GitHubError> {
        let mut assets = Vec::new();
        let mut page = 1;

        loop {
            let url = format!(
                "{}/releases/{}/assets?per_page={}&page={}",
                self.repo_url(),
                release_id,
                ASSETS_PER_PAGE,
                page
            );

            let response = self.send(self.request(HttpMethod::Get, url)).await?;
            if response.status != 200 {
                return Err(Self::api_error(&response));
            }

            let batch: Vec<GitHubAsset> = serde_json::from_slice(&response.body).map_err(|e| {
                GitHubError::ParseError(format!("Failed to parse asset list: {}", e))
            })?;

            let last_page = batch.len() < ASSETS_PER_PAGE;
            assets.extend(batch);
            if last_page {
                return Ok(assets);
            }
            page += 1;
        }
    }
}

impl fmt::Debug for GitHubReleaseConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubReleaseConnector")
            .field("target", &self.target)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ReleaseAssetStore for GitHubReleaseConnector {
    #[instrument(skip(self), fields(owner = %self.target.owner, repo = %self.target.repo, tag = %self.target.tag))]
    async fn list_assets(&self) -> Result<Vec<RemoteAsset>> {
        let release = self.fetch_release().await?;
        let assets = self.fetch_assets(release.id).await?;

        let remote: Vec<RemoteAsset> = assets
            .into_iter()
            .map(|asset| RemoteAsset::new(asset.id.to_string(), asset.name, asset.size))
            .collect();

        info!(release_id = release.id, assets = remote.len(), "Listed release assets");
        Ok(remote)
    }

    #[instrument(skip(self), fields(asset_id = %asset_id))]
    async fn delete_asset(&self, asset_id: &str) -> Result<()> {
        let url = format!(
            "{}/releases/assets/{}",
            self.repo_url(),
            urlencoding::encode(asset_id)
        );

        let response = self.send(self.request(HttpMethod::Delete, url)).await?;

        if response.status == 204 {
            info!("Deleted release asset");
            Ok(())
        } else {
            warn!(status = response.status, "Asset deletion rejected");
            Err(Self::api_error(&response).into())
        }
    }
}
