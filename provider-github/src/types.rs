//! GitHub REST API response types
//!
//! Only the fields the connector reads are modelled; serde ignores the rest.

use serde::Deserialize;

/// Release resource
///
/// See: https://docs.github.com/en/rest/releases/releases#get-a-release-by-tag-name
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRelease {
    /// Numeric release id, used to page through its assets
    pub id: u64,
}

/// Release asset resource
///
/// See: https://docs.github.com/en/rest/releases/assets#list-release-assets
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubAsset {
    /// Numeric asset id, used for deletion
    pub id: u64,

    /// File name
    pub name: String,

    /// Size in bytes
    pub size: u64,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
pub struct GitHubErrorBody {
    pub message: String,
}
