//! GitHub-backed storage for the relayed user list.
//!
//! This crate provides:
//! - [`StoreSource`] config enum for choosing between mock and live stores
//! - [`UserStore`] trait for abstracting access to the stored document
//! - [`GithubStore`] production client backed by the GitHub contents API
//! - [`MockStore`] mock client for testing without network access
//!
//! ## Usage with StoreSource (Recommended)
//!
//! ```ignore
//! use github_store::StoreSource;
//! use serde_json::json;
//!
//! // Development/testing: use an in-memory document
//! let store = StoreSource::mock(json!([]), "abc123").into_store();
//!
//! // Production: use the GitHub contents API
//! let store = StoreSource::live("ghp_token", "owner/repo", "users.json").into_store();
//!
//! // Use the store
//! let document = store.read_users().await?;
//! let new_sha = store.write_users(&document.users, &document.sha, "update users").await?;
//! ```

mod mock;

pub use mock::MockStore;

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{header, Client as ReqwestClient, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("github-store/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("reqwest error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication rejected by remote store")]
    Auth,
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("revision mismatch: document changed since it was read")]
    RevisionMismatch,
    #[error("unexpected status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// The stored user list together with the revision it was read at.
///
/// `users` is treated as an opaque JSON document; nothing in this crate
/// validates its shape. `sha` must be presented on the next write.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDocument {
    pub users: Value,
    pub sha: String,
}

/// Trait for reading and writing the stored user list.
///
/// This trait abstracts the remote store to enable dependency injection
/// and mocking for testing. Production code uses [`GithubStore`], while
/// tests can use [`MockStore`].
///
/// The `sha` passed to [`UserStore::write_users`] is an optimistic-concurrency
/// guard: the store rejects a write whose sha no longer matches the current
/// revision. No retry happens here; a read-modify-write retry loop is the
/// caller's policy.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch and decode the stored user list.
    ///
    /// Returns the parsed document together with the sha of the revision
    /// it was read from.
    async fn read_users(&self) -> Result<UserDocument>;

    /// Serialize and commit an updated user list.
    ///
    /// `sha` must be the revision obtained from the most recent read.
    /// Returns the sha of the newly committed revision.
    async fn write_users(&self, users: &Value, sha: &str, message: &str) -> Result<String>;
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
}

#[derive(Deserialize)]
struct UpdateResponse {
    content: CommittedContent,
}

#[derive(Deserialize)]
struct CommittedContent {
    sha: String,
}

/// Production store backed by the GitHub contents API.
///
/// Reads and writes a single file in a repository, using the file's blob
/// sha for optimistic concurrency.
///
/// # Example
///
/// ```ignore
/// use github_store::GithubStore;
///
/// let store = GithubStore::new("ghp_token", "owner/repo", "users.json");
/// let document = store.read_users().await?;
/// ```
pub struct GithubStore {
    http: ReqwestClient,
    token: String,
    base_url: String,
    repo: String,
    path: String,
}

impl GithubStore {
    pub fn new(token: &str, repo: &str, path: &str) -> Self {
        Self::with_base_url(token, repo, path, GITHUB_API_URL)
    }

    /// Create a store pointed at an alternate API base URL.
    ///
    /// Tests use this to stand a local mock server in for api.github.com.
    pub fn with_base_url(token: &str, repo: &str, path: &str, base_url: &str) -> Self {
        GithubStore {
            http: ReqwestClient::new(),
            token: token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            path: path.to_string(),
        }
    }

    fn contents_url(&self) -> String {
        format!("{}/repos/{}/contents/{}", self.base_url, self.repo, self.path)
    }

    fn authorization(&self) -> String {
        format!("token {}", self.token)
    }

    /// Map a non-success GitHub status to a tagged error.
    ///
    /// The contents API answers 409 when the sha presented on write no
    /// longer matches the current blob.
    async fn remote_error(&self, status: StatusCode, response: reqwest::Response) -> StoreError {
        let message = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Auth,
            StatusCode::NOT_FOUND => StoreError::NotFound(format!("{}/{}", self.repo, self.path)),
            StatusCode::CONFLICT => StoreError::RevisionMismatch,
            _ => StoreError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl UserStore for GithubStore {
    async fn read_users(&self) -> Result<UserDocument> {
        let response = self
            .http
            .get(self.contents_url())
            .header(header::AUTHORIZATION, self.authorization())
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.remote_error(status, response).await);
        }

        let contents: ContentsResponse = response.json().await?;
        let text = decode_content(&contents.content)?;
        let users = serde_json::from_str(&text)?;

        Ok(UserDocument {
            users,
            sha: contents.sha,
        })
    }

    async fn write_users(&self, users: &Value, sha: &str, message: &str) -> Result<String> {
        let text = serde_json::to_string_pretty(users)?;
        let request = UpdateRequest {
            message,
            content: general_purpose::STANDARD.encode(text),
            sha,
        };

        let response = self
            .http
            .put(self.contents_url())
            .header(header::AUTHORIZATION, self.authorization())
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .header(header::USER_AGENT, USER_AGENT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.remote_error(status, response).await);
        }

        let committed: UpdateResponse = response.json().await?;
        Ok(committed.content.sha)
    }
}

/// Decode a base64 content payload from the contents API.
///
/// GitHub wraps the encoded payload in newlines, which the strict
/// engine rejects, so whitespace is stripped first.
fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.split_ascii_whitespace().collect();
    let bytes = general_purpose::STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}

/// Configuration for the user-list store.
///
/// Use this to explicitly choose between mock and live stores, following
/// the same pattern as `IpfsSource` and `CacheSource`.
///
/// # Example
///
/// ```ignore
/// use github_store::StoreSource;
/// use serde_json::json;
///
/// // Development/testing: seed an in-memory document
/// let store = StoreSource::mock(json!([]), "abc123").into_store();
///
/// // Production: use the GitHub contents API
/// let store = StoreSource::live("ghp_token", "owner/repo", "users.json").into_store();
/// ```
#[derive(Debug, Clone)]
pub enum StoreSource {
    /// Use an in-memory store seeded with the given document and sha.
    Mock { users: Value, sha: String },

    /// Use the GitHub contents API.
    Live {
        /// Personal access token presented on every request.
        token: String,
        /// Repository in `owner/name` form.
        repo: String,
        /// Path of the stored file within the repository.
        path: String,
    },
}

impl StoreSource {
    /// Create a mock store source seeded with the given document.
    pub fn mock(users: Value, sha: impl Into<String>) -> Self {
        Self::Mock {
            users,
            sha: sha.into(),
        }
    }

    /// Create a live store source for the given repository file.
    pub fn live(
        token: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::Live {
            token: token.into(),
            repo: repo.into(),
            path: path.into(),
        }
    }

    /// Create the appropriate UserStore implementation.
    pub fn into_store(self) -> Arc<dyn UserStore> {
        match self {
            Self::Mock { users, sha } => Arc::new(MockStore::with_document(users, sha)),
            Self::Live { token, repo, path } => Arc::new(GithubStore::new(&token, &repo, &path)),
        }
    }
}
