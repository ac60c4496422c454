// Shared data types
use serde::Deserialize;
use serde_json::Value;

/// HTTP request payload for the user-list update endpoint.
///
/// All three fields are required; absence of any one rejects the request
/// before the store is contacted. The contents of `users` are not
/// validated beyond presence.
#[derive(Debug, Deserialize)]
pub struct UpdateUsersRequest {
    #[serde(default)]
    pub users: Option<Value>,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default, rename = "commitMessage")]
    pub commit_message: Option<String>,
}
