// App state for Axum server
use std::sync::Arc;

use github_store::UserStore;

#[derive(Clone)]
pub struct AppState {
    /// `None` when no GitHub credential was configured at startup; every
    /// user-list request is then rejected without a remote call.
    pub store: Option<Arc<dyn UserStore>>,
}
