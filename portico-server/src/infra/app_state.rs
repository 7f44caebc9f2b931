use std::{fmt, sync::Arc};

use portico_core::repository::UserRepository;
use portico_core::session::SessionStore;

use crate::auth::policy::AccessPolicy;
use crate::infra::config::Config;

/// Shared application state. Repositories and the session store are trait
/// objects so tests can run against the in-memory adapters.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub policy: Arc<AccessPolicy>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config,
            users,
            sessions,
            policy: Arc::new(AccessPolicy::default()),
        }
    }
}
