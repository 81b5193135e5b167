use axum::Router;
use db::DBService;
use services::services::contact_store::ContactStore;

pub mod config;
pub mod error;
pub mod routes;

use crate::config::ServerConfig;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    contacts: ContactStore,
}

impl AppState {
    pub fn new(db: DBService) -> Self {
        let contacts = ContactStore::new(db.pool.clone());
        Self { db, contacts }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn contacts(&self) -> &ContactStore {
        &self.contacts
    }
}

/// The full HTTP application, ready to serve.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    routes::router(config.cors_layer()).with_state(state)
}
