//! HTTP surface of the bridge: shared state, error rendering, tenant
//! authentication and the tenant facing endpoints.

pub mod chatwoot_config;
pub mod errors;
pub mod events;
pub mod middleware;
pub mod routes;

use crate::{api::relay::ChatwootRelay, repo, services};

#[derive(Clone)]
pub struct AppState {
    pub repo: repo::ImplTenantRepo,
    pub relay: ChatwootRelay,
    pub sessions: services::ImplSessionRegistry,
}

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<ntex::web::HttpResponse, ntex::web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}
