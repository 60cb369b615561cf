//! Chatwoot bridge configuration of the authenticated tenant

use ntex::web;
use serde_json::json;

use crate::{
    api::{self, tenant::ConfigError},
    models::tenant::ChatwootConfig,
    server::{AppState, errors, middleware::tenant_token::AuthenticatedTenant},
};

fn into_web_error(e: ConfigError) -> web::Error {
    match e {
        ConfigError::InvalidUrl(msg) => errors::UserError::FormInputValueError(msg).into(),
        ConfigError::TenantNotFound => errors::UserError::UrlNotFound.into(),
        ConfigError::Store(e) => errors::ServerError::InternalServerError(format!(
            "chatwoot config store raised an error: {e}"
        ))
        .into(),
    }
}

#[web::get("/chatwoot/config")]
pub async fn get_config(
    tenant: AuthenticatedTenant,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let config = api::tenant::get_chatwoot_config(&app_state.repo, tenant.tenant_id)
        .await
        .map_err(into_web_error)?;

    Ok(web::HttpResponse::Ok().json(&config))
}

/// Replaces the whole configuration. Missing fields are stored empty, which
/// disables the bridge.
#[web::put("/chatwoot/config")]
pub async fn update_config(
    tenant: AuthenticatedTenant,
    body: web::types::Json<ChatwootConfig>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let config = body.into_inner();
    api::tenant::update_chatwoot_config(&app_state.repo, tenant.tenant_id, &config)
        .await
        .map_err(into_web_error)?;

    logfire::info!(
        "Chatwoot configuration updated, bridge enabled: {enabled}",
        enabled = config.is_enabled(),
        tenant_id = tenant.tenant_id
    );

    Ok(web::HttpResponse::Ok().json(&json!({
        "status": "success",
        "message": "Chatwoot configuration updated",
    })))
}

#[web::delete("/chatwoot/config")]
pub async fn delete_config(
    tenant: AuthenticatedTenant,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    api::tenant::delete_chatwoot_config(&app_state.repo, tenant.tenant_id)
        .await
        .map_err(into_web_error)?;

    logfire::info!(
        "Chatwoot configuration deleted",
        tenant_id = tenant.tenant_id
    );

    Ok(web::HttpResponse::Ok().json(&json!({
        "status": "success",
        "message": "Chatwoot configuration deleted",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::relay::ChatwootRelay,
        repo::{MockTenantRepo, TenantRepo},
        services::{ChatwootApi, MockChatwootApi, MockSessionRegistry, SessionRegistry},
    };
    use ntex::{http, web::test};
    use std::sync::Arc;

    fn authenticated_repo() -> MockTenantRepo {
        let mut repo = MockTenantRepo::new();
        repo.expect_find_tenant_by_token()
            .returning(|token| Ok((token == "tenant-token").then_some(1)));
        repo
    }

    async fn call(repo: MockTenantRepo, req: test::TestRequest) -> web::WebResponse {
        let repo = Arc::new(repo) as Arc<dyn TenantRepo>;
        let state = AppState {
            relay: ChatwootRelay::new(
                repo.clone(),
                Arc::new(MockChatwootApi::new()) as Arc<dyn ChatwootApi>,
            ),
            repo,
            sessions: Arc::new(MockSessionRegistry::new()) as Arc<dyn SessionRegistry>,
        };

        let app = test::init_service(
            web::App::new()
                .state(state)
                .service((get_config, update_config, delete_config)),
        )
        .await;

        test::call_service(&app, req.to_request()).await
    }

    #[ntex::test]
    async fn test_get_config() {
        let mut repo = authenticated_repo();
        repo.expect_get_chatwoot_config()
            .withf(|tenant_id| *tenant_id == 1)
            .returning(|_| {
                Ok(Some(ChatwootConfig {
                    url: "https://desk.example.com".into(),
                    account_id: "3".into(),
                    token: "secret".into(),
                    inbox_id: "9".into(),
                }))
            });

        let resp = call(
            repo,
            test::TestRequest::get()
                .uri("/chatwoot/config")
                .header("token", "tenant-token"),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(body["chatwoot_url"], "https://desk.example.com");
        assert_eq!(body["chatwoot_inbox_id"], "9");
    }

    #[ntex::test]
    async fn test_unknown_token_is_unauthorized() {
        let resp = call(
            authenticated_repo(),
            test::TestRequest::get()
                .uri("/chatwoot/config")
                .header("token", "someone-else"),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);
    }

    #[ntex::test]
    async fn test_missing_token_is_unauthorized() {
        let mut repo = MockTenantRepo::new();
        repo.expect_find_tenant_by_token().never();

        let resp = call(repo, test::TestRequest::delete().uri("/chatwoot/config")).await;

        assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);
    }

    #[ntex::test]
    async fn test_put_saves_config() {
        let mut repo = authenticated_repo();
        repo.expect_save_chatwoot_config()
            .withf(|tenant_id, config| {
                *tenant_id == 1
                    && config.url == "https://desk.example.com"
                    && config.token == "secret"
                    && config.is_enabled()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let resp = call(
            repo,
            test::TestRequest::put()
                .uri("/chatwoot/config")
                .header("token", "tenant-token")
                .set_json(&json!({
                    "chatwoot_url": "https://desk.example.com",
                    "chatwoot_account_id": "3",
                    "chatwoot_token": "secret",
                    "chatwoot_inbox_id": "9"
                })),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[ntex::test]
    async fn test_put_invalid_url_is_bad_request() {
        let mut repo = authenticated_repo();
        repo.expect_save_chatwoot_config().never();

        let resp = call(
            repo,
            test::TestRequest::put()
                .uri("/chatwoot/config")
                .header("token", "tenant-token")
                .set_json(&json!({"chatwoot_url": "desk.example.com"})),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
    }

    #[ntex::test]
    async fn test_delete_store_error_is_internal() {
        let mut repo = authenticated_repo();
        repo.expect_delete_chatwoot_config()
            .returning(|_| Err(anyhow::anyhow!("database is locked")));

        let resp = call(
            repo,
            test::TestRequest::delete()
                .uri("/chatwoot/config")
                .header("token", "tenant-token"),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
