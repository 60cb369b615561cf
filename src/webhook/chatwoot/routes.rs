//! Chatwoot webhook endpoint
//!
//! Chatwoot retries deliveries answered with anything other than 2xx, so this
//! endpoint answers 200 whatever happens to the event.

use super::{handler, schemas};
use crate::server::AppState;
use ntex::{util::Bytes, web};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    #[serde(default)]
    pub token: Option<String>,
}

fn received() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "received"
    }))
}

/// Tenant token from the webhook url, if any. Malformed queries are treated as
/// no token at all.
fn url_token(req: &web::HttpRequest) -> Option<String> {
    web::types::Query::<WebhookQuery>::from_query(req.query_string())
        .ok()
        .and_then(|query| query.into_inner().token)
        .filter(|token| !token.trim().is_empty())
}

/// Webhook receiver endpoint (POST)
///
/// The body is parsed by hand so an unexpected payload still gets a 200.
#[web::post("/chatwoot/webhook")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let payload: schemas::WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            logfire::warn!(
                "Failed to parse chatwoot webhook payload: {error}",
                error = e.to_string()
            );
            return Ok(received());
        }
    };

    let token = url_token(&req);
    let outcome = handler::process_webhook(
        &payload,
        token.as_deref(),
        &app_state.repo,
        &app_state.sessions,
    )
    .await;

    tracing::debug!(outcome = ?outcome, "chatwoot webhook processed");

    Ok(received())
}
