//! WhatsApp webhook endpoint handlers
//!
//! Verification endpoint (GET) and event receiver (POST) of the WhatsApp
//! Business Cloud API webhook.

use super::{handler, schemas};
use crate::{
    config,
    server::{AppState, errors},
};
use ntex::{util::Bytes, web};
use serde::Deserialize;

/// `hub.*` parameters of the Meta verification handshake
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: String,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: String,
    /// Echoed back when the token matches
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
}

fn is_valid_verification(query: &VerifyQuery, expected_token: &str) -> bool {
    query.mode == "subscribe" && !expected_token.is_empty() && query.verify_token == expected_token
}

/// Webhook verification endpoint (GET)
///
/// # Returns
/// - 200 with challenge string if verification succeeds
/// - 401 if verification fails
#[web::get("")]
pub async fn verify(
    query: web::types::Query<VerifyQuery>,
) -> Result<impl web::Responder, web::Error> {
    let app_config = config::APP_CONFIG.get().ok_or_else(|| {
        errors::ServerError::InternalServerError("app config not initialized".into())
    })?;

    if !is_valid_verification(&query, &app_config.whatsapp_verify_token) {
        logfire::warn!("WhatsApp webhook verification rejected");
        return Err(errors::UserError::Unauthorized.into());
    }

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(query.challenge.clone()))
}

/// Webhook receiver endpoint (POST)
///
/// Text messages are handed to the Chatwoot relay in the background. WhatsApp
/// only needs to know the event arrived, so the answer is always 200.
#[web::post("")]
pub async fn receive(
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let payload: schemas::WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            logfire::error!(
                "Failed to parse webhook payload: {error}",
                error = e.to_string()
            );
            return Ok(received());
        }
    };

    let relayed = handler::process_webhook(payload, &app_state.repo, &app_state.relay).await;
    tracing::debug!(relayed = %relayed, "whatsapp webhook processed");

    Ok(received())
}

fn received() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "received"
    }))
}
