//! # Chatwoot Webhook Handler
//!
//! Relays agent replies written in Chatwoot to the contact's WhatsApp chat.
//! Every outcome is reported back to the route, which always answers 200.

use super::schemas::WebhookPayload;
use crate::{
    api::tenant::{TenantLookup, resolve_tenant},
    consts, metric,
    models::jid,
    repo,
    services::ImplSessionRegistry,
};
use derive_more::{Display, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IgnoreReason {
    #[display("event is not message_created")]
    NotMessageCreated,
    #[display("message is not outgoing")]
    NotOutgoing,
    #[display("message was written by the contact")]
    SentByContact,
    #[display("private note")]
    Private,
    #[display("empty content")]
    EmptyContent,
}

#[derive(Debug, PartialEq, Eq)]
pub enum InboundOutcome {
    Ignored(IgnoreReason),
    TenantNotFound,
    MissingRecipient,
    SessionUnavailable,
    SendFailed,
    Sent { tenant_id: i64, to: String },
}

#[derive(Debug, Display, Error)]
pub enum SendError {
    #[display("whatsapp session unavailable")]
    SessionUnavailable,
    #[display("failed to send whatsapp message: {_0}")]
    Failed(#[error(not(source))] anyhow::Error),
}

/// Only agent replies are relayed. Anything Chatwoot echoes back from the
/// contact side would loop the message into WhatsApp again.
pub fn ignore_reason(payload: &WebhookPayload) -> Option<IgnoreReason> {
    if payload.event() != consts::CHATWOOT_EVENT_MESSAGE_CREATED {
        return Some(IgnoreReason::NotMessageCreated);
    }

    if payload.message_type() != "outgoing" {
        return Some(IgnoreReason::NotOutgoing);
    }

    if payload
        .sender_type()
        .to_lowercase()
        .contains(consts::CHATWOOT_SENDER_CONTACT)
    {
        return Some(IgnoreReason::SentByContact);
    }

    if payload.is_private() {
        return Some(IgnoreReason::Private);
    }

    if payload
        .content
        .as_deref()
        .is_none_or(|content| content.trim().is_empty())
    {
        return Some(IgnoreReason::EmptyContent);
    }

    None
}

/// Sends a text through the tenant's live session.
pub async fn send_to_whatsapp(
    sessions: &ImplSessionRegistry,
    tenant_id: i64,
    to: &str,
    body: &str,
) -> Result<(), SendError> {
    let session = sessions
        .get(tenant_id)
        .await
        .filter(|session| session.is_connected())
        .ok_or(SendError::SessionUnavailable)?;

    session.send_text(to, body).await.map_err(SendError::Failed)
}

pub async fn process_webhook(
    payload: &WebhookPayload,
    url_token: Option<&str>,
    repo: &repo::ImplTenantRepo,
    sessions: &ImplSessionRegistry,
) -> InboundOutcome {
    if let Some(reason) = ignore_reason(payload) {
        tracing::debug!(reason = %reason, "chatwoot webhook ignored");
        return InboundOutcome::Ignored(reason);
    }

    let account_id = payload.account_id().unwrap_or_default();
    let lookups = [
        TenantLookup::ChatwootAccount(&account_id),
        TenantLookup::Token(url_token.unwrap_or_default()),
    ];

    let Some(tenant_id) = resolve_tenant(repo, &lookups).await else {
        logfire::warn!(
            "No tenant for chatwoot webhook of account {account_id}",
            account_id = account_id
        );
        metric::incr_relay_statds("to_whatsapp", "tenant_not_found");
        return InboundOutcome::TenantNotFound;
    };

    let Some(source_id) = payload.recipient_source_id() else {
        logfire::warn!(
            "Chatwoot webhook without recipient",
            tenant_id = tenant_id,
            message_id = payload.id.unwrap_or_default()
        );
        metric::incr_relay_statds("to_whatsapp", "missing_recipient");
        return InboundOutcome::MissingRecipient;
    };

    let to = jid::to_user_jid(source_id);
    let content = payload.content.as_deref().unwrap_or_default();

    match send_to_whatsapp(sessions, tenant_id, &to, content).await {
        Ok(()) => {
            metric::incr_relay_statds("to_whatsapp", "relayed");
            logfire::info!(
                "Chatwoot reply sent to {to}",
                to = to.clone(),
                tenant_id = tenant_id
            );
            InboundOutcome::Sent { tenant_id, to }
        }
        Err(SendError::SessionUnavailable) => {
            metric::incr_relay_statds("to_whatsapp", "session_unavailable");
            logfire::warn!(
                "WhatsApp session unavailable, chatwoot reply dropped",
                tenant_id = tenant_id
            );
            InboundOutcome::SessionUnavailable
        }
        Err(e) => {
            metric::incr_relay_statds("to_whatsapp", "failed");
            logfire::error!(
                "Chatwoot reply not delivered: {error}",
                error = e.to_string(),
                tenant_id = tenant_id
            );
            InboundOutcome::SendFailed
        }
    }
}
