//! # WhatsApp Webhook Handler
//!
//! Turns Cloud API webhook events into relay events for Chatwoot. The tenant
//! is the owner of the business phone number that received the message.

use super::schemas::{Change, Message, WebhookPayload};
use crate::{
    api::relay::{ChatwootRelay, WhatsAppEvent},
    models::jid,
    repo,
};

/// Changes carrying messages or statuses
fn message_changes(payload: &WebhookPayload) -> impl Iterator<Item = &Change> {
    payload
        .entry
        .iter()
        .flat_map(|entry| &entry.changes)
        .filter(|change| change.field == "messages")
}

fn text_body(message: &Message) -> Option<&str> {
    if message.msg_type != "text" {
        return None;
    }

    message
        .text
        .as_ref()
        .map(|text| text.body.as_str())
        .filter(|body| !body.trim().is_empty())
}

async fn find_tenant(repo: &repo::ImplTenantRepo, phone_number_id: &str) -> Option<i64> {
    repo.find_tenant_by_phone_number_id(phone_number_id)
        .await
        .unwrap_or_else(|e| {
            logfire::error!(
                "Failed to find tenant of phone number {phone_number_id}: {error}",
                phone_number_id = phone_number_id.to_string(),
                error = e.to_string()
            );
            None
        })
}

/// Builds one relay event per text message of a known tenant.
pub async fn collect_relay_events(
    payload: &WebhookPayload,
    repo: &repo::ImplTenantRepo,
) -> Vec<WhatsAppEvent> {
    let mut events = Vec::new();

    for change in message_changes(payload) {
        let value = &change.value;

        for status in &value.statuses {
            tracing::debug!(
                message_id = %status.id,
                status = %status.status,
                "whatsapp status update"
            );
        }

        if value.messages.is_empty() {
            continue;
        }

        let phone_number_id = value.metadata.phone_number_id.as_str();
        let Some(tenant_id) = find_tenant(repo, phone_number_id).await else {
            logfire::warn!(
                "No tenant owns phone number {phone_number_id}",
                phone_number_id = phone_number_id.to_string()
            );
            continue;
        };

        for message in &value.messages {
            let Some(body) = text_body(message) else {
                logfire::debug!(
                    "Unsupported message type received: {type}",
                    r#type = &message.msg_type
                );
                continue;
            };

            events.push(WhatsAppEvent {
                tenant_id,
                contact_jid: jid::to_user_jid(&message.from),
                contact_name: value
                    .contact_name(&message.from)
                    .unwrap_or_default()
                    .to_string(),
                text: body.to_string(),
                is_outgoing: false,
            });
        }
    }

    events
}

/// Main webhook processor
///
/// Each message is relayed on its own task, the webhook answer does not wait
/// for Chatwoot.
pub async fn process_webhook(
    payload: WebhookPayload,
    repo: &repo::ImplTenantRepo,
    relay: &ChatwootRelay,
) -> usize {
    let events = collect_relay_events(&payload, repo).await;
    let count = events.len();

    for event in events {
        relay.spawn(event);
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{MockTenantRepo, TenantRepo};
    use std::sync::Arc;

    fn payload(messages: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(serde_json::json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "102290129340398",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "metadata": {"display_phone_number": "15550783881", "phone_number_id": "106540352242922"},
                        "contacts": [{"profile": {"name": "Ana"}, "wa_id": "5511999"}],
                        "messages": messages
                    }
                }]
            }]
        }))
        .unwrap()
    }

    fn repo(tenant_id: Option<i64>) -> repo::ImplTenantRepo {
        let mut repo = MockTenantRepo::new();
        repo.expect_find_tenant_by_phone_number_id()
            .withf(|phone_number_id| phone_number_id == "106540352242922")
            .returning(move |_| Ok(tenant_id));
        Arc::new(repo) as Arc<dyn TenantRepo>
    }

    #[ntex::test]
    async fn test_text_message_becomes_incoming_event() {
        let payload = payload(serde_json::json!([{
            "from": "5511999",
            "id": "wamid.1",
            "timestamp": "1749416383",
            "type": "text",
            "text": {"body": "hola"}
        }]));

        let events = collect_relay_events(&payload, &repo(Some(4))).await;

        assert_eq!(
            events,
            vec![WhatsAppEvent {
                tenant_id: 4,
                contact_jid: "5511999@s.whatsapp.net".into(),
                contact_name: "Ana".into(),
                text: "hola".into(),
                is_outgoing: false,
            }]
        );
    }

    #[ntex::test]
    async fn test_non_text_messages_are_skipped() {
        let payload = payload(serde_json::json!([
            {"from": "5511999", "id": "wamid.1", "timestamp": "1", "type": "image", "image": {"id": "m1"}},
            {"from": "5511999", "id": "wamid.2", "timestamp": "2", "type": "text", "text": {"body": " "}}
        ]));

        assert!(collect_relay_events(&payload, &repo(Some(4))).await.is_empty());
    }

    #[ntex::test]
    async fn test_unknown_phone_number_is_skipped() {
        let payload = payload(serde_json::json!([{
            "from": "5511999", "id": "wamid.1", "timestamp": "1", "type": "text", "text": {"body": "hola"}
        }]));

        assert!(collect_relay_events(&payload, &repo(None)).await.is_empty());
    }

    #[ntex::test]
    async fn test_status_only_payload_skips_tenant_lookup() {
        let payload = payload(serde_json::json!([]));
        let mut repo = MockTenantRepo::new();
        repo.expect_find_tenant_by_phone_number_id().never();

        let events = collect_relay_events(&payload, &(Arc::new(repo) as Arc<dyn TenantRepo>)).await;

        assert!(events.is_empty());
    }
}
