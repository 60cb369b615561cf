//! # Chatwoot Webhook Schemas
//!
//! Subset of the `message_created` event payload the relay reads. Chatwoot
//! sends `null` for many of these fields, so everything is optional.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
    /// "incoming", "outgoing", "activity" or "template"
    #[serde(default)]
    pub message_type: Option<String>,
    /// Internal agent notes
    #[serde(default)]
    pub private: Option<bool>,
    #[serde(default)]
    pub conversation: Option<WebhookConversation>,
    #[serde(default)]
    pub sender: Option<WebhookSender>,
    #[serde(default)]
    pub account: Option<WebhookAccount>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookConversation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub contact_inbox: Option<ContactInbox>,
    #[serde(default)]
    pub meta: Option<ConversationMeta>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactInbox {
    #[serde(default)]
    pub source_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConversationMeta {
    #[serde(default)]
    pub sender: Option<MetaSender>,
}

/// Contact the conversation belongs to
#[derive(Debug, Default, Deserialize)]
pub struct MetaSender {
    #[serde(default)]
    pub identifier: Option<String>,
}

/// Author of the message: a "contact", a "user" (agent) or an "agent_bot"
#[derive(Debug, Default, Deserialize)]
pub struct WebhookSender {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub sender_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookAccount {
    #[serde(default)]
    pub id: Option<i64>,
}

impl WebhookPayload {
    pub fn event(&self) -> &str {
        self.event.as_deref().unwrap_or_default()
    }

    pub fn message_type(&self) -> &str {
        self.message_type.as_deref().unwrap_or_default()
    }

    pub fn sender_type(&self) -> &str {
        self.sender
            .as_ref()
            .and_then(|sender| sender.sender_type.as_deref())
            .unwrap_or_default()
    }

    pub fn is_private(&self) -> bool {
        self.private.unwrap_or(false)
    }

    pub fn account_id(&self) -> Option<String> {
        self.account
            .as_ref()
            .and_then(|account| account.id)
            .map(|id| id.to_string())
    }

    /// `contact_inbox.source_id`, falling back to the contact identifier
    pub fn recipient_source_id(&self) -> Option<&str> {
        let conversation = self.conversation.as_ref()?;

        let source_id = conversation
            .contact_inbox
            .as_ref()
            .and_then(|inbox| inbox.source_id.as_deref())
            .map(str::trim)
            .filter(|source_id| !source_id.is_empty());

        source_id.or_else(|| {
            conversation
                .meta
                .as_ref()
                .and_then(|meta| meta.sender.as_ref())
                .and_then(|sender| sender.identifier.as_deref())
                .map(str::trim)
                .filter(|identifier| !identifier.is_empty())
        })
    }
}
