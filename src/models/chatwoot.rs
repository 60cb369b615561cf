use chrono::Utc;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{consts, models::jid::ContactKey};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: i64,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    #[display("open")]
    Open,
    #[display("pending")]
    Pending,
    #[display("resolved")]
    Resolved,
    #[display("snoozed")]
    Snoozed,
    #[default]
    #[serde(other)]
    #[display("unknown")]
    Unknown,
}

impl ConversationStatus {
    /// Open and pending conversations are reused, everything else starts a new one.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::Pending)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    pub id: i64,
    #[serde(default)]
    pub status: ConversationStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[display("incoming")]
    Incoming,
    #[display("outgoing")]
    Outgoing,
}

impl MessageType {
    pub fn from_outgoing_flag(is_outgoing: bool) -> Self {
        if is_outgoing {
            return Self::Outgoing;
        }
        Self::Incoming
    }
}

/// Contact creation request
#[derive(Debug, Serialize, PartialEq)]
pub struct NewContact {
    pub inbox_id: String,
    pub name: String,
    pub identifier: String,
    pub custom_attributes: serde_json::Value,
}

impl NewContact {
    /// Builds the create request for a WhatsApp contact. Chatwoot shows the
    /// key as name when WhatsApp gave none.
    pub fn from_whatsapp(inbox_id: &str, key: &ContactKey, display_name: &str) -> Self {
        let name = match display_name.trim() {
            "" => key.to_string(),
            name => name.to_string(),
        };

        Self {
            inbox_id: inbox_id.to_string(),
            name,
            identifier: key.to_string(),
            custom_attributes: serde_json::json!({ "source_id": key.as_str() }),
        }
    }
}

/// Conversation creation request
#[derive(Debug, Serialize, PartialEq)]
pub struct NewConversation {
    pub source_id: String,
    pub contact_id: i64,
    pub inbox_id: String,
}

impl NewConversation {
    pub fn new(contact_id: i64, inbox_id: &str) -> Self {
        Self {
            source_id: generate_conversation_source_id(),
            contact_id,
            inbox_id: inbox_id.to_string(),
        }
    }
}

/// Format: `conv_{timestamp_millis}_{random}`, unique per create attempt.
fn generate_conversation_source_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        consts::CONVERSATION_SOURCE_ID_PREFIX,
        Utc::now().timestamp_millis(),
        &suffix[..8]
    )
}

/// Message mirrored into a Chatwoot conversation. Not persisted by the bridge.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RelayMessage {
    #[serde(rename = "content")]
    pub text: String,
    pub message_type: MessageType,
    pub private: bool,
    #[serde(skip)]
    pub conversation_id: i64,
}

impl RelayMessage {
    pub fn new(conversation_id: i64, text: &str, is_outgoing: bool) -> Self {
        Self {
            text: text.to_string(),
            message_type: MessageType::from_outgoing_flag(is_outgoing),
            private: false,
            conversation_id,
        }
    }
}
