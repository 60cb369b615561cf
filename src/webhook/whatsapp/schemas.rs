//! # WhatsApp Cloud API Schemas
//!
//! Webhook payloads sent by the WhatsApp Business Cloud API and the text
//! message body used to answer through it. Only the fields the bridge reads
//! are modelled.

use serde::{Deserialize, Serialize};

/// Root webhook payload from WhatsApp
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    /// The object type, typically "whatsapp_business_account"
    pub object: String,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    /// Business Account ID
    pub id: String,
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    /// The field that changed (e.g., "messages")
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub struct Value {
    pub metadata: Metadata,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub statuses: Vec<Status>,
}

/// The business phone number that received the event
#[derive(Debug, Deserialize)]
pub struct Metadata {
    pub display_phone_number: String,
    /// Phone number ID, identifies the tenant
    pub phone_number_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Contact {
    pub profile: Profile,
    /// WhatsApp ID (phone number)
    pub wa_id: String,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    /// Sender's WhatsApp ID (phone number)
    pub from: String,
    pub id: String,
    pub timestamp: String,
    /// text, image, document, interactive...
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(default)]
    pub text: Option<TextMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TextMessage {
    pub body: String,
}

/// Delivery status of a message sent by the business
#[derive(Debug, Deserialize)]
pub struct Status {
    pub id: String,
    /// sent, delivered, read or failed
    pub status: String,
    pub recipient_id: String,
}

impl Value {
    /// Profile name WhatsApp reports for a sender, if any
    pub fn contact_name(&self, wa_id: &str) -> Option<&str> {
        self.contacts
            .iter()
            .find(|contact| contact.wa_id == wa_id)
            .map(|contact| contact.profile.name.as_str())
    }
}

/// Text message to send through the Cloud API
#[derive(Debug, Serialize)]
pub struct OutgoingTextMessage {
    /// Always "whatsapp"
    pub messaging_product: String,
    /// Recipient phone number
    pub to: String,
    #[serde(rename = "type")]
    pub msg_type: String,
    pub text: OutgoingTextContent,
}

#[derive(Debug, Serialize)]
pub struct OutgoingTextContent {
    pub body: String,
}

impl OutgoingTextMessage {
    pub fn new(to: String, body: String) -> Self {
        Self {
            messaging_product: "whatsapp".to_string(),
            to,
            msg_type: "text".to_string(),
            text: OutgoingTextContent { body },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub messages: Vec<MessageId>,
}

#[derive(Debug, Deserialize)]
pub struct MessageId {
    pub id: String,
}
