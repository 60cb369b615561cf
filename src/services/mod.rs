//! External capabilities the relays depend on.
//!
//! - [`ChatwootApi`] - Chatwoot REST api (contacts, conversations, messages)
//! - [`SessionRegistry`] / [`WhatsAppSession`] - sending over a tenant's WhatsApp session

pub mod chatwoot;
pub mod sessions;

use crate::models::{
    chatwoot::{Contact, Conversation, NewContact, NewConversation, RelayMessage},
    jid::ContactKey,
    tenant::ChatwootConfig,
};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

pub use chatwoot::ChatwootError;

/// Stateless Chatwoot calls. Every call gets the tenant configuration it runs
/// against; nothing is cached between calls and nothing is retried.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatwootApi: Send + Sync {
    async fn search_contacts(
        &self,
        config: &ChatwootConfig,
        key: &ContactKey,
    ) -> Result<Vec<Contact>, ChatwootError>;

    async fn create_contact(
        &self,
        config: &ChatwootConfig,
        contact: &NewContact,
    ) -> Result<i64, ChatwootError>;

    async fn list_contact_conversations(
        &self,
        config: &ChatwootConfig,
        contact_id: i64,
    ) -> Result<Vec<Conversation>, ChatwootError>;

    async fn create_conversation(
        &self,
        config: &ChatwootConfig,
        conversation: &NewConversation,
    ) -> Result<i64, ChatwootError>;

    async fn create_message(
        &self,
        config: &ChatwootConfig,
        message: &RelayMessage,
    ) -> Result<(), ChatwootError>;
}

/// An already established WhatsApp session of one tenant.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WhatsAppSession: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Sends a text message to a user JID.
    async fn send_text(&self, to: &str, body: &str) -> anyhow::Result<()>;
}

/// Lookup of the live WhatsApp session of a tenant.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    async fn get(&self, tenant_id: i64) -> Option<Arc<dyn WhatsAppSession>>;
}

pub type ImplChatwootApi = Arc<dyn ChatwootApi>;
pub type ImplSessionRegistry = Arc<dyn SessionRegistry>;
