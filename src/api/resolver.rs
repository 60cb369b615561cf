//! # Identity Resolver
//!
//! Maps a WhatsApp contact onto a Chatwoot contact and its active conversation,
//! creating whichever is missing.
//!
//! Ambiguities are settled by Chatwoot's own ordering: the first contact of the
//! search result and the first open/pending conversation of the listing win.
//! Resolved conversations are never reopened, the next customer message starts
//! a new one.

use derive_more::{Display, Error};

use crate::{
    metric,
    models::{
        chatwoot::{NewContact, NewConversation},
        jid::ContactKey,
        tenant::ChatwootConfig,
    },
    services::{ChatwootError, ImplChatwootApi},
};

#[derive(Debug, Display, Error)]
pub enum ResolutionError {
    #[display("failed to find/create chatwoot contact: {_0}")]
    Contact(#[error(source)] ChatwootError),
    #[display("failed to find/create chatwoot conversation: {_0}")]
    Conversation(#[error(source)] ChatwootError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConversation {
    pub contact_id: i64,
    pub conversation_id: i64,
}

/// Returns the id of the first contact Chatwoot finds for `key`, or creates it.
pub async fn resolve_contact(
    chatwoot: &ImplChatwootApi,
    config: &ChatwootConfig,
    key: &ContactKey,
    display_name: &str,
) -> Result<i64, ChatwootError> {
    if let Some(contact) = chatwoot.search_contacts(config, key).await?.first() {
        return Ok(contact.id);
    }

    let contact = NewContact::from_whatsapp(config.inbox_id.trim(), key, display_name);
    let contact_id = chatwoot.create_contact(config, &contact).await?;

    metric::incr_chatwoot_create_statds("contact");
    logfire::info!(
        "created chatwoot contact {contact_id} for {key}",
        contact_id = contact_id,
        key = key.to_string()
    );

    Ok(contact_id)
}

/// Returns the first open or pending conversation of the contact, or creates one.
pub async fn resolve_conversation(
    chatwoot: &ImplChatwootApi,
    config: &ChatwootConfig,
    contact_id: i64,
) -> Result<i64, ChatwootError> {
    let conversations = chatwoot.list_contact_conversations(config, contact_id).await?;

    if let Some(conversation) = conversations.iter().find(|c| c.status.is_active()) {
        return Ok(conversation.id);
    }

    let conversation = NewConversation::new(contact_id, config.inbox_id.trim());
    let conversation_id = chatwoot.create_conversation(config, &conversation).await?;

    metric::incr_chatwoot_create_statds("conversation");
    logfire::info!(
        "created chatwoot conversation {conversation_id} for contact {contact_id}",
        conversation_id = conversation_id,
        contact_id = contact_id
    );

    Ok(conversation_id)
}

/// Runs the whole find-or-create sequence for a contact.
pub async fn resolve(
    chatwoot: &ImplChatwootApi,
    config: &ChatwootConfig,
    key: &ContactKey,
    display_name: &str,
) -> Result<ResolvedConversation, ResolutionError> {
    let contact_id = resolve_contact(chatwoot, config, key, display_name)
        .await
        .map_err(ResolutionError::Contact)?;

    let conversation_id = resolve_conversation(chatwoot, config, contact_id)
        .await
        .map_err(ResolutionError::Conversation)?;

    Ok(ResolvedConversation {
        contact_id,
        conversation_id,
    })
}
