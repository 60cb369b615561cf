//! # Outbound Relay (WhatsApp -> Chatwoot)
//!
//! Mirrors one WhatsApp message into the tenant's Chatwoot conversation.
//! The relay is fire and forget for whoever triggered it: failures are
//! logged where they happen and never retried.

use derive_more::{Display, Error};
use std::sync::Arc;
use tracing::Instrument;

use super::{contact_lock::ContactLocks, resolver};
use crate::{
    metric,
    models::{chatwoot::RelayMessage, jid::ContactKey},
    repo::ImplTenantRepo,
    services::{ChatwootError, ImplChatwootApi},
};

/// A message seen by a tenant's WhatsApp session.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatsAppEvent {
    pub tenant_id: i64,
    pub contact_jid: String,
    pub contact_name: String,
    pub text: String,
    /// Sent by the tenant itself rather than by the contact
    pub is_outgoing: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Tenant missing or without a complete chatwoot configuration
    Disabled,
    Relayed { conversation_id: i64 },
}

#[derive(Debug, Display, Error)]
pub enum RelayError {
    #[display("failed to load chatwoot config: {_0}")]
    Store(#[error(not(source))] anyhow::Error),
    #[display("contact jid {_0:?} has no user part")]
    InvalidContact(#[error(not(source))] String),
    #[display("{_0}")]
    Resolution(#[error(source)] resolver::ResolutionError),
    #[display("failed to send message to chatwoot: {_0}")]
    Message(#[error(source)] ChatwootError),
}

#[derive(Clone)]
pub struct ChatwootRelay {
    pub repo: ImplTenantRepo,
    pub chatwoot: ImplChatwootApi,
    pub contact_locks: Arc<ContactLocks>,
}

impl ChatwootRelay {
    pub fn new(repo: ImplTenantRepo, chatwoot: ImplChatwootApi) -> Self {
        Self {
            repo,
            chatwoot,
            contact_locks: Arc::new(ContactLocks::new()),
        }
    }

    /// Runs the relay and reports how it ended.
    ///
    /// The configuration is read on every call so changes apply to the next message.
    pub async fn try_relay(&self, event: &WhatsAppEvent) -> Result<RelayOutcome, RelayError> {
        let config = self
            .repo
            .get_chatwoot_config(event.tenant_id)
            .await
            .map_err(RelayError::Store)?;

        let Some(config) = config.filter(|config| config.is_enabled()) else {
            return Ok(RelayOutcome::Disabled);
        };

        let key = ContactKey::from_jid(&event.contact_jid);
        if key.is_empty() {
            return Err(RelayError::InvalidContact(event.contact_jid.clone()));
        }

        let resolved = {
            let _guard = self.contact_locks.lock(event.tenant_id, &key).await;
            resolver::resolve(&self.chatwoot, &config, &key, &event.contact_name)
                .await
                .map_err(RelayError::Resolution)?
        };

        let message = RelayMessage::new(resolved.conversation_id, &event.text, event.is_outgoing);
        self.chatwoot
            .create_message(&config, &message)
            .await
            .map_err(RelayError::Message)?;

        tracing::debug!(
            contact_id = resolved.contact_id,
            conversation_id = resolved.conversation_id,
            "chatwoot message created"
        );

        Ok(RelayOutcome::Relayed {
            conversation_id: resolved.conversation_id,
        })
    }

    /// Runs the relay, logging the outcome. Nothing is returned to the caller.
    pub async fn relay(&self, event: WhatsAppEvent) {
        match self.try_relay(&event).await {
            Ok(RelayOutcome::Disabled) => {
                tracing::debug!(tenant_id = event.tenant_id, "chatwoot bridge disabled");
            }
            Ok(RelayOutcome::Relayed { conversation_id }) => {
                metric::incr_relay_statds("to_chatwoot", "relayed");
                logfire::info!(
                    "message relayed to chatwoot conversation {conversation_id}",
                    conversation_id = conversation_id,
                    tenant_id = event.tenant_id
                );
            }
            Err(e) => {
                metric::incr_relay_statds("to_chatwoot", "failed");
                logfire::error!(
                    "Chatwoot relay failed: {error}",
                    error = e.to_string(),
                    tenant_id = event.tenant_id
                );
            }
        }
    }

    /// Runs [`Self::relay`] on its own task.
    pub fn spawn(&self, event: WhatsAppEvent) {
        let relay = self.clone();
        let span = tracing::info_span!("chatwoot_relay", tenant_id = event.tenant_id);

        ntex::rt::spawn(async move { relay.relay(event).await }.instrument(span));
    }
}
