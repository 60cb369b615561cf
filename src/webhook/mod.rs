//! Webhook handlers for external integrations
//!
//! ## Modules
//!
//! - [`chatwoot`] - Chatwoot events, agent replies relayed to WhatsApp
//! - [`whatsapp`] - WhatsApp Business Cloud API events, relayed to Chatwoot

pub mod chatwoot;
pub mod routes;
pub mod whatsapp;
