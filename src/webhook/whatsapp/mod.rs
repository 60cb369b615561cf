//! WhatsApp Business Cloud API integration
//!
//! ## Submodules
//!
//! - [`client`] - Cloud API sending session of a tenant
//! - [`handler`] - Webhook events to Chatwoot relay events
//! - [`routes`] - HTTP endpoint handlers for the WhatsApp webhook
//! - [`schemas`] - Webhook payloads and outgoing text messages

pub mod client;
pub mod handler;
pub mod routes;
pub mod schemas;

pub use routes::{receive, verify};
