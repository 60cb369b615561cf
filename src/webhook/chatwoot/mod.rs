//! Chatwoot webhook integration
//!
//! - [`handler`] - Filtering and relaying of agent replies to WhatsApp
//! - [`routes`] - HTTP endpoint receiving Chatwoot events
//! - [`schemas`] - `message_created` payload

pub mod handler;
pub mod routes;
pub mod schemas;

pub use routes::receive;
