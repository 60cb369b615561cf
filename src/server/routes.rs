//! Route configuration of the tenant facing endpoints.

use super::{chatwoot_config, events};
use ntex::web;

/// Configures the Chatwoot bridge configuration routes.
///
/// All routes authenticate the tenant through its `token` header.
///
/// # Routes
/// - `GET /chatwoot/config` - Current configuration
/// - `PUT /chatwoot/config` - Replace the configuration
/// - `DELETE /chatwoot/config` - Blank the configuration, disabling the bridge
pub fn chatwoot_config(cfg: &mut web::ServiceConfig) {
    cfg.service((
        chatwoot_config::get_config,
        chatwoot_config::update_config,
        chatwoot_config::delete_config,
    ));
}

/// Configures the message event hook of the host WhatsApp pipeline.
///
/// # Routes
/// - `POST /chatwoot/events` - Relay a WhatsApp message to Chatwoot
pub fn events(cfg: &mut web::ServiceConfig) {
    cfg.service(events::relay_message_event);
}
