/// Header Chatwoot reads the api access token from
pub const CHATWOOT_ACCESS_TOKEN_HEADER: &str = "api_access_token";
/// Header tenants authenticate with against this service
pub const TENANT_TOKEN_HEADER: &str = "token";

/// Only webhook event relayed back to WhatsApp
pub const CHATWOOT_EVENT_MESSAGE_CREATED: &str = "message_created";
/// Chatwoot sender type for end customers
pub const CHATWOOT_SENDER_CONTACT: &str = "contact";

/// Server suffix for WhatsApp user JIDs
pub const WHATSAPP_USER_SERVER: &str = "s.whatsapp.net";

/// Prefix of the `source_id` sent when a conversation is created
pub const CONVERSATION_SOURCE_ID_PREFIX: &str = "conv";
