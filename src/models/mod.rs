pub mod chatwoot;
pub mod jid;
pub mod tenant;
