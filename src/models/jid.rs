//! WhatsApp addressing helpers.
//!
//! A JID looks like `user[.agent][:device]@server`. Chatwoot only ever sees the
//! bare `user` part, which is the join key between both contact spaces.

use crate::consts;
use derive_more::Display;

/// WhatsApp contact identifier stored as the Chatwoot contact `identifier`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct ContactKey(String);

impl ContactKey {
    /// Derives the key from any JID of the contact, dropping the server,
    /// device and agent parts.
    pub fn from_jid(jid: &str) -> Self {
        let user = jid.trim().split('@').next().unwrap_or_default();
        let user = user.split(':').next().unwrap_or_default();
        let user = user.split('.').next().unwrap_or_default();

        Self(user.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds a routable user JID from a Chatwoot `source_id`. Values that already
/// carry a server are kept as they are.
pub fn to_user_jid(source_id: &str) -> String {
    let source_id = source_id.trim();
    if source_id.contains('@') {
        return source_id.to_string();
    }

    format!("{source_id}@{}", consts::WHATSAPP_USER_SERVER)
}
