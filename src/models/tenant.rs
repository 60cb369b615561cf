use serde::{Deserialize, Serialize};

/// Per-tenant Chatwoot bridge configuration.
///
/// Field names on the wire follow the `chatwoot_*` columns of the tenant table.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatwootConfig {
    #[serde(rename = "chatwoot_url", default)]
    pub url: String,
    #[serde(rename = "chatwoot_account_id", default)]
    pub account_id: String,
    /// 🔒 SENSITIVE: Chatwoot user/agent-bot access token
    #[serde(rename = "chatwoot_token", default)]
    pub token: String,
    #[serde(rename = "chatwoot_inbox_id", default)]
    pub inbox_id: String,
}

impl ChatwootConfig {
    /// The bridge runs only when every field is set.
    pub fn is_enabled(&self) -> bool {
        [&self.url, &self.account_id, &self.token, &self.inbox_id]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    /// Base url of the account scoped Chatwoot api
    pub fn account_api_url(&self) -> String {
        format!(
            "{url}/api/v1/accounts/{account_id}",
            url = self.url.trim().trim_end_matches('/'),
            account_id = self.account_id.trim()
        )
    }
}

impl std::fmt::Debug for ChatwootConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatwootConfig")
            .field("url", &self.url)
            .field("account_id", &self.account_id)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("inbox_id", &self.inbox_id)
            .finish()
    }
}

/// WhatsApp Business Cloud credentials of a tenant, loaded at start-up to
/// register its sending session.
#[derive(Clone)]
pub struct WhatsAppAccount {
    pub tenant_id: i64,
    pub phone_number_id: String,
    /// 🔒 SENSITIVE
    pub auth_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChatwootConfig {
        ChatwootConfig {
            url: "https://desk.example.com/".into(),
            account_id: "3".into(),
            token: "secret".into(),
            inbox_id: "9".into(),
        }
    }

    #[test]
    fn test_is_enabled_needs_every_field() {
        assert!(config().is_enabled());
        assert!(!ChatwootConfig::default().is_enabled());
        assert!(
            !ChatwootConfig {
                inbox_id: " ".into(),
                ..config()
            }
            .is_enabled()
        );
    }

    #[test]
    fn test_account_api_url_trims_trailing_slash() {
        assert_eq!(
            config().account_api_url(),
            "https://desk.example.com/api/v1/accounts/3"
        );
    }

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{"chatwoot_url":"https://desk.example.com","chatwoot_account_id":"3","chatwoot_token":"t","chatwoot_inbox_id":"9"}"#;

        let config: ChatwootConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.account_id, "3");
        assert!(config.is_enabled());
    }

    #[test]
    fn test_debug_masks_token() {
        assert!(!format!("{:?}", config()).contains("secret"));
    }
}
