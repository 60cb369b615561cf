//! Application configuration management.
//!
//! Every value is read from the environment once at start-up through
//! [`init_config`]. Per-tenant Chatwoot credentials are NOT part of this
//! configuration: they live in the tenant store and are read on every relay.
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged

use anyhow::Context;
use envconfig::Envconfig;
use std::sync::OnceLock;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Database host value (NON-SENSITIVE)
    /// Example: "sqlite:data/bridge.db"
    pub db_host: String,

    /// 🔒 SENSITIVE: Database password to encrypt SQLite data
    #[envconfig(default = "")]
    pub db_pass_encrypt: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: Logfire write token. Empty keeps logs on the console.
    #[envconfig(default = "")]
    pub logfire_token: String,

    /// 🔒 SENSITIVE: token echoed by Meta during the webhook verification handshake
    #[envconfig(default = "")]
    pub whatsapp_verify_token: String,

    /// WhatsApp Business Graph API base url (NON-SENSITIVE)
    #[envconfig(default = "https://graph.facebook.com/v22.0")]
    pub whatsapp_graph_api_url: String,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Endpoint used to send messages from a WhatsApp Business phone number
    pub fn whatsapp_send_msg_endpoint(&self, phone_number_id: &str) -> String {
        format!(
            "{base}/{id}/messages",
            base = self.whatsapp_graph_api_url.trim_end_matches('/'),
            id = phone_number_id
        )
    }
}

pub static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Loads [`AppConfig`] from the environment. Calling it twice keeps the first value.
pub fn init_config() -> anyhow::Result<()> {
    let app_config = AppConfig::init_from_env().context(
        "failed to load application configuration, check environment variables",
    )?;
    let _ = APP_CONFIG.set(app_config);

    Ok(())
}
