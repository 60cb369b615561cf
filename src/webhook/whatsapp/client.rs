//! # WhatsApp Cloud API Client
//!
//! Sending side of a tenant's WhatsApp Business number. Each tenant with Cloud
//! API credentials gets one [`CloudApiSession`] registered at start-up.

use super::schemas::{MessageResponse, OutgoingTextMessage};
use crate::{config, models::tenant::WhatsAppAccount, services::WhatsAppSession};
use anyhow::{Context, Result};
use async_trait::async_trait;

pub struct CloudApiSession {
    client: reqwest::Client,
    /// `{graph api}/{phone_number_id}/messages`
    endpoint: String,
    /// 🔒 SENSITIVE
    auth_token: String,
}

impl CloudApiSession {
    pub fn new(client: reqwest::Client, endpoint: String, auth_token: String) -> Self {
        Self {
            client,
            endpoint,
            auth_token,
        }
    }

    /// Builds the session of a tenant account against the configured Graph API.
    pub fn from_account(client: reqwest::Client, account: &WhatsAppAccount) -> Result<Self> {
        let app_config = config::APP_CONFIG
            .get()
            .context("failed to get app config")?;

        Ok(Self::new(
            client,
            app_config.whatsapp_send_msg_endpoint(&account.phone_number_id),
            account.auth_token.clone(),
        ))
    }

    /// Sends a text message, returning the WhatsApp message id.
    ///
    /// `to` may be a full JID, the Cloud API only takes the phone number.
    pub async fn send_text_message(&self, to: &str, body: &str) -> Result<String> {
        let phone = to.split('@').next().unwrap_or_default();
        let message = OutgoingTextMessage::new(phone.to_string(), body.to_string());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.auth_token)
            .json(&message)
            .send()
            .await
            .context("Failed to send request to WhatsApp API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            anyhow::bail!("WhatsApp API returned error status {}: {}", status, body);
        }

        let whatsapp_response: MessageResponse = response
            .json()
            .await
            .context("Failed to parse WhatsApp API response")?;

        Ok(whatsapp_response
            .messages
            .into_iter()
            .next()
            .map(|message| message.id)
            .unwrap_or_default())
    }
}

#[async_trait]
impl WhatsAppSession for CloudApiSession {
    fn is_connected(&self) -> bool {
        !self.auth_token.trim().is_empty()
    }

    async fn send_text(&self, to: &str, body: &str) -> Result<()> {
        let message_id = self.send_text_message(to, body).await?;
        tracing::debug!(message_id = %message_id, "whatsapp message accepted");

        Ok(())
    }
}
