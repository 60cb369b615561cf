use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    consts,
    models::{
        chatwoot::{Contact, Conversation, NewContact, NewConversation, RelayMessage},
        jid::ContactKey,
        tenant::ChatwootConfig,
    },
};

#[derive(Debug, Display, Error)]
pub enum ChatwootError {
    #[display("chatwoot request failed: {_0}")]
    Transport(#[error(source)] reqwest::Error),
    #[display("chatwoot api returned {status}: {body}")]
    Api { status: u16, body: String },
    #[display("chatwoot response could not be decoded: {_0}")]
    Decode(#[error(source)] reqwest::Error),
    #[display("chatwoot response has no {_0} id")]
    MissingId(#[error(not(source))] &'static str),
}

#[derive(Deserialize)]
struct PayloadList<T> {
    #[serde(default = "Vec::new")]
    payload: Vec<T>,
}

#[derive(Deserialize)]
struct IdOnly {
    id: i64,
}

/// Chatwoot answers contact creation with `{"payload": {"contact": {...}}}`;
/// older versions put the contact directly under `payload`.
#[derive(Deserialize)]
struct CreatedContact {
    payload: CreatedContactPayload,
}

#[derive(Deserialize)]
struct CreatedContactPayload {
    #[serde(default)]
    contact: Option<IdOnly>,
    #[serde(default)]
    id: Option<i64>,
}

#[derive(Clone, Default)]
pub struct ChatwootHandler {
    pub client: reqwest::Client,
}

impl ChatwootHandler {
    fn get(&self, config: &ChatwootConfig, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", config.account_api_url()))
            .header(consts::CHATWOOT_ACCESS_TOKEN_HEADER, config.token.trim())
    }

    fn post(&self, config: &ChatwootConfig, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", config.account_api_url()))
            .header(consts::CHATWOOT_ACCESS_TOKEN_HEADER, config.token.trim())
    }
}

/// Sends the request and fails on transport errors and non 2xx statuses,
/// keeping the response body for the logs.
async fn send_checked(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ChatwootError> {
    let response = request.send().await.map_err(ChatwootError::Transport)?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        return Err(ChatwootError::Api { status, body });
    }

    Ok(response)
}

async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ChatwootError> {
    send_checked(request)
        .await?
        .json::<T>()
        .await
        .map_err(ChatwootError::Decode)
}

#[async_trait]
impl crate::services::ChatwootApi for ChatwootHandler {
    async fn search_contacts(
        &self,
        config: &ChatwootConfig,
        key: &ContactKey,
    ) -> Result<Vec<Contact>, ChatwootError> {
        let request = self
            .get(config, "/contacts/search")
            .query(&[("q", key.as_str())]);

        Ok(send_json::<PayloadList<Contact>>(request).await?.payload)
    }

    async fn create_contact(
        &self,
        config: &ChatwootConfig,
        contact: &NewContact,
    ) -> Result<i64, ChatwootError> {
        let created: CreatedContact = send_json(self.post(config, "/contacts").json(contact)).await?;

        created
            .payload
            .contact
            .map(|contact| contact.id)
            .or(created.payload.id)
            .ok_or(ChatwootError::MissingId("contact"))
    }

    async fn list_contact_conversations(
        &self,
        config: &ChatwootConfig,
        contact_id: i64,
    ) -> Result<Vec<Conversation>, ChatwootError> {
        let request = self.get(config, &format!("/contacts/{contact_id}/conversations"));

        Ok(send_json::<PayloadList<Conversation>>(request).await?.payload)
    }

    async fn create_conversation(
        &self,
        config: &ChatwootConfig,
        conversation: &NewConversation,
    ) -> Result<i64, ChatwootError> {
        let created: IdOnly =
            send_json(self.post(config, "/conversations").json(conversation)).await?;

        Ok(created.id)
    }

    async fn create_message(
        &self,
        config: &ChatwootConfig,
        message: &RelayMessage,
    ) -> Result<(), ChatwootError> {
        let path = format!("/conversations/{}/messages", message.conversation_id);
        send_checked(self.post(config, &path).json(message)).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ChatwootApi;
    use mockito::Matcher;

    fn config(url: String) -> ChatwootConfig {
        ChatwootConfig {
            url,
            account_id: "3".into(),
            token: "secret".into(),
            inbox_id: "9".into(),
        }
    }

    #[ntex::test]
    async fn test_search_contacts_sends_key_and_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/accounts/3/contacts/search")
            .match_query(Matcher::UrlEncoded("q".into(), "551199".into()))
            .match_header("api_access_token", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"meta":{"count":2},"payload":[{"id":7,"identifier":"551199"},{"id":8}]}"#)
            .create_async()
            .await;

        let contacts = ChatwootHandler::default()
            .search_contacts(&config(server.url()), &ContactKey::from_jid("551199@s.whatsapp.net"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(contacts.iter().map(|c| c.id).collect::<Vec<_>>(), vec![7, 8]);
    }

    #[ntex::test]
    async fn test_create_contact_reads_nested_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/accounts/3/contacts")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "identifier": "551199",
                "inbox_id": "9",
                "custom_attributes": {"source_id": "551199"}
            })))
            .with_status(200)
            .with_body(r#"{"payload":{"contact":{"id":21},"contact_inbox":{"source_id":"abc"}}}"#)
            .create_async()
            .await;

        let key = ContactKey::from_jid("551199");
        let id = ChatwootHandler::default()
            .create_contact(&config(server.url()), &NewContact::from_whatsapp("9", &key, "Ana"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(id, 21);
    }

    #[ntex::test]
    async fn test_create_contact_without_id_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/accounts/3/contacts")
            .with_status(200)
            .with_body(r#"{"payload":{}}"#)
            .create_async()
            .await;

        let key = ContactKey::from_jid("551199");
        let result = ChatwootHandler::default()
            .create_contact(&config(server.url()), &NewContact::from_whatsapp("9", &key, ""))
            .await;

        assert!(matches!(result, Err(ChatwootError::MissingId("contact"))));
    }

    #[ntex::test]
    async fn test_list_contact_conversations_keeps_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/accounts/3/contacts/7/conversations")
            .with_status(200)
            .with_body(r#"{"payload":[{"id":1,"status":"resolved"},{"id":2,"status":"open"}]}"#)
            .create_async()
            .await;

        let conversations = ChatwootHandler::default()
            .list_contact_conversations(&config(format!("{}/", server.url())), 7)
            .await
            .unwrap();

        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[1].id, 2);
        assert!(conversations[1].status.is_active());
    }

    #[ntex::test]
    async fn test_create_message_error_status_keeps_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/accounts/3/conversations/12/messages")
            .match_body(Matcher::Json(serde_json::json!({
                "content": "hola",
                "message_type": "incoming",
                "private": false
            })))
            .with_status(422)
            .with_body("conversation is locked")
            .create_async()
            .await;

        let result = ChatwootHandler::default()
            .create_message(&config(server.url()), &RelayMessage::new(12, "hola", false))
            .await;

        match result {
            Err(ChatwootError::Api { status, body }) => {
                assert_eq!(status, 422);
                assert_eq!(body, "conversation is locked");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[ntex::test]
    async fn test_transport_error() {
        let result = ChatwootHandler::default()
            .list_contact_conversations(&config("http://127.0.0.1:1".into()), 7)
            .await;

        assert!(matches!(result, Err(ChatwootError::Transport(_))));
    }
}
