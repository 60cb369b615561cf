//! Message events pushed by the host WhatsApp pipeline.

use ntex::web;
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::relay::WhatsAppEvent,
    models::jid::ContactKey,
    server::{AppState, errors, middleware::tenant_token::AuthenticatedTenant},
};

/// A message seen by the tenant's own WhatsApp session
#[derive(Debug, Deserialize)]
pub struct MessageEventBody {
    pub contact_jid: String,
    #[serde(default)]
    pub contact_name: String,
    pub text: String,
    /// Sent from the tenant's phone rather than received from the contact
    #[serde(default)]
    pub is_outgoing: bool,
}

impl MessageEventBody {
    fn into_event(self, tenant_id: i64) -> Result<WhatsAppEvent, errors::UserError> {
        if ContactKey::from_jid(&self.contact_jid).is_empty() {
            return Err(errors::UserError::FormInputValueError(format!(
                "contact_jid {:?} has no user part",
                self.contact_jid
            )));
        }

        if self.text.trim().is_empty() {
            return Err(errors::UserError::FormInputValueError(
                "text can not be empty".into(),
            ));
        }

        Ok(WhatsAppEvent {
            tenant_id,
            contact_jid: self.contact_jid,
            contact_name: self.contact_name,
            text: self.text,
            is_outgoing: self.is_outgoing,
        })
    }
}

/// Accepts the event and relays it to Chatwoot in the background.
#[web::post("/chatwoot/events")]
pub async fn relay_message_event(
    tenant: AuthenticatedTenant,
    body: web::types::Json<MessageEventBody>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let event = body.into_inner().into_event(tenant.tenant_id)?;
    app_state.relay.spawn(event);

    Ok(web::HttpResponse::Accepted().json(&json!({
        "status": "accepted",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::relay::ChatwootRelay,
        repo::{MockTenantRepo, TenantRepo},
        services::{ChatwootApi, MockChatwootApi, MockSessionRegistry, SessionRegistry},
    };
    use ntex::{http, web::test};
    use std::sync::Arc;

    async fn post_event(body: serde_json::Value) -> web::WebResponse {
        let mut repo = MockTenantRepo::new();
        repo.expect_find_tenant_by_token()
            .withf(|token| token == "tenant-token")
            .returning(|_| Ok(Some(1)));
        // the relay task finds the bridge disabled
        repo.expect_get_chatwoot_config().returning(|_| Ok(None));

        let repo = Arc::new(repo) as Arc<dyn TenantRepo>;
        let state = AppState {
            relay: ChatwootRelay::new(
                repo.clone(),
                Arc::new(MockChatwootApi::new()) as Arc<dyn ChatwootApi>,
            ),
            repo,
            sessions: Arc::new(MockSessionRegistry::new()) as Arc<dyn SessionRegistry>,
        };

        let app = test::init_service(
            web::App::new()
                .state(state)
                .service(relay_message_event),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chatwoot/events")
            .header("token", "tenant-token")
            .set_json(&body)
            .to_request();

        test::call_service(&app, req).await
    }

    #[ntex::test]
    async fn test_event_is_accepted() {
        let resp = post_event(json!({
            "contact_jid": "5511999@s.whatsapp.net",
            "contact_name": "Ana",
            "text": "hola",
            "is_outgoing": false
        }))
        .await;

        assert_eq!(resp.status(), http::StatusCode::ACCEPTED);
    }

    #[ntex::test]
    async fn test_event_without_contact_is_rejected() {
        let resp = post_event(json!({"contact_jid": "@s.whatsapp.net", "text": "hola"})).await;

        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_event() {
        let body = MessageEventBody {
            contact_jid: "5511999:3@s.whatsapp.net".into(),
            contact_name: String::new(),
            text: "sent from the phone".into(),
            is_outgoing: true,
        };

        let event = body.into_event(7).unwrap();

        assert_eq!(event.tenant_id, 7);
        assert!(event.is_outgoing);
        assert_eq!(event.contact_jid, "5511999:3@s.whatsapp.net");
    }

    #[test]
    fn test_into_event_rejects_empty_text() {
        let body = MessageEventBody {
            contact_jid: "5511999@s.whatsapp.net".into(),
            contact_name: "Ana".into(),
            text: " ".into(),
            is_outgoing: false,
        };

        assert!(body.into_event(7).is_err());
    }
}
