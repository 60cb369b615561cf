use ntex::web;

/// Configures webhook routes for external integrations.
///
/// These routes are public endpoints that don't require authentication. The
/// Chatwoot webhook identifies its tenant from the payload itself.
///
/// # Routes
/// - `POST /chatwoot/webhook` - Chatwoot event receiver
/// - `GET /webhook/whatsapp` - WhatsApp webhook verification
/// - `POST /webhook/whatsapp` - WhatsApp webhook receiver
pub fn chatwoot(cfg: &mut web::ServiceConfig) {
    cfg.service(super::chatwoot::receive);
}

pub fn whatsapp(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook/whatsapp")
            .service((super::whatsapp::verify, super::whatsapp::receive)),
    );
}
