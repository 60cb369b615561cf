use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("chatwoot_bridge_statds")
        .with_description("Chatwoot bridge relay statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(attributes: &[KeyValue]) {
    STATDS.add(1, attributes);
}

/// `direction` is `to_chatwoot` or `to_whatsapp`
pub fn incr_relay_statds(direction: &str, outcome: &str) {
    incr_statds(&[
        KeyValue::new("relay", direction.to_string()),
        KeyValue::new("outcome", outcome.to_string()),
    ])
}

pub fn incr_chatwoot_create_statds(entity: &str) {
    incr_statds(&[KeyValue::new("chatwoot_create", entity.to_string())])
}
