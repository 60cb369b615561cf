use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::{SessionRegistry, WhatsAppSession};

/// In-memory registry of the WhatsApp sessions owned by this process.
#[derive(Default)]
pub struct SessionMap {
    sessions: RwLock<HashMap<i64, Arc<dyn WhatsAppSession>>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the session of a tenant, replacing any previous one.
    pub async fn register(&self, tenant_id: i64, session: Arc<dyn WhatsAppSession>) {
        self.sessions.write().await.insert(tenant_id, session);
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionRegistry for SessionMap {
    async fn get(&self, tenant_id: i64) -> Option<Arc<dyn WhatsAppSession>> {
        self.sessions.read().await.get(&tenant_id).cloned()
    }
}
