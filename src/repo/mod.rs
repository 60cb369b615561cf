pub mod sqlite;
pub mod sqlite_queries;

use crate::models::tenant::{ChatwootConfig, WhatsAppAccount};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// Tenant config store. Plain reads and writes, no caching.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TenantRepo: Send + Sync {
    /// `None` when the tenant does not exist.
    async fn get_chatwoot_config(&self, tenant_id: i64) -> anyhow::Result<Option<ChatwootConfig>>;

    async fn save_chatwoot_config(
        &self,
        tenant_id: i64,
        config: &ChatwootConfig,
    ) -> anyhow::Result<()>;

    async fn delete_chatwoot_config(&self, tenant_id: i64) -> anyhow::Result<()>;

    /// Only tenants with a non empty chatwoot token are matched.
    async fn find_tenant_by_chatwoot_account(
        &self,
        account_id: &str,
    ) -> anyhow::Result<Option<i64>>;

    async fn find_tenant_by_token(&self, token: &str) -> anyhow::Result<Option<i64>>;

    async fn find_tenant_by_phone_number_id(
        &self,
        phone_number_id: &str,
    ) -> anyhow::Result<Option<i64>>;

    async fn get_whatsapp_accounts(&self) -> anyhow::Result<Vec<WhatsAppAccount>>;
}

pub type ImplTenantRepo = Arc<dyn TenantRepo>;
