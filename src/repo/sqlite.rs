use crate::models::tenant::{ChatwootConfig, WhatsAppAccount};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, Row, SqlitePool, sqlite::SqliteRow};

use super::{TenantRepo, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

impl FromRow<'_, SqliteRow> for ChatwootConfig {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            url: row.try_get::<Option<String>, _>("chatwoot_url")?.unwrap_or_default(),
            account_id: row
                .try_get::<Option<String>, _>("chatwoot_account_id")?
                .unwrap_or_default(),
            token: row.try_get::<Option<String>, _>("chatwoot_token")?.unwrap_or_default(),
            inbox_id: row
                .try_get::<Option<String>, _>("chatwoot_inbox_id")?
                .unwrap_or_default(),
        })
    }
}

impl FromRow<'_, SqliteRow> for WhatsAppAccount {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            tenant_id: row.try_get("id")?,
            phone_number_id: row.try_get("whatsapp_phone_number_id")?,
            auth_token: row.try_get("whatsapp_auth_token")?,
        })
    }
}

#[async_trait]
impl TenantRepo for SqlxSqliteRepo {
    async fn get_chatwoot_config(&self, tenant_id: i64) -> anyhow::Result<Option<ChatwootConfig>> {
        Ok(
            sqlx::query_as::<_, ChatwootConfig>(sqlite_queries::QUERY_GET_CHATWOOT_CONFIG)
                .bind(tenant_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn save_chatwoot_config(
        &self,
        tenant_id: i64,
        config: &ChatwootConfig,
    ) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_UPDATE_CHATWOOT_CONFIG)
            .bind(config.url.trim())
            .bind(config.account_id.trim())
            .bind(config.token.trim())
            .bind(config.inbox_id.trim())
            .bind(Utc::now())
            .bind(tenant_id)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn delete_chatwoot_config(&self, tenant_id: i64) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_CLEAR_CHATWOOT_CONFIG)
            .bind(Utc::now())
            .bind(tenant_id)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn find_tenant_by_chatwoot_account(
        &self,
        account_id: &str,
    ) -> anyhow::Result<Option<i64>> {
        Ok(
            sqlx::query_scalar::<_, i64>(sqlite_queries::QUERY_GET_TENANT_ID_BY_CHATWOOT_ACCOUNT)
                .bind(account_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn find_tenant_by_token(&self, token: &str) -> anyhow::Result<Option<i64>> {
        Ok(
            sqlx::query_scalar::<_, i64>(sqlite_queries::QUERY_GET_TENANT_ID_BY_TOKEN)
                .bind(token)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn find_tenant_by_phone_number_id(
        &self,
        phone_number_id: &str,
    ) -> anyhow::Result<Option<i64>> {
        Ok(
            sqlx::query_scalar::<_, i64>(sqlite_queries::QUERY_GET_TENANT_ID_BY_PHONE_NUMBER_ID)
                .bind(phone_number_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_whatsapp_accounts(&self) -> anyhow::Result<Vec<WhatsAppAccount>> {
        Ok(
            sqlx::query_as::<_, WhatsAppAccount>(sqlite_queries::QUERY_GET_WHATSAPP_ACCOUNTS)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }
}
