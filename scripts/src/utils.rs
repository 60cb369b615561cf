use crate::config::AppConfig;
use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use std::str::FromStr;

const QUERY_INSERT_TENANT: &str = r#"
INSERT INTO tenant (
    name,token,whatsapp_phone_number_id,whatsapp_auth_token,created_at,updated_at
) VALUES ($1,$2,$3,$4,$5,$6)
RETURNING id;
"#;

pub struct NewTenant<'a> {
    pub name: &'a str,
    pub token: &'a str,
    pub whatsapp_phone_number_id: Option<&'a str>,
    pub whatsapp_auth_token: Option<&'a str>,
}

pub async fn run_migrations(
    db_pool: &sqlx::SqlitePool,
    migrations_dir: &str,
    file_name: &str,
) -> anyhow::Result<()> {
    let tera = tera::Tera::new(&format!("{}/**/*.sql", migrations_dir.trim_end_matches('/')))?;

    let create_tables_query = tera.render(file_name, &tera::Context::new())?;

    sqlx::raw_sql(&create_tables_query).execute(db_pool).await?;
    Ok(())
}

pub async fn create_tenant(db_pool: &SqlitePool, tenant: &NewTenant<'_>) -> anyhow::Result<i64> {
    let now = Utc::now();
    let tenant_id = sqlx::query_scalar(QUERY_INSERT_TENANT)
        .bind(tenant.name)
        .bind(tenant.token)
        .bind(tenant.whatsapp_phone_number_id)
        .bind(tenant.whatsapp_auth_token)
        .bind(now)
        .bind(now)
        .fetch_one(db_pool)
        .await?;

    Ok(tenant_id)
}

pub async fn setup_sqlite_db_pool(app_config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&app_config.db_host)?.create_if_missing(true);

    if app_config.is_prod() {
        return Ok(SqlitePool::connect_with(
            options
                .pragma("key", app_config.db_pass_encrypt.clone())
                .pragma("cipher_page_size", "1024")
                .pragma("kdf_iter", "64000")
                .pragma("cipher_hmac_algorithm", "HMAC_SHA1")
                .pragma("cipher_kdf_algorithm", "PBKDF2_HMAC_SHA1")
                .pragma("foreign_keys", "ON")
                .journal_mode(SqliteJournalMode::Delete),
        )
        .await?);
    }

    Ok(SqlitePool::connect_with(options.pragma("foreign_keys", "ON")).await?)
}
