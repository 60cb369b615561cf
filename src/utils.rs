//! Helper functions shared by main, repo, services, ...

use crate::config;
use anyhow::Context;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use std::{str::FromStr, sync::LazyLock};

/// SQLite options, SQLCipher keyed when `encrypted`
fn sqlite_connect_options(
    db_host: &str,
    db_pass_encrypt: &str,
    encrypted: bool,
) -> anyhow::Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(db_host)
        .with_context(|| format!("invalid sqlite url {db_host}"))?
        .create_if_missing(true);

    if encrypted {
        return Ok(options
            .pragma("key", db_pass_encrypt.to_string())
            .pragma("cipher_page_size", "1024")
            .pragma("kdf_iter", "64000")
            .pragma("cipher_hmac_algorithm", "HMAC_SHA1")
            .pragma("cipher_kdf_algorithm", "PBKDF2_HMAC_SHA1")
            .pragma("foreign_keys", "ON")
            .journal_mode(SqliteJournalMode::Delete));
    }

    Ok(options.pragma("foreign_keys", "ON"))
}

pub async fn setup_sqlite_db_pool(encrypted: bool) -> anyhow::Result<SqlitePool> {
    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;

    let options = sqlite_connect_options(
        &app_config.db_host,
        &app_config.db_pass_encrypt,
        encrypted,
    )?;

    Ok(SqlitePool::connect_with(options).await?)
}

/// Client to make http requests
pub static REQUEST_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);
