//! # Tenant API Module
//!
//! Tenant identification and the Chatwoot configuration of a tenant.

use derive_more::{Display, Error};

use crate::{models::tenant::ChatwootConfig, repo};

/// One way of identifying the tenant behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantLookup<'a> {
    /// Chatwoot account id of a tenant that configured a chatwoot token
    ChatwootAccount(&'a str),
    /// The tenant's own api token
    Token(&'a str),
}

impl TenantLookup<'_> {
    /// `None` when nothing matches. Store errors count as no match.
    pub async fn find(&self, repo: &repo::ImplTenantRepo) -> Option<i64> {
        let result = match self {
            Self::ChatwootAccount(account_id) if !account_id.trim().is_empty() => {
                repo.find_tenant_by_chatwoot_account(account_id.trim()).await
            }
            Self::Token(token) if !token.trim().is_empty() => {
                repo.find_tenant_by_token(token.trim()).await
            }
            _ => return None,
        };

        result.unwrap_or_else(|e| {
            logfire::warn!(
                "Tenant lookup failed: {error}",
                error = e.to_string(),
                lookup = format!("{self:?}")
            );
            None
        })
    }
}

/// Tries each lookup in order and returns the first tenant found.
pub async fn resolve_tenant(
    repo: &repo::ImplTenantRepo,
    lookups: &[TenantLookup<'_>],
) -> Option<i64> {
    for lookup in lookups {
        if let Some(tenant_id) = lookup.find(repo).await {
            return Some(tenant_id);
        }
    }

    None
}

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("invalid chatwoot url: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    #[display("tenant not found")]
    TenantNotFound,
    #[display("{_0}")]
    Store(#[error(not(source))] anyhow::Error),
}

/// Checks that a configured url is an absolute http(s) url. Empty urls are
/// allowed, they keep the bridge disabled.
pub fn validate_chatwoot_config(config: &ChatwootConfig) -> Result<(), ConfigError> {
    let url = config.url.trim();
    if url.is_empty() {
        return Ok(());
    }

    match reqwest::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        Ok(_) => Err(ConfigError::InvalidUrl(format!("{url} is not an http(s) url"))),
        Err(e) => Err(ConfigError::InvalidUrl(format!("{url}: {e}"))),
    }
}

pub async fn get_chatwoot_config(
    repo: &repo::ImplTenantRepo,
    tenant_id: i64,
) -> Result<ChatwootConfig, ConfigError> {
    repo.get_chatwoot_config(tenant_id)
        .await
        .map_err(ConfigError::Store)?
        .ok_or(ConfigError::TenantNotFound)
}

pub async fn update_chatwoot_config(
    repo: &repo::ImplTenantRepo,
    tenant_id: i64,
    config: &ChatwootConfig,
) -> Result<(), ConfigError> {
    validate_chatwoot_config(config)?;

    repo.save_chatwoot_config(tenant_id, config)
        .await
        .map_err(ConfigError::Store)
}

pub async fn delete_chatwoot_config(
    repo: &repo::ImplTenantRepo,
    tenant_id: i64,
) -> Result<(), ConfigError> {
    repo.delete_chatwoot_config(tenant_id)
        .await
        .map_err(ConfigError::Store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{MockTenantRepo, TenantRepo};
    use std::sync::Arc;

    fn into_repo(mock: MockTenantRepo) -> repo::ImplTenantRepo {
        Arc::new(mock) as Arc<dyn TenantRepo>
    }

    fn config(url: &str) -> ChatwootConfig {
        ChatwootConfig {
            url: url.into(),
            account_id: "3".into(),
            token: "secret".into(),
            inbox_id: "9".into(),
        }
    }

    #[ntex::test]
    async fn test_resolve_tenant_prefers_chatwoot_account() {
        let mut mock = MockTenantRepo::new();
        mock.expect_find_tenant_by_chatwoot_account()
            .withf(|account_id| account_id == "3")
            .times(1)
            .returning(|_| Ok(Some(10)));
        mock.expect_find_tenant_by_token().never();

        let tenant_id = resolve_tenant(
            &into_repo(mock),
            &[TenantLookup::ChatwootAccount("3"), TenantLookup::Token("abc")],
        )
        .await;

        assert_eq!(tenant_id, Some(10));
    }

    #[ntex::test]
    async fn test_resolve_tenant_falls_back_to_token() {
        let mut mock = MockTenantRepo::new();
        mock.expect_find_tenant_by_chatwoot_account()
            .times(1)
            .returning(|_| Ok(None));
        mock.expect_find_tenant_by_token()
            .withf(|token| token == "abc")
            .times(1)
            .returning(|_| Ok(Some(11)));

        let tenant_id = resolve_tenant(
            &into_repo(mock),
            &[TenantLookup::ChatwootAccount("3"), TenantLookup::Token("abc")],
        )
        .await;

        assert_eq!(tenant_id, Some(11));
    }

    #[ntex::test]
    async fn test_resolve_tenant_store_error_is_not_found() {
        let mut mock = MockTenantRepo::new();
        mock.expect_find_tenant_by_chatwoot_account()
            .returning(|_| Err(anyhow::anyhow!("no such table: tenant")));
        mock.expect_find_tenant_by_token().returning(|_| Ok(None));

        let tenant_id = resolve_tenant(
            &into_repo(mock),
            &[TenantLookup::ChatwootAccount("3"), TenantLookup::Token("abc")],
        )
        .await;

        assert_eq!(tenant_id, None);
    }

    #[ntex::test]
    async fn test_empty_lookups_skip_the_store() {
        let tenant_id = resolve_tenant(
            &into_repo(MockTenantRepo::new()),
            &[TenantLookup::ChatwootAccount(""), TenantLookup::Token(" ")],
        )
        .await;

        assert_eq!(tenant_id, None);
    }

    #[test]
    fn test_validate_chatwoot_config() {
        assert!(validate_chatwoot_config(&config("https://desk.example.com")).is_ok());
        assert!(validate_chatwoot_config(&config("http://10.0.0.2:3000/")).is_ok());
        assert!(validate_chatwoot_config(&ChatwootConfig::default()).is_ok());
        assert!(matches!(
            validate_chatwoot_config(&config("desk.example.com")),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_chatwoot_config(&config("ftp://desk.example.com")),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[ntex::test]
    async fn test_update_rejects_invalid_url_without_saving() {
        let mut mock = MockTenantRepo::new();
        mock.expect_save_chatwoot_config().never();

        let result = update_chatwoot_config(&into_repo(mock), 1, &config("not a url")).await;

        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[ntex::test]
    async fn test_get_chatwoot_config_unknown_tenant() {
        let mut mock = MockTenantRepo::new();
        mock.expect_get_chatwoot_config().returning(|_| Ok(None));

        let result = get_chatwoot_config(&into_repo(mock), 1).await;

        assert!(matches!(result, Err(ConfigError::TenantNotFound)));
    }
}
