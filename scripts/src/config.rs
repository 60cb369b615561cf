use anyhow::Context;
use envconfig::Envconfig;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    #[envconfig(default = "local")]
    pub env: String,
    pub db_host: String,
    #[envconfig(default = "")]
    pub db_pass_encrypt: String,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::init_from_env().context("failed to load scripts configuration, is DB_HOST set?")
    }

    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }
}
