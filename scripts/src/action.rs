use clap::{Args, Parser, Subcommand};

use crate::{config, utils};

#[derive(Args, Debug, Clone)]
pub struct RunMigrationsArgs {
    /// Migration file name, relative to the migrations dir
    #[arg(short, long)]
    file: String,
    #[arg(long, default_value = "../migrations")]
    migrations_dir: String,
}

#[derive(Args, Debug, Clone)]
pub struct CreateTenantArgs {
    #[arg(short, long)]
    name: String,
    /// Api token of the tenant, a random one is generated when missing
    #[arg(short, long)]
    token: Option<String>,
    /// WhatsApp Business Cloud phone number id
    #[arg(long, requires = "whatsapp_auth_token")]
    whatsapp_phone_number_id: Option<String>,
    /// WhatsApp Business Cloud access token
    #[arg(long, requires = "whatsapp_phone_number_id")]
    whatsapp_auth_token: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    RunMigrations(RunMigrationsArgs),
    CreateTenant(CreateTenantArgs),
}

/// Maintenance tasks of the chatwoot bridge database
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    pub async fn run(&self) -> anyhow::Result<()> {
        let app_config = config::AppConfig::load()?;
        let db_pool = utils::setup_sqlite_db_pool(&app_config).await?;

        match &self.action {
            Action::RunMigrations(RunMigrationsArgs {
                file,
                migrations_dir,
            }) => utils::run_migrations(&db_pool, migrations_dir, file).await,
            Action::CreateTenant(args) => {
                let token = args
                    .token
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

                let tenant_id = utils::create_tenant(
                    &db_pool,
                    &utils::NewTenant {
                        name: &args.name,
                        token: &token,
                        whatsapp_phone_number_id: args.whatsapp_phone_number_id.as_deref(),
                        whatsapp_auth_token: args.whatsapp_auth_token.as_deref(),
                    },
                )
                .await?;

                println!("tenant {tenant_id} created, token: {token}");
                Ok(())
            }
        }
    }
}
