//! Site CMS operator CLI
//!
//! Run with:
//! ```bash
//! cargo run -p cms-cli -- bootstrap
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

mod cli;

use anyhow::Context;
use clap::Parser;
use cms_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use cms_core::entities::UserIdentity;
use cms_db::{create_pool, run_migrations, PoolConfig};
use cms_service::dto::CreateAdminUserRequest;
use cms_service::{AdminUserService, AuthService, ServiceContext};
use tracing::{error, info};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    if let Err(e) = run(args).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(env = ?config.app.env, database = %config.database.url, "Configuration loaded");

    let pool = create_pool(&PoolConfig::from_app_config(&config.database))
        .await
        .context("Failed to open database")?;
    let ctx = ServiceContext::from_config(pool, &config).context("Invalid token lifetimes")?;

    match args.command {
        Commands::Migrate => {
            run_migrations(ctx.pool()).await?;
            println!("Migrations applied");
        }
        Commands::Bootstrap => {
            run_migrations(ctx.pool()).await?;
            let outcome = AdminUserService::new(&ctx).bootstrap().await?;
            if outcome.was_created() {
                println!(
                    "Created admin account '{}'. Change its password now.",
                    outcome.user().username
                );
            } else {
                println!("Admin account '{}' already exists", outcome.user().username);
            }
        }
        Commands::CreateAdmin {
            actor,
            username,
            password,
            role,
        } => {
            let actor = find_user(&ctx, &actor).await?;
            let created = AdminUserService::new(&ctx)
                .create_user(
                    &actor,
                    CreateAdminUserRequest {
                        username,
                        password,
                        role,
                    },
                )
                .await?;
            println!(
                "Created {} account '{}' (id {})",
                created.role, created.username, created.id
            );
        }
        Commands::ResetPassword { username, password } => {
            let revoked = AdminUserService::new(&ctx)
                .reset_password(&username, &password)
                .await?;
            println!("Password updated for '{username}', {revoked} session(s) revoked");
        }
        Commands::RevokeSessions { username } => {
            let user = find_user(&ctx, &username).await?;
            let revoked = AuthService::new(&ctx).revoke_all(user.user_id).await?;
            println!("{revoked} session(s) revoked for '{username}'");
        }
        Commands::Sessions { username } => {
            let user = find_user(&ctx, &username).await?;
            let sessions = AuthService::new(&ctx).list_sessions(user.user_id).await?;
            if sessions.is_empty() {
                println!("No active sessions for '{username}'");
            }
            for session in sessions {
                println!(
                    "{:>6}  created {}  expires {}  from {} ({})",
                    session.id,
                    session.created_at,
                    session.expires_at,
                    session.ip_address.as_deref().unwrap_or("unknown address"),
                    session.device_info.as_deref().unwrap_or("unknown device"),
                );
            }
        }
    }

    Ok(())
}

async fn find_user(ctx: &ServiceContext, username: &str) -> anyhow::Result<UserIdentity> {
    let user = ctx
        .admin_user_repo()
        .find_by_username(username)
        .await?
        .with_context(|| format!("No admin account named '{username}'"))?;

    Ok(UserIdentity::from(&user))
}
