//! Command line definition

use clap::{Parser, Subcommand};
use cms_core::value_objects::AdminRole;

/// Site CMS operator commands
#[derive(Debug, Parser)]
#[command(name = "cms-cli", version)]
#[command(about = "Maintenance commands for the site content backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Apply migrations and create the default admin account if absent
    Bootstrap,

    /// Create an admin account on behalf of an existing admin
    CreateAdmin {
        /// Existing admin account performing the creation
        #[arg(long)]
        actor: String,

        #[arg(long)]
        username: String,

        #[arg(long, env = "CMS_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, default_value_t = AdminRole::Admin)]
        role: AdminRole,
    },

    /// Set a new password and revoke every session of the account
    ResetPassword {
        #[arg(long)]
        username: String,

        #[arg(long, env = "CMS_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log an account out everywhere
    RevokeSessions {
        #[arg(long)]
        username: String,
    },

    /// List the active sessions of an account
    Sessions {
        #[arg(long)]
        username: String,
    },
}
