//! Command-line interface.
//!
//! Administrative commands operate on the database pool only, without
//! starting the HTTP server.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use crate::models::{CreateUser, Role, User, Website};

/// Pagedesk content server.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Manage user accounts.
    #[command(subcommand)]
    User(UserCommand),

    /// Manage the website setting.
    #[command(subcommand)]
    Website(WebsiteCommand),
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user account.
    Add {
        /// Login handle.
        #[arg(long)]
        username: String,

        /// Display name, used as the page author.
        #[arg(long)]
        name: String,

        #[arg(long)]
        password: String,

        /// Grant the Admin role.
        #[arg(long)]
        admin: bool,
    },

    /// List user accounts.
    List,
}

#[derive(Debug, Subcommand)]
pub enum WebsiteCommand {
    /// Rename the website.
    SetName { name: String },
}

/// Create a user account.
pub async fn cmd_user_add(
    pool: &SqlitePool,
    username: &str,
    name: &str,
    password: &str,
    admin: bool,
) -> Result<()> {
    if username.trim().is_empty() || name.trim().is_empty() {
        bail!("username and name must not be empty");
    }

    if User::find_by_username(pool, username).await?.is_some() {
        bail!("username '{username}' is already taken");
    }

    if User::find_by_name(pool, name).await?.is_some() {
        bail!("name '{name}' is already taken");
    }

    let role = if admin { Role::Admin } else { Role::Author };

    let user = User::create(
        pool,
        CreateUser {
            username: username.to_string(),
            name: name.to_string(),
            password: password.to_string(),
            role,
        },
    )
    .await?;

    println!("Created user '{}' ({}) with id {}.", user.username, user.role, user.id);
    Ok(())
}

/// List user accounts.
pub async fn cmd_user_list(pool: &SqlitePool) -> Result<()> {
    let users = User::list(pool).await?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{:<6} {:<24} {:<24} {:<8}", "ID", "USERNAME", "NAME", "ROLE");
    println!("{}", "-".repeat(64));

    for user in &users {
        println!(
            "{:<6} {:<24} {:<24} {:<8}",
            user.id, user.username, user.name, user.role
        );
    }

    Ok(())
}

/// Rename the website.
pub async fn cmd_website_set_name(pool: &SqlitePool, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("website name must not be empty");
    }

    if !Website::set_name(pool, name).await? {
        bail!("website record is missing; run migrations first");
    }

    println!("Website renamed to '{name}'.");
    Ok(())
}
