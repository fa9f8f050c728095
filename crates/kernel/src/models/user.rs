//! User model and CRUD operations.

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::Role;
use crate::auth::ActingUser;

/// User record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Login handle.
    pub username: String,
    /// Display name; pages reference their author by this name.
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[serde(skip_serializing)]
    pub pass: String,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub name: String,
    pub password: String,
    pub role: Role,
}

impl User {
    /// Identity of this user for authoring operations.
    pub fn acting(&self) -> ActingUser {
        ActingUser::new(self.name.clone(), self.role)
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, name, role, pass FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by id")?;

        Ok(user)
    }

    /// Find a user by login handle.
    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, name, role, pass FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by username")?;

        Ok(user)
    }

    /// Find a user by display name.
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, name, role, pass FROM users WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by name")?;

        Ok(user)
    }

    /// Create a new user.
    pub async fn create(pool: &SqlitePool, input: CreateUser) -> Result<Self> {
        let pass = hash_password(&input.password)?;

        let result = sqlx::query(
            "INSERT INTO users (username, name, role, pass) VALUES (?, ?, ?, ?)",
        )
        .bind(&input.username)
        .bind(&input.name)
        .bind(input.role.as_str())
        .bind(&pass)
        .execute(pool)
        .await
        .context("failed to create user")?;

        Self::find_by_id(pool, result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to fetch created user"))
    }

    /// List all users.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, name, role, pass FROM users ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .context("failed to list users")?;

        Ok(users)
    }

    /// Verify a password against this user's hash.
    pub fn verify_password(&self, password: &str) -> bool {
        if self.pass.is_empty() {
            return false;
        }

        let Ok(parsed_hash) = PasswordHash::new(&self.pass) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
