/// Application user model and role
///
/// `app_user` holds access-control credentials only; it is distinct from the
/// `employee` business table. Passwords are stored as Argon2id hashes.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'viewer');
///
/// CREATE TABLE app_user (
///     id SERIAL PRIMARY KEY,
///     username VARCHAR(64) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'viewer'
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Coarse access-control role
///
/// - **admin**: may create, update, delete, and import records
/// - **viewer**: read-only access to every overview page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May perform all mutations
    Admin,

    /// Read-only access
    Viewer,
}

impl Role {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }
}

/// Credential record for access control
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AppUser {
    /// Surrogate key
    pub id: i32,

    /// Unique login name
    pub username: String,

    /// Argon2id password hash (never plaintext)
    pub password_hash: String,

    /// Access-control role
    pub role: Role,
}

impl AppUser {
    /// Finds a user by username
    ///
    /// At most one row matches (unique constraint). Returns `None` when the
    /// username is unknown; the login handler must not surface that
    /// distinction to the client.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, AppUser>(
            r#"
            SELECT id, username, password_hash, role
            FROM app_user
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Viewer.as_str(), "viewer");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);
    }
}
