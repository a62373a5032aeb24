//! User model, permissions and JWT claims

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Capabilities a principal may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create, update and delete authors
    CanAffectAuthors,
    /// Create, update and delete books, copies and reference data
    CanAffectBooks,
    /// Lend, renew and return copies
    CanMarkReturned,
    /// See every copy currently on loan
    ViewAllBorrowed,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::CanAffectAuthors,
        Permission::CanAffectBooks,
        Permission::CanMarkReturned,
        Permission::ViewAllBorrowed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CanAffectAuthors => "can_affect_authors",
            Permission::CanAffectBooks => "can_affect_books",
            Permission::CanMarkReturned => "can_mark_returned",
            Permission::ViewAllBorrowed => "view_all_borrowed",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

/// Internal row structure (permissions stored as a text array)
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub password: Option<String>,
    pub permissions: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let permissions = row
            .permissions
            .iter()
            .filter_map(|p| match p.parse() {
                Ok(permission) => Some(permission),
                Err(e) => {
                    tracing::warn!("Ignoring permission on user {}: {}", row.id, e);
                    None
                }
            })
            .collect();

        User {
            id: row.id,
            username: row.username,
            password: row.password,
            permissions,
        }
    }
}

/// Account able to sign in and borrow copies
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub permissions: Vec<Permission>,
}

/// New account, used by the seed utility
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: Option<String>,
    pub permissions: Vec<Permission>,
}

/// Short user reference embedded in copy views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    pub id: i32,
    pub username: String,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub permissions: Vec<Permission>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Permission '{}' required",
                permission
            )))
        }
    }

    // Authorization checks
    pub fn require_affect_authors(&self) -> Result<(), AppError> {
        self.require(Permission::CanAffectAuthors)
    }

    pub fn require_affect_books(&self) -> Result<(), AppError> {
        self.require(Permission::CanAffectBooks)
    }

    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        self.require(Permission::CanMarkReturned)
    }

    pub fn require_view_all_borrowed(&self) -> Result<(), AppError> {
        self.require(Permission::ViewAllBorrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(permissions: Vec<Permission>) -> UserClaims {
        let now = chrono::Utc::now().timestamp();
        UserClaims {
            sub: "marian".to_string(),
            user_id: 7,
            permissions,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_token_roundtrip_keeps_permissions() {
        let original = claims(vec![Permission::CanMarkReturned]);
        let token = original.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();

        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.permissions, vec![Permission::CanMarkReturned]);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let token = claims(vec![]).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_require_reports_forbidden() {
        let patron = claims(vec![]);
        assert!(matches!(
            patron.require_view_all_borrowed(),
            Err(AppError::Authorization(_))
        ));

        let librarian = claims(Permission::ALL.to_vec());
        assert!(librarian.require_view_all_borrowed().is_ok());
        assert!(librarian.require_affect_authors().is_ok());
    }

    #[test]
    fn test_unknown_permissions_are_dropped_from_rows() {
        let user: User = UserRow {
            id: 1,
            username: "ada".to_string(),
            password: None,
            permissions: vec!["can_affect_books".to_string(), "fly".to_string()],
        }
        .into();
        assert_eq!(user.permissions, vec![Permission::CanAffectBooks]);
    }
}
