//! Authentication types for JWT and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Application-wide user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can manage users and see cross-user statistics.
    Admin,
    /// Regular account holder.
    User,
}

impl UserRole {
    /// Returns true if this role can reach admin-only routes.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User email at issue time.
    pub email: String,
    /// User role.
    pub role: UserRole,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, email: &str, role: UserRole, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if the token carries the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Deserializes a string without its surrounding whitespace.
///
/// Runs before validation, so `"  ana@example.com "` passes an email check.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

/// Like [`trimmed`], for optional fields.
///
/// Use with `#[serde(default, deserialize_with = "trimmed_option")]`.
pub fn trimmed_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|s| s.map(|s| s.trim().to_string()))
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 6, message = "must have at least 6 characters"))]
    pub password: String,
    /// User display name.
    #[validate(length(min = 1, max = 120, message = "is required"))]
    pub name: String,
}

/// User info returned in auth and user-management responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: UserRole,
    /// Whether the user can log in.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Response for register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token.
    pub token: String,
    /// Authenticated user.
    pub user: UserInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_email_passes_validation() {
        let register: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "  Ana@Example.COM ",
            "password": "secret123",
            "name": "Ana",
        }))
        .unwrap();
        assert_eq!(register.email, "Ana@Example.COM");
        assert!(register.validate().is_ok());

        let login: LoginRequest = serde_json::from_value(serde_json::json!({
            "email": "\tana@example.com\n",
            "password": "secret123",
        }))
        .unwrap();
        assert!(login.validate().is_ok());
    }

    #[test]
    fn test_trimmed_option_keeps_absent_and_null_apart_from_values() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default, deserialize_with = "trimmed_option")]
            email: Option<String>,
        }

        let absent: Body = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.email, None);
        let padded: Body = serde_json::from_str(r#"{"email":" a@b.co "}"#).unwrap();
        assert_eq!(padded.email.as_deref(), Some("a@b.co"));
    }
}
