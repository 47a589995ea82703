//! User payload

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// User gender as accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// male
    Male,
    /// female
    Female,
}

/// Account status as accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// active
    #[default]
    Active,
    /// inactive
    Inactive,
}

impl UserStatus {
    /// Wire representation, used for query parameters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user record. `id` is assigned by the server on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Display name
    pub name: String,
    /// Unique e-mail address
    pub email: String,
    /// Gender
    pub gender: Gender,
    /// Account status
    pub status: UserStatus,
}

impl User {
    /// Creates an active user without an id.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            gender,
            status: UserStatus::Active,
        }
    }

    /// Sets the account status.
    #[must_use]
    pub const fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the user was never created.
    pub fn require_id(&self) -> DomainResult<u64> {
        self.id.ok_or(DomainError::MissingField("id"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_wire_format() {
        let user = User::new("John Doe", "john@test.com", Gender::Male);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "John Doe",
                "email": "john@test.com",
                "gender": "male",
                "status": "active"
            })
        );
    }

    #[test]
    fn test_decode_created_user() {
        let user: User = serde_json::from_str(
            r#"{"id": 77, "name": "Jane", "email": "j@test.com", "gender": "female", "status": "inactive"}"#,
        )
        .unwrap();
        assert_eq!(user.require_id().unwrap(), 77);
        assert_eq!(user.gender, Gender::Female);
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn test_require_id_before_creation() {
        let user = User::new("A", "a@test.com", Gender::Female);
        assert_eq!(user.require_id(), Err(DomainError::MissingField("id")));
    }
}
