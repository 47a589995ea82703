//! Product payload, served by the API's posts resource

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A product record. `id` is assigned by the server on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Owning user
    pub user_id: u64,
    /// Title
    pub title: String,
    /// Description text
    pub body: String,
}

impl Product {
    /// Creates a product without an id.
    #[must_use]
    pub fn new(user_id: u64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Returns the server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the product was never created.
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
    fn test_wire_uses_snake_case_user_id() {
        let product = Product::new(12345, "T", "B");
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"user_id": 12345, "title": "T", "body": "B"})
        );

        let decoded: Product =
            serde_json::from_str(r#"{"id": 5, "user_id": 12345, "title": "T", "body": "B"}"#)
                .unwrap();
        assert_eq!(decoded.require_id().unwrap(), 5);
    }
}
