//! Query string parameters

use serde::{Deserialize, Serialize};

/// One `key=value` pair of the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// Name
    pub key: String,
    /// Unencoded value
    pub value: String,
}

impl QueryParam {
    /// Creates a pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered query parameters; a repeated key is sent once per occurrence
/// (`status=active&status=inactive`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<QueryParam>);

impl QueryParams {
    /// No parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a pair.
    pub fn add(&mut self, param: QueryParam) {
        self.0.push(param);
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &QueryParam> {
        self.0.iter()
    }

    /// Number of pairs.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no pair was added.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_are_kept_in_order() {
        let params: QueryParams = [
            QueryParam::new("status", "active"),
            QueryParam::new("name", "John"),
            QueryParam::new("status", "inactive"),
        ]
        .into_iter()
        .collect();

        let values: Vec<_> = params
            .iter()
            .filter(|p| p.key == "status")
            .map(|p| p.value.as_str())
            .collect();
        assert_eq!(params.len(), 3);
        assert_eq!(values, ["active", "inactive"]);
    }
}
