//! HTTP Header types

use serde::{Deserialize, Serialize};

/// A single HTTP header with name and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name (e.g., "Content-Type")
    pub name: String,
    /// The header value (e.g., "application/json")
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered collection of HTTP headers with case-insensitive names.
///
/// Setting a header that already exists replaces its value in place, so a
/// spec never carries two `Authorization` values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Sets a header, replacing any existing header with the same name.
    pub fn set(&mut self, header: Header) {
        match self
            .items
            .iter_mut()
            .find(|h| h.name.eq_ignore_ascii_case(&header.name))
        {
            Some(existing) => existing.value = header.value,
            None => self.items.push(header),
        }
    }

    /// Removes a header by name. Returns true if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|h| !h.name.eq_ignore_ascii_case(name));
        before != self.items.len()
    }

    /// Looks up a header value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns an iterator over the headers.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.items.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len is not const in stable
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        let mut headers = Self::new();
        for header in iter {
            headers.set(header);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_case_insensitively() {
        let mut headers = Headers::new();
        headers.set(Header::new("Authorization", "Bearer a"));
        headers.set(Header::new("authorization", "Bearer b"));

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("AUTHORIZATION"), Some("Bearer b"));
    }

    #[test]
    fn test_remove() {
        let mut headers: Headers = [Header::new("Accept", "application/json")]
            .into_iter()
            .collect();
        assert!(headers.remove("accept"));
        assert!(!headers.remove("accept"));
        assert!(headers.is_empty());
    }
}
