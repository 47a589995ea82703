//! Minimal JSON path evaluation for response checks.

use crate::error::{DomainError, DomainResult};

/// Query a JSON value using a simple JSONPath-like syntax.
///
/// Supports `$`, `$.field`, `$.field.nested`, `$.array[0]`, `$[0].field` and
/// `$.array[*]` (which yields the whole array).
///
/// # Errors
///
/// Returns an error if the path does not start with `$` or an index is not a
/// number.
pub fn query_json_path(
    json: &serde_json::Value,
    path: &str,
) -> DomainResult<Option<serde_json::Value>> {
    let invalid = |reason: String| DomainError::InvalidJsonPath {
        path: path.to_string(),
        reason,
    };

    let Some(rest) = path.trim().strip_prefix('$') else {
        return Err(invalid("must start with '$'".to_string()));
    };
    let rest = rest.strip_prefix('.').unwrap_or(rest);

    let mut current = json;
    for segment in split_path_segments(rest) {
        if let Some((name, index)) = parse_array_access(&segment) {
            if !name.is_empty() {
                match current.get(name) {
                    Some(v) => current = v,
                    None => return Ok(None),
                }
            }
            if index == "*" {
                return Ok(Some(current.clone()));
            }
            let idx: usize = index
                .parse()
                .map_err(|_| invalid(format!("invalid array index: {index}")))?;
            match current.get(idx) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        } else {
            match current.get(segment.as_str()) {
                Some(v) => current = v,
                None => return Ok(None),
            }
        }
    }

    Ok(Some(current.clone()))
}

/// Split a path into segments, respecting array brackets.
///
/// `[0].id` becomes `["[0]", "id"]` and `items[2]` stays one segment.
fn split_path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                if !in_bracket && current.ends_with(']') {
                    segments.push(std::mem::take(&mut current));
                }
                in_bracket = true;
                current.push(ch);
            }
            ']' => {
                in_bracket = false;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Parse array access like "field[0]" into ("field", "0").
fn parse_array_access(segment: &str) -> Option<(&str, &str)> {
    let bracket_start = segment.find('[')?;
    if segment.ends_with(']') {
        Some((
            &segment[..bracket_start],
            &segment[bracket_start + 1..segment.len() - 1],
        ))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_and_fields() {
        let value = json!({"data": {"id": 3}});
        assert_eq!(query_json_path(&value, "$").unwrap(), Some(value.clone()));
        assert_eq!(query_json_path(&value, "$.data.id").unwrap(), Some(json!(3)));
        assert_eq!(query_json_path(&value, "$.data.missing").unwrap(), None);
    }

    #[test]
    fn test_array_access() {
        let value = json!({"items": [[1, 2], [3]]});
        assert_eq!(query_json_path(&value, "$.items[1]").unwrap(), Some(json!([3])));
        assert_eq!(query_json_path(&value, "$.items[0][1]").unwrap(), Some(json!(2)));
        assert_eq!(query_json_path(&value, "$.items[5]").unwrap(), None);
        assert_eq!(
            query_json_path(&value, "$.items[*]").unwrap(),
            Some(json!([[1, 2], [3]]))
        );
    }

    #[test]
    fn test_invalid_paths() {
        let value = json!([]);
        assert!(query_json_path(&value, "items").is_err());
        assert!(query_json_path(&value, "$[x]").is_err());
    }
}
