//! Nested payload traversal
//!
//! Walks a JSON object tree by an ordered sequence of keys. The first key
//! that cannot be resolved fails the whole traversal with
//! [`Error::KeyNotFound`] naming that key; callers that want a default
//! decide for themselves.

use crate::error::{Error, Result};
use serde_json::Value;

/// Resolve `path` against `map`, key by key.
///
/// An empty path returns `map` itself. Each step requires the current node
/// to be a JSON object containing the key; anything else (missing key,
/// scalar or array parent) is `KeyNotFound` for that key.
pub fn access<'a>(map: &'a Value, path: &[&str]) -> Result<&'a Value> {
    let mut current = map;
    for key in path {
        current = current
            .as_object()
            .and_then(|node| node.get(*key))
            .ok_or_else(|| Error::KeyNotFound((*key).to_string()))?;
    }
    Ok(current)
}
