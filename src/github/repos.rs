//! Repository records
//!
//! Concrete record types for the repos collection, validated at the
//! transport boundary instead of trusting raw payload shapes, plus the
//! license predicate used for filtering.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

/// A single repository as returned by the collection endpoint.
///
/// Only the fields this crate consumes are modeled; everything else in the
/// payload is ignored on decode.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub license: Option<License>,
}

/// License metadata nested inside a repository record
#[derive(Debug, Clone, Deserialize)]
pub struct License {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Decode a collection payload into repo records.
///
/// The payload must be a sequence of records each carrying at least a
/// `name`; anything else is a malformed response, not something to coerce.
pub fn decode_repos(payload: Value) -> Result<Vec<Repo>> {
    serde_json::from_value(payload)
        .map_err(|e| Error::MalformedResponse(format!("expected a sequence of repo records: {e}")))
}

/// Whether `repo` carries exactly the given license key.
///
/// The comparison is byte-for-byte and case-sensitive, never normalized:
/// an "MIT" filter does not match a stored "mit" key. An absent license,
/// a null license, and a license without a key all answer `false`.
pub fn has_license(repo: &Repo, license_key: &str) -> bool {
    repo.license
        .as_ref()
        .and_then(|license| license.key.as_deref())
        .map(|key| key == license_key)
        .unwrap_or(false)
}
