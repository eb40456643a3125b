//! GitHub organization client
//!
//! One client instance is bound to one organization name. The org payload
//! and the collection URL derived from it are each fetched at most once per
//! instance; the repo listing is deliberately uncached and re-fetches on
//! every call.

use crate::cache::CacheSlot;
use crate::error::{Error, Result};
use crate::github::http::HttpTransport;
use crate::github::repos;
use serde_json::Value;

/// Default base URL for the GitHub REST API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Lazy-cached client for a single organization
pub struct OrgClient {
    org_name: String,
    base_url: String,
    transport: HttpTransport,
    org: CacheSlot<Value>,
    repos_url: CacheSlot<String>,
}

impl OrgClient {
    /// Create a client for `org_name` against the public GitHub API
    pub fn new(org_name: &str) -> Result<Self> {
        Ok(Self::with_base_url(
            org_name,
            DEFAULT_BASE_URL,
            HttpTransport::new()?,
        ))
    }

    /// Create a client against a custom base URL (test servers, proxies)
    pub fn with_base_url(org_name: &str, base_url: &str, transport: HttpTransport) -> Self {
        Self {
            org_name: org_name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            org: CacheSlot::new(),
            repos_url: CacheSlot::new(),
        }
    }

    /// Exact org endpoint for this client: `{base_url}/orgs/{org_name}`
    pub fn org_url(&self) -> String {
        format!("{}/orgs/{}", self.base_url, self.org_name)
    }

    /// Fetch the organization payload.
    ///
    /// Memoized: the network call happens on the first read only; later
    /// reads on the same instance return the stored payload. Transport
    /// failures propagate unmodified and leave the slot empty.
    pub async fn org(&self) -> Result<Value> {
        self.org
            .get_or_try_init(|| async {
                tracing::info!("fetching organization {}", self.org_name);
                self.transport.get(&self.org_url()).await
            })
            .await
    }

    /// The collection URL discovered inside the org payload.
    ///
    /// Derived and memoized; triggers [`Self::org`] on the first call. The
    /// value is taken verbatim from the payload's `repos_url` field, never
    /// rebuilt from a template. A payload without that field fails with
    /// [`Error::KeyNotFound`].
    pub async fn repos_url(&self) -> Result<String> {
        self.repos_url
            .get_or_try_init(|| async {
                let org = self.org().await?;
                let url = crate::nested::access(&org, &["repos_url"])?;
                url.as_str().map(str::to_string).ok_or_else(|| {
                    Error::MalformedResponse("org field `repos_url` is not a string".to_string())
                })
            })
            .await
    }

    /// List the organization's repo names, optionally keeping only repos
    /// under the given license key.
    ///
    /// Not cached: every call re-fetches the collection. Response order is
    /// preserved; no re-sorting happens here.
    pub async fn public_repos(&self, license: Option<&str>) -> Result<Vec<String>> {
        let url = self.repos_url().await?;
        tracing::debug!("listing repos for {}", self.org_name);
        let payload = self.transport.get(&url).await?;
        let all = repos::decode_repos(payload)?;
        let total = all.len();

        let names: Vec<String> = all
            .into_iter()
            .filter(|repo| license.map_or(true, |key| repos::has_license(repo, key)))
            .map(|repo| repo.name)
            .collect();

        tracing::debug!("{} of {} repos kept after filtering", names.len(), total);
        Ok(names)
    }
}
