//! GitHub API interaction module
//!
//! Provides the lazy-cached organization client and its collaborators.
//!
//! # Module Structure
//!
//! - [`http`] - HTTP transport wrapper over the GitHub REST API
//! - [`client`] - Per-organization client with memoized fetches
//! - [`repos`] - Repository record types and the license predicate
//!
//! # Example
//!
//! ```ignore
//! use orgstream::github::client::OrgClient;
//!
//! async fn example() -> orgstream::error::Result<()> {
//!     let client = OrgClient::new("google")?;
//!     let apache = client.public_repos(Some("apache-2.0")).await?;
//!     println!("{} apache-licensed repos", apache.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod repos;

pub use client::OrgClient;
pub use http::HttpTransport;
pub use repos::{decode_repos, has_license, License, Repo};
