//! Property-based tests using proptest
//!
//! These tests verify nested value access, license filtering, and batch
//! streamer bookkeeping using randomized inputs.

use orgstream::github::{decode_repos, has_license, License, Repo};
use orgstream::nested;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Generate arbitrary repo entries shaped like the collection payload
fn arb_repo() -> impl Strategy<Value = Value> {
    (
        "[a-z][a-z0-9-]{0,30}", // name
        prop_oneof![
            Just(None),
            Just(Some("mit")),
            Just(Some("apache-2.0")),
            Just(Some("gpl-3.0")),
            Just(Some("bsd-3-clause")),
        ],
    )
        .prop_map(|(name, license)| match license {
            Some(key) => json!({"name": name, "license": {"key": key}}),
            None => json!({"name": name}),
        })
}

/// Generate a repo collection payload
fn arb_repo_list() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(arb_repo(), 0..50)
}

proptest! {
    /// A value planted at a path is always found at that path
    #[test]
    fn planted_value_is_found(
        keys in prop::collection::vec("[a-z]{1,8}", 1..5),
        leaf in 0i64..1000
    ) {
        let expected = json!(leaf);
        let mut value = expected.clone();
        for key in keys.iter().rev() {
            let mut node = serde_json::Map::new();
            node.insert(key.clone(), value);
            value = Value::Object(node);
        }

        let path: Vec<&str> = keys.iter().map(String::as_str).collect();
        let found = nested::access(&value, &path);
        prop_assert!(found.is_ok());
        prop_assert_eq!(found.unwrap(), &expected);
    }

    /// Access never mutates the payload and is repeatable
    #[test]
    fn access_is_repeatable(keys in prop::collection::vec("[a-z]{1,8}", 1..4)) {
        let mut value = json!("leaf");
        for key in keys.iter().rev() {
            let mut node = serde_json::Map::new();
            node.insert(key.clone(), value);
            value = Value::Object(node);
        }
        let snapshot = value.clone();

        let path: Vec<&str> = keys.iter().map(String::as_str).collect();
        let first = nested::access(&value, &path).cloned();
        let second = nested::access(&value, &path).cloned();

        prop_assert_eq!(first.ok(), second.ok());
        prop_assert_eq!(value, snapshot);
    }

    /// Lookups under a scalar fail and the error names the failing key
    #[test]
    fn scalar_parent_names_failing_key(key in "[a-z]{1,8}") {
        let value = json!({"top": 1});
        let result = nested::access(&value, &["top", key.as_str()]);

        prop_assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        prop_assert!(message.contains(&key));
    }
}

/// Tests for license filtering over decoded repo records
mod license_filter_tests {
    use super::*;

    proptest! {
        /// Filtering never increases the repo count
        #[test]
        fn filter_never_increases_count(
            repos in arb_repo_list(),
            key in "[a-z0-9-]{1,12}"
        ) {
            let all = decode_repos(Value::Array(repos)).unwrap();
            let matching = all.iter().filter(|r| has_license(r, &key)).count();
            prop_assert!(matching <= all.len());
        }

        /// Every repo kept by the filter actually carries the key
        #[test]
        fn kept_repos_carry_the_key(repos in arb_repo_list()) {
            let all = decode_repos(Value::Array(repos)).unwrap();
            for key in ["mit", "apache-2.0", "gpl-3.0"] {
                for repo in all.iter().filter(|r| has_license(r, key)) {
                    let found = repo.license.as_ref().and_then(|l| l.key.as_deref());
                    prop_assert_eq!(found, Some(key));
                }
            }
        }

        /// License matching never treats differently-cased keys as equal
        #[test]
        fn license_match_is_case_sensitive(name in "[a-z][a-z0-9-]{0,20}") {
            let repo = Repo {
                name,
                license: Some(License {
                    key: Some("MIT".to_string()),
                    name: None,
                }),
            };
            prop_assert!(has_license(&repo, "MIT"));
            prop_assert!(!has_license(&repo, "mit"));
        }

        /// Repos without a license never match any key
        #[test]
        fn unlicensed_repos_never_match(
            name in "[a-z]{1,10}",
            key in "[a-z-]{1,10}"
        ) {
            let repo = Repo { name, license: None };
            prop_assert!(!has_license(&repo, &key));
        }
    }
}

/// Tests for batch streamer bookkeeping over an in-memory store
mod batch_tests {
    use super::*;
    use async_trait::async_trait;
    use futures::TryStreamExt;
    use orgstream::stream::{BatchStreamer, RowConnection, RowStore, UserRow};
    use proptest::test_runner::TestCaseError;

    /// Store over a fixed vector of rows
    #[derive(Clone)]
    struct VecStore {
        rows: Vec<UserRow>,
    }

    struct VecConnection {
        rows: Vec<UserRow>,
    }

    #[async_trait]
    impl RowStore for VecStore {
        type Conn = VecConnection;

        async fn connect(&self) -> orgstream::Result<VecConnection> {
            Ok(VecConnection {
                rows: self.rows.clone(),
            })
        }
    }

    #[async_trait]
    impl RowConnection for VecConnection {
        async fn fetch(&mut self, limit: usize, offset: u64) -> orgstream::Result<Vec<UserRow>> {
            let start = (offset as usize).min(self.rows.len());
            let end = (start + limit).min(self.rows.len());
            Ok(self.rows[start..end].to_vec())
        }
    }

    fn make_rows(count: usize) -> Vec<UserRow> {
        (0..count)
            .map(|i| UserRow {
                id: i as i64 + 1,
                name: format!("user-{i}"),
                email: format!("user-{i}@example.com"),
                age: 20 + (i as i64 % 40),
            })
            .collect()
    }

    proptest! {
        /// Draining batches yields every row exactly once, in order
        #[test]
        fn batches_cover_all_rows(count in 0usize..40, batch in 1usize..10) {
            let result: Result<(), TestCaseError> = tokio_test::block_on(async {
                let store = VecStore { rows: make_rows(count) };
                let mut streamer = BatchStreamer::new(store, batch);

                let mut seen = Vec::new();
                while let Some(rows) = streamer.next_batch().await.unwrap() {
                    prop_assert!(rows.len() <= batch);
                    prop_assert!(!rows.is_empty());
                    seen.extend(rows);
                }

                let ids: Vec<i64> = seen.iter().map(|row| row.id).collect();
                let expected: Vec<i64> = (1..=count as i64).collect();
                prop_assert_eq!(ids, expected);
                Ok(())
            });
            result?;
        }

        /// After draining, the offset equals the row count and the streamer is exhausted
        #[test]
        fn drained_streamer_reports_exhaustion(count in 0usize..40, batch in 1usize..10) {
            let result: Result<(), TestCaseError> = tokio_test::block_on(async {
                let store = VecStore { rows: make_rows(count) };
                let mut streamer = BatchStreamer::new(store, batch);

                while streamer.next_batch().await.unwrap().is_some() {}

                prop_assert_eq!(streamer.offset(), count as u64);
                prop_assert!(streamer.is_exhausted());
                Ok(())
            });
            result?;
        }

        /// A filtered stream equals the full stream filtered after the fact
        #[test]
        fn filtered_stream_matches_post_filter(
            count in 0usize..40,
            batch in 1usize..10,
            cutoff in 18i64..70
        ) {
            let result: Result<(), TestCaseError> = tokio_test::block_on(async {
                let rows = make_rows(count);
                let store = VecStore { rows: rows.clone() };

                let filtered: Vec<UserRow> = BatchStreamer::new(store, batch)
                    .stream_filtered(move |row| row.age > cutoff)
                    .try_collect()
                    .await
                    .unwrap();

                let expected: Vec<UserRow> =
                    rows.into_iter().filter(|row| row.age > cutoff).collect();
                prop_assert_eq!(filtered, expected);
                Ok(())
            });
            result?;
        }
    }
}
