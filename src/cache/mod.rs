use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::models::{ClassifiedLanguage, ProfileStats};

/// What one aggregation run produced, stored as a single JSON value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachePayload {
    pub languages: Vec<ClassifiedLanguage>,
    pub stats: Option<ProfileStats>,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: CachePayload,
    /// Epoch millis at write time. Expiry is the caller's check; the
    /// store itself keeps no policy.
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn is_fresh(&self, expiry_millis: i64, now_millis: i64) -> bool {
        now_millis - self.timestamp < expiry_millis
    }
}

/// Best-effort key/value store for aggregation snapshots, keyed by
/// `(username, include_private)`. Read and write failures are logged
/// and absorbed here; a broken cache must never fail the run it caches.
pub struct CacheStore {
    conn: Connection,
}

impl CacheStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_db()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS skills_cache (
                username TEXT NOT NULL,
                include_private INTEGER NOT NULL,
                payload TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                PRIMARY KEY (username, include_private)
            );
            "#,
        )?;

        Ok(())
    }

    pub fn get(&self, username: &str, include_private: bool) -> Option<CacheEntry> {
        match self.try_get(username, include_private) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Failed to load cached data: {}", err);
                None
            }
        }
    }

    pub fn set(&self, username: &str, include_private: bool, payload: &CachePayload) {
        if let Err(err) = self.try_set(username, include_private, payload) {
            tracing::warn!("Failed to cache data: {}", err);
        }
    }

    fn try_get(&self, username: &str, include_private: bool) -> Result<Option<CacheEntry>> {
        let result = self.conn.query_row(
            r#"
            SELECT payload, timestamp FROM skills_cache
            WHERE username = ?1 AND include_private = ?2
            "#,
            params![username, include_private],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                ))
            },
        );

        match result {
            Ok((payload_json, timestamp)) => {
                let payload: CachePayload = serde_json::from_str(&payload_json)?;
                Ok(Some(CacheEntry { payload, timestamp }))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn try_set(
        &self,
        username: &str,
        include_private: bool,
        payload: &CachePayload,
    ) -> Result<()> {
        let payload_json = serde_json::to_string(payload)?;
        self.conn.execute(
            r#"
            INSERT INTO skills_cache (username, include_private, payload, timestamp)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(username, include_private) DO UPDATE SET
                payload = excluded.payload,
                timestamp = excluded.timestamp
            "#,
            params![
                username,
                include_private,
                payload_json,
                Utc::now().timestamp_millis(),
            ],
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn sample_payload() -> CachePayload {
        CachePayload {
            languages: vec![ClassifiedLanguage {
                name: "Rust".to_string(),
                bytes: Some(4096),
                percentage: 80,
                category: Category::Backend,
                display_name: "Rust".to_string(),
                color: "#000000".to_string(),
            }],
            stats: None,
        }
    }

    #[test]
    fn round_trip_within_expiry() {
        let store = CacheStore::in_memory().unwrap();
        let payload = sample_payload();

        store.set("octocat", false, &payload);
        let entry = store.get("octocat", false).expect("entry should exist");

        assert_eq!(entry.payload.languages, payload.languages);
        assert!(entry.is_fresh(60_000, Utc::now().timestamp_millis()));
    }

    #[test]
    fn keys_are_scoped_by_privacy_flag() {
        let store = CacheStore::in_memory().unwrap();

        store.set("octocat", true, &sample_payload());

        assert!(store.get("octocat", false).is_none());
        assert!(store.get("octocat", true).is_some());
    }

    #[test]
    fn overwrite_replaces_whole_entry() {
        let store = CacheStore::in_memory().unwrap();
        store.set("octocat", false, &sample_payload());

        let mut updated = sample_payload();
        updated.languages[0].percentage = 55;
        store.set("octocat", false, &updated);

        let entry = store.get("octocat", false).unwrap();
        assert_eq!(entry.payload.languages[0].percentage, 55);
    }

    #[test]
    fn expired_entry_reported_stale() {
        let entry = CacheEntry {
            payload: sample_payload(),
            timestamp: 1_000,
        };

        // now - timestamp == expiry counts as expired
        assert!(!entry.is_fresh(500, 1_500));
        assert!(entry.is_fresh(501, 1_500));
    }

    #[test]
    fn corrupt_payload_treated_as_absent() {
        let store = CacheStore::in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO skills_cache (username, include_private, payload, timestamp)
                 VALUES ('octocat', 0, 'not json', 0)",
                [],
            )
            .unwrap();

        assert!(store.get("octocat", false).is_none());
    }
}
