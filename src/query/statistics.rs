//! Statistics about an executed query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Statistics describing a completed server-side query.
///
/// A passive record: the query execution and response layer fills it
/// in from a finished result; the match pipeline itself only informs
/// the final count estimate. Such as how many records matched, how
/// long the server spent, and which index answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStatistics {
    /// Whether the query returned potentially stale results.
    pub is_stale: bool,
    /// The duration of the query server side, in milliseconds.
    pub duration_ms: u64,
    /// Total count of the results that matched the query.
    pub total_results: u64,
    /// Number of results skipped by the server. When non-zero, the
    /// total count is invalidated.
    pub skipped_results: u64,
    /// Number of results scanned by the query. Only present when the
    /// query used a filter clause.
    pub scanned_results: Option<u64>,
    /// The time when the query results were unstale.
    pub timestamp: Option<DateTime<Utc>>,
    /// The name of the index queried.
    pub index_name: String,
    /// The timestamp of the queried index.
    pub index_timestamp: Option<DateTime<Utc>>,
    /// The timestamp of the last time the index was queried.
    pub last_query_time: Option<DateTime<Utc>>,
    /// Entity tag of the result set.
    pub result_etag: Option<i64>,
    /// Tag of the cluster node which responded to the query.
    pub node_tag: Option<String>,
}

/// The server-side summary of a finished query, as handed to the
/// response layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResultSummary {
    /// Whether the result set is potentially stale.
    pub is_stale: bool,
    /// Server-side duration, in milliseconds.
    pub duration_ms: u64,
    /// Total matching documents.
    pub total_results: u64,
    /// Results skipped by the server.
    pub skipped_results: u64,
    /// Results scanned by a filter clause, if one ran.
    pub scanned_results: Option<u64>,
    /// When the results were unstale.
    pub timestamp: Option<DateTime<Utc>>,
    /// Name of the answering index.
    pub index_name: String,
    /// Timestamp of the answering index.
    pub index_timestamp: Option<DateTime<Utc>>,
    /// When the index was last queried.
    pub last_query_time: Option<DateTime<Utc>>,
    /// Entity tag of the result set.
    pub result_etag: Option<i64>,
    /// Tag of the answering cluster node.
    pub node_tag: Option<String>,
}

impl QueryStatistics {
    /// Create an empty statistics record.
    pub fn new() -> Self {
        QueryStatistics::default()
    }

    /// Update the query stats from a finished query result.
    pub fn update_from(&mut self, result: &QueryResultSummary) {
        self.is_stale = result.is_stale;
        self.duration_ms = result.duration_ms;
        self.total_results = result.total_results;
        self.skipped_results = result.skipped_results;
        self.scanned_results = result.scanned_results;
        self.timestamp = result.timestamp;
        self.index_name = result.index_name.clone();
        self.index_timestamp = result.index_timestamp;
        self.last_query_time = result.last_query_time;
        self.result_etag = result.result_etag;
        self.node_tag = result.node_tag.clone();
    }

    /// Serialize the record to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn summary() -> QueryResultSummary {
        QueryResultSummary {
            is_stale: true,
            duration_ms: 12,
            total_results: 42,
            skipped_results: 3,
            scanned_results: Some(100),
            timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            index_name: "articles/title".to_string(),
            index_timestamp: Some(Utc.with_ymd_and_hms(2024, 4, 30, 8, 0, 0).unwrap()),
            last_query_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 11, 59, 0).unwrap()),
            result_etag: Some(7),
            node_tag: Some("A".to_string()),
        }
    }

    #[test]
    fn test_update_from_result() {
        let mut stats = QueryStatistics::new();
        stats.update_from(&summary());

        assert!(stats.is_stale);
        assert_eq!(stats.duration_ms, 12);
        assert_eq!(stats.total_results, 42);
        assert_eq!(stats.skipped_results, 3);
        assert_eq!(stats.scanned_results, Some(100));
        assert_eq!(stats.index_name, "articles/title");
        assert_eq!(stats.result_etag, Some(7));
        assert_eq!(stats.node_tag.as_deref(), Some("A"));
    }

    #[test]
    fn test_default_is_empty() {
        let stats = QueryStatistics::new();
        assert!(!stats.is_stale);
        assert_eq!(stats.total_results, 0);
        assert!(stats.scanned_results.is_none());
        assert!(stats.timestamp.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let mut stats = QueryStatistics::new();
        stats.update_from(&summary());

        let json = stats.to_json().unwrap();
        let back: QueryStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
