//! Timing record and its wire encoding.

use serde::Serialize;

/// One reportable request. Built once, consumed once by the reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingRecord {
    pub ip_addr: String,
    pub request_method: String,
    pub request_url: String,
    pub normalized_uri: String,
    pub status_code: u16,
    pub time_in_millis: u64,
}

impl TimingRecord {
    /// Ingest body: a JSON array holding exactly this record.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&[self])
    }
}
