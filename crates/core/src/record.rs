//! Snapshot record types.
//!
//! Field names and the two status literals are the on-disk contract shared
//! with whatever renders the report, so they are pinned with serde attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Available,
    #[serde(rename = "Not Available")]
    NotAvailable,
}

impl Status {
    pub fn from_found(found: bool) -> Self {
        if found { Status::Available } else { Status::NotAvailable }
    }

    pub fn is_available(self) -> bool {
        self == Status::Available
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::NotAvailable => "Not Available",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cached availability entry.
///
/// `date` and `number` are accepted on load for snapshots written before the
/// field names were settled; saving always writes the canonical names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(alias = "date")]
    pub identifier: String,
    pub url: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "number")]
    pub sequence_number: Option<u64>,
}

impl Record {
    pub fn new(identifier: impl Into<String>, url: impl Into<String>, status: Status) -> Self {
        Self { identifier: identifier.into(), url: url.into(), status, sequence_number: None }
    }

    pub fn with_sequence(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_literals() {
        assert_eq!(serde_json::to_string(&Status::Available).unwrap(), "\"Available\"");
        assert_eq!(serde_json::to_string(&Status::NotAvailable).unwrap(), "\"Not Available\"");
        assert_eq!(Status::NotAvailable.to_string(), "Not Available");
    }

    #[test]
    fn test_status_from_found() {
        assert_eq!(Status::from_found(true), Status::Available);
        assert_eq!(Status::from_found(false), Status::NotAvailable);
        assert!(!Status::NotAvailable.is_available());
    }

    #[test]
    fn test_record_field_names() {
        let record = Record::new("Episode 7", "https://cdn.example.com/ep7.mp3", Status::Available).with_sequence(7);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["identifier"], "Episode 7");
        assert_eq!(value["url"], "https://cdn.example.com/ep7.mp3");
        assert_eq!(value["status"], "Available");
        assert_eq!(value["sequenceNumber"], 7);
    }

    #[test]
    fn test_record_omits_missing_sequence() {
        let record = Record::new("2024-03-01", "https://cdn.example.com/a.mp3", Status::NotAvailable);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("sequenceNumber"));
    }

    #[test]
    fn test_record_accepts_legacy_names() {
        let json = r#"{"date":"Podcast 12","url":"https://cdn.example.com/12.mp3","status":"Available","number":12}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.identifier, "Podcast 12");
        assert_eq!(record.sequence_number, Some(12));
    }

    #[test]
    fn test_record_rejects_unknown_status() {
        let json = r#"{"identifier":"2024-03-01","url":"u","status":"Maybe"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }
}
