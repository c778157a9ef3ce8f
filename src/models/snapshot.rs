//! Snapshot outcome shapes
//!
//! Only the result shape of the snapshot engine is consumed here.

use serde::{Deserialize, Serialize};

/// Outcome of snapshot comparison for one test file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotResult {
    pub filepath: String,
    pub added: u64,
    pub matched: u64,
    pub unmatched: u64,
    pub updated: u64,
    pub unchecked: u64,
    pub file_deleted: bool,
}

/// Run-wide snapshot counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub added: u64,
    pub updated: u64,
    pub unmatched: u64,
    pub unchecked: u64,
}

impl SnapshotSummary {
    /// True when every reportable field is zero
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.unmatched == 0 && self.unchecked == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_decode_defaults() {
        let r: SnapshotResult =
            serde_json::from_str(r#"{"filepath":"/a.spec.js","added":2}"#).unwrap();
        assert_eq!(r.added, 2);
        assert_eq!(r.unmatched, 0);
        assert!(!r.file_deleted);
    }

    #[test]
    fn test_summary_empty() {
        assert!(SnapshotSummary::default().is_empty());
        let s = SnapshotSummary {
            unchecked: 1,
            ..Default::default()
        };
        assert!(!s.is_empty());
    }
}
