//! Event ("jam") model for storage and API.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A community event stored in Firestore.
///
/// Timestamps are RFC3339 strings with a `Z` suffix so that Firestore's
/// lexicographic ordering matches chronological ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Generated UUID (also used as document ID)
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Vibe emoji tag from the fixed palette
    pub vibe: Option<String>,
    pub location_name: Option<String>,
    /// External map link
    pub location_url: Option<String>,
    /// Start time (RFC3339)
    pub start_time: String,
    /// End time (RFC3339). Never before the start: see [`normalize_end_time`].
    pub end_time: String,
    /// Featured/flagship event
    #[serde(default)]
    pub is_core: bool,
    /// Creator's subject id, immutable after creation
    pub creator: String,
    /// Attendee subject ids. Order-preserving list used as a set.
    #[serde(default)]
    pub attendees: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Event {
    /// Whether the given subject is on the attendee list.
    pub fn is_attending(&self, subject: &str) -> bool {
        self.attendees.iter().any(|s| s == subject)
    }
}

/// Apply the overnight policy: an end time before the start time is
/// treated as spanning into the next day. An end time equal to the start
/// is left alone.
pub fn normalize_end_time(start: DateTime<Utc>, end: DateTime<Utc>) -> DateTime<Utc> {
    if end < start {
        end + Duration::days(1)
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, h, m, 0).unwrap()
    }

    #[test]
    fn test_end_after_start_unchanged() {
        assert_eq!(normalize_end_time(at(18, 0), at(21, 0)), at(21, 0));
    }

    #[test]
    fn test_end_before_start_spans_next_day() {
        let end = normalize_end_time(at(22, 0), at(2, 0));
        assert_eq!(end, at(2, 0) + Duration::days(1));
    }

    #[test]
    fn test_zero_length_event_unchanged() {
        assert_eq!(normalize_end_time(at(22, 0), at(22, 0)), at(22, 0));
    }
}
