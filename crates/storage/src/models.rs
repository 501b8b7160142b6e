use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Top-level key that marks a JSON file as a request set.
pub const REQUEST_SET_MARKER: &str = "fga_request_set";

/// Desired target groups per photo id.
pub type RequestSet = BTreeMap<String, Vec<GroupDescriptor>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSetFile {
    #[serde(rename = "fga_request_set")]
    pub request_set: RequestSet,
}

impl RequestSetFile {
    pub fn single(photo_id: &str, groups: Vec<GroupDescriptor>) -> Self {
        let mut request_set = RequestSet::new();
        request_set.insert(photo_id.to_string(), groups);
        Self { request_set }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("group descriptor {0:?} does not start with a group id")]
pub struct DescriptorError(pub String);

/// A target group as written in a request set: `"<group-id> - <label>"`.
///
/// Only the first whitespace-delimited token is significant; the rest is a
/// human-readable label kept for whoever edits the file by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupDescriptor {
    pub group_id: String,
    pub label: String,
}

impl GroupDescriptor {
    pub fn new(group_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            label: label.into(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DescriptorError> {
        let trimmed = raw.trim();
        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let group_id = match parts.next() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(DescriptorError(raw.to_string())),
        };
        let rest = parts.next().unwrap_or("").trim();
        let label = rest.strip_prefix('-').unwrap_or(rest).trim().to_string();
        Ok(Self { group_id, label })
    }
}

impl fmt::Display for GroupDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.group_id)
        } else {
            write!(f, "{} - {}", self.group_id, self.label)
        }
    }
}

impl TryFrom<String> for GroupDescriptor {
    type Error = DescriptorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<GroupDescriptor> for String {
    fn from(value: GroupDescriptor) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    SuccessAdded,
    SuccessQueued,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddAttempt {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub status: AttemptStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    pub photo_added: bool,
    #[serde(rename = "fga_add_attempts", default)]
    pub attempts: Vec<AddAttempt>,
}

/// Attempt history for every (photo, group) pair of one request set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptState {
    entries: BTreeMap<String, StateEntry>,
}

impl AttemptState {
    pub fn key(photo_id: &str, group_id: &str) -> String {
        format!("photo_{photo_id}_group_{group_id}")
    }

    pub fn get(&self, photo_id: &str, group_id: &str) -> Option<&StateEntry> {
        self.entries.get(&Self::key(photo_id, group_id))
    }

    /// Returns the entry for the pair, creating an empty one on first use.
    pub fn entry_mut(&mut self, photo_id: &str, group_id: &str) -> &mut StateEntry {
        self.entries
            .entry(Self::key(photo_id, group_id))
            .or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &StateEntry)> {
        self.entries.iter()
    }
}

/// Second-precision UTC timestamps, written as `2024-05-01T12:34:56+00:00`.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// Accepts RFC 3339 with any offset, or a bare date-time taken as UTC.
    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => Ok(dt.with_timezone(&Utc)),
            Err(err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| Utc.from_utc_datetime(&naive))
                .map_err(|_| err),
        }
    }

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn descriptor_takes_first_token_as_group_id() {
        let d = GroupDescriptor::parse("34427469792@N01 - Flickr Central").unwrap();
        assert_eq!(d.group_id, "34427469792@N01");
        assert_eq!(d.label, "Flickr Central");
        assert_eq!(d.to_string(), "34427469792@N01 - Flickr Central");

        let bare = GroupDescriptor::parse("  group1\t").unwrap();
        assert_eq!(bare.group_id, "group1");
        assert_eq!(bare.label, "");

        assert!(GroupDescriptor::parse("   ").is_err());
    }

    #[test]
    fn timestamps_keep_offset_form_and_accept_variants() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap();
        assert_eq!(timestamp::format(&ts), "2024-05-01T12:34:56+00:00");
        assert_eq!(timestamp::parse("2024-05-01T12:34:56+00:00").unwrap(), ts);
        assert_eq!(timestamp::parse("2024-05-01T12:34:56Z").unwrap(), ts);
        assert_eq!(timestamp::parse("2024-05-01T12:34:56").unwrap(), ts);
        assert_eq!(timestamp::parse("2024-05-01T14:34:56+02:00").unwrap(), ts);
        assert!(timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn state_entries_are_created_lazily() {
        let mut state = AttemptState::default();
        assert!(state.get("123", "g1").is_none());
        state.entry_mut("123", "g1").photo_added = true;
        assert_eq!(state.len(), 1);
        assert!(state.get("123", "g1").unwrap().photo_added);
        assert_eq!(AttemptState::key("123", "g1"), "photo_123_group_g1");
    }
}
