//! Normalized evidence gathered about a person before synthesis.
//!
//! [`ProfileRecord`] and [`ActivityFeed`] are produced independently by the
//! two scrapers and paired, without merging, in an [`EvidenceBundle`].

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Field carrying the profile image reference in a profile record.
pub const PROFILE_IMAGE_FIELD: &str = "profile_pic_url";

/// Filtered profile fields keyed by provider field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProfileRecord(Map<String, Value>);

impl ProfileRecord {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The profile image URL, when the provider returned one as a string.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.0.get(PROFILE_IMAGE_FIELD).and_then(Value::as_str)
    }
}

/// Recent activity items in scan order.
///
/// Serializes as an ordered map `{"item1": ..., "item2": ...}` with dense keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFeed {
    items: Vec<String>,
}

impl ActivityFeed {
    /// Maximum number of items a feed can hold.
    pub const MAX_ITEMS: usize = 10;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item. Returns `false` (and drops the item) once the feed is full.
    pub fn push(&mut self, item: impl Into<String>) -> bool {
        if self.items.len() >= Self::MAX_ITEMS {
            return false;
        }
        self.items.push(item.into());
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by its synthetic key (`item1`, `item2`, ...).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let index: usize = key.strip_prefix("item")?.parse().ok()?;
        index
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }

    /// Iterates `(key, text)` pairs in scan order.
    pub fn entries(&self) -> impl Iterator<Item = (String, &str)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("item{}", i + 1), text.as_str()))
    }

    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl Serialize for ActivityFeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (key, text) in self.entries() {
            map.serialize_entry(&key, text)?;
        }
        map.end()
    }
}

/// The two evidence sources, kept distinct and labeled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvidenceBundle {
    pub profile: ProfileRecord,
    pub activity: ActivityFeed,
}

impl EvidenceBundle {
    #[must_use]
    pub fn new(profile: ProfileRecord, activity: ActivityFeed) -> Self {
        Self { profile, activity }
    }

    /// Image reference carried by the profile record, independent of synthesis.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.profile.image_url()
    }
}

/// Renders the bundle as the labeled text block embedded in generation prompts.
impl fmt::Display for EvidenceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = serde_json::to_string_pretty(&self.profile).map_err(|_| fmt::Error)?;
        let activity = serde_json::to_string_pretty(&self.activity).map_err(|_| fmt::Error)?;
        write!(
            f,
            "LinkedIn profile record:\n{profile}\n\nTwitter activity feed:\n{activity}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ProfileRecord {
        match value {
            Value::Object(map) => ProfileRecord::new(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn activity_feed_keys_are_dense_and_ordered() {
        let mut feed = ActivityFeed::new();
        for i in 0..10 {
            feed.push(format!("post {i}"));
        }
        let json = serde_json::to_string(&feed).unwrap();
        let item2 = json.find("\"item2\"").unwrap();
        let item10 = json.find("\"item10\"").unwrap();
        assert!(item2 < item10, "keys must follow scan order: {json}");
        assert_eq!(feed.get("item1"), Some("post 0"));
        assert_eq!(feed.get("item10"), Some("post 9"));
        assert_eq!(feed.get("item0"), None);
        assert_eq!(feed.get("item11"), None);
    }

    #[test]
    fn activity_feed_refuses_items_past_capacity() {
        let mut feed = ActivityFeed::new();
        for i in 0..ActivityFeed::MAX_ITEMS {
            assert!(feed.push(format!("post {i}")));
        }
        assert!(!feed.push("one too many"));
        assert_eq!(feed.len(), ActivityFeed::MAX_ITEMS);
    }

    #[test]
    fn image_url_reads_profile_pic_field() {
        let profile = record(json!({
            "full_name": "Ada Lovelace",
            "profile_pic_url": "https://img.example/ada.png"
        }));
        assert_eq!(profile.image_url(), Some("https://img.example/ada.png"));

        let without = record(json!({ "full_name": "Ada Lovelace" }));
        assert_eq!(without.image_url(), None);
    }

    #[test]
    fn bundle_renders_both_sources_labeled() {
        let mut activity = ActivityFeed::new();
        activity.push("Analytical engines are neat");
        let bundle = EvidenceBundle::new(record(json!({ "full_name": "Ada Lovelace" })), activity);

        let text = bundle.to_string();
        assert!(text.starts_with("LinkedIn profile record:\n"));
        assert!(text.contains("\"full_name\": \"Ada Lovelace\""));
        assert!(text.contains("Twitter activity feed:\n"));
        assert!(text.contains("\"item1\": \"Analytical engines are neat\""));
    }
}
