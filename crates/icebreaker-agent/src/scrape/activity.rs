//! Activity-feed scraper: handle lookup, timeline fetch and item walk.

use std::sync::Arc;

use icebreaker_core::ActivityFeed;
use serde_json::Value;

use crate::capability::{ActivityFetch, HandleLookup};
use crate::error::{EnrichError, Stage};
use crate::guard::CallGuard;

/// Maximum timeline indices inspected, whether or not items are retained.
pub const SCAN_LIMIT: usize = 10;

const REPOST_MARKER: &str = "RT @";
const MENTION_MARKER: char = '@';

const ENTRIES_PATH: &str = "/data/user/result/timeline_v2/timeline/instructions/1/entries";
const ITEM_TEXT_PATH: &str = "/content/itemContent/tweet_results/result/legacy/full_text";

/// Reposts and reply-only items say little about the author.
#[must_use]
pub fn is_excluded(text: &str) -> bool {
    text.contains(REPOST_MARKER) || text.starts_with(MENTION_MARKER)
}

fn item_text(doc: &Value, index: usize) -> Option<&str> {
    doc.pointer(ENTRIES_PATH)?
        .get(index)?
        .pointer(ITEM_TEXT_PATH)?
        .as_str()
}

/// Walks the first [`SCAN_LIMIT`] timeline entries, skipping items matched by
/// [`is_excluded`]. The first missing or malformed entry ends the walk.
#[must_use]
pub fn collect_feed(doc: &Value) -> ActivityFeed {
    let mut feed = ActivityFeed::new();
    for index in 0..SCAN_LIMIT {
        let Some(text) = item_text(doc, index) else {
            tracing::debug!(index, retained = feed.len(), "activity walk exhausted");
            break;
        };
        if is_excluded(text) {
            continue;
        }
        feed.push(text);
    }
    feed
}

#[derive(Clone)]
pub struct ActivityScraper {
    handles: Arc<dyn HandleLookup>,
    activity: Arc<dyn ActivityFetch>,
    fetch_count: u32,
}

impl ActivityScraper {
    #[must_use]
    pub fn new(
        handles: Arc<dyn HandleLookup>,
        activity: Arc<dyn ActivityFetch>,
        fetch_count: u32,
    ) -> Self {
        Self {
            handles,
            activity,
            fetch_count,
        }
    }

    /// Resolves `name` to an identifier, then fetches and walks its timeline.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::Resolution`] when the lookup returns no identifier.
    /// - [`EnrichError::Fetch`] when either provider call fails.
    /// - [`EnrichError::Timeout`] / [`EnrichError::Cancelled`] from `guard`.
    pub async fn fetch(&self, name: &str, guard: &CallGuard) -> Result<ActivityFeed, EnrichError> {
        let identifier = guard
            .run(Stage::HandleLookup, async {
                self.handles
                    .lookup_handle(name)
                    .await
                    .map_err(|e| EnrichError::fetch(Stage::HandleLookup, &e))
            })
            .await?
            .ok_or_else(|| EnrichError::Resolution {
                name: name.to_string(),
            })?;

        let doc = guard
            .run(Stage::ActivityFetch, async {
                self.activity
                    .fetch_activity(&identifier, self.fetch_count)
                    .await
                    .map_err(|e| EnrichError::fetch(Stage::ActivityFetch, &e))
            })
            .await?;

        let feed = collect_feed(&doc);
        tracing::debug!(name, %identifier, retained = feed.len(), "activity feed collected");
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entry(text: &str) -> Value {
        json!({
            "content": { "itemContent": { "tweet_results": { "result": { "legacy": { "full_text": text } } } } }
        })
    }

    fn timeline(entries: Vec<Value>) -> Value {
        json!({
            "data": { "user": { "result": { "timeline_v2": { "timeline": {
                "instructions": [ { "type": "TimelineClearCache" }, { "entries": entries } ]
            } } } } }
        })
    }

    #[test]
    fn keeps_plain_items_in_order() {
        let doc = timeline(vec![entry("first"), entry("second")]);
        let feed = collect_feed(&doc);
        let items: Vec<&str> = feed.items().collect();
        assert_eq!(items, ["first", "second"]);
    }

    #[test]
    fn excludes_reposts_and_mentions() {
        let doc = timeline(vec![
            entry("RT @babbage: engines!"),
            entry("@babbage agreed"),
            entry("Notes on the engine"),
            entry("quoting RT @someone inline"),
        ]);
        let feed = collect_feed(&doc);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.get("item1"), Some("Notes on the engine"));
    }

    #[test]
    fn malformed_entry_ends_walk_without_error() {
        let doc = timeline(vec![
            entry("one"),
            entry("two"),
            json!({ "content": { "cursorType": "Bottom" } }),
            entry("four"),
        ]);
        let feed = collect_feed(&doc);
        let entries: Vec<(String, &str)> = feed.entries().collect();
        assert_eq!(
            entries,
            [("item1".to_string(), "one"), ("item2".to_string(), "two")]
        );
    }

    #[test]
    fn scan_is_capped_at_ten_indices_even_with_exclusions() {
        let mut entries: Vec<Value> = (0..5).map(|i| entry(&format!("@reply {i}"))).collect();
        entries.extend((0..10).map(|i| entry(&format!("post {i}"))));
        let feed = collect_feed(&timeline(entries));
        assert_eq!(feed.len(), 5, "only indices 5..10 survive the filter");
        assert_eq!(feed.get("item1"), Some("post 0"));
        assert_eq!(feed.get("item5"), Some("post 4"));
    }

    #[test]
    fn keys_are_dense_after_filtering() {
        let doc = timeline(vec![entry("a"), entry("@skip"), entry("b")]);
        let feed = collect_feed(&doc);
        assert_eq!(feed.get("item1"), Some("a"));
        assert_eq!(feed.get("item2"), Some("b"));
        assert_eq!(feed.get("item3"), None);
    }

    #[test]
    fn missing_instructions_yield_empty_feed() {
        assert!(collect_feed(&json!({ "data": {} })).is_empty());
        assert!(collect_feed(&json!([])).is_empty());
    }

    #[test]
    fn non_string_text_ends_walk() {
        let doc = timeline(vec![entry("ok"), json!({
            "content": { "itemContent": { "tweet_results": { "result": { "legacy": { "full_text": 5 } } } } }
        })]);
        assert_eq!(collect_feed(&doc).len(), 1);
    }
}
