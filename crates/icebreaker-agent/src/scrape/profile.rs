//! Profile-record scraper and its field policy.

use std::sync::Arc;

use icebreaker_core::evidence::PROFILE_IMAGE_FIELD;
use icebreaker_core::ProfileRecord;
use serde_json::{Map, Value};

use crate::capability::ProfileFetch;
use crate::error::{EnrichError, Stage};
use crate::guard::CallGuard;

/// Declarative shaping rules for a provider's profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    /// Top-level fields dropped regardless of value.
    pub deny: &'static [&'static str],
    /// `(list field, nested field)` pairs: the nested field is removed from
    /// every object inside the list.
    pub strip_nested: &'static [(&'static str, &'static str)],
}

/// Policy for Proxycurl `LinkedIn` documents.
pub const LINKEDIN_POLICY: FieldPolicy = FieldPolicy {
    deny: &["people_also_viewed", "certifications"],
    strip_nested: &[("groups", PROFILE_IMAGE_FIELD)],
};

impl FieldPolicy {
    /// `null`, `""` and `[]` carry no evidence and are always dropped.
    #[must_use]
    pub fn is_empty_value(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Bool(_) | Value::Number(_) | Value::Object(_) => false,
        }
    }

    #[must_use]
    pub fn apply(&self, fields: Map<String, Value>) -> ProfileRecord {
        let mut kept: Map<String, Value> = fields
            .into_iter()
            .filter(|(key, value)| {
                !Self::is_empty_value(value) && !self.deny.contains(&key.as_str())
            })
            .collect();

        for (list_field, nested_field) in self.strip_nested {
            if let Some(Value::Array(entries)) = kept.get_mut(*list_field) {
                for entry in entries.iter_mut() {
                    if let Value::Object(obj) = entry {
                        obj.remove(*nested_field);
                    }
                }
            }
        }

        ProfileRecord::new(kept)
    }
}

/// Fetches a profile document and shapes it with a [`FieldPolicy`].
#[derive(Clone)]
pub struct ProfileScraper {
    source: Arc<dyn ProfileFetch>,
    policy: FieldPolicy,
}

impl ProfileScraper {
    #[must_use]
    pub fn new(source: Arc<dyn ProfileFetch>) -> Self {
        Self::with_policy(source, LINKEDIN_POLICY)
    }

    #[must_use]
    pub fn with_policy(source: Arc<dyn ProfileFetch>, policy: FieldPolicy) -> Self {
        Self { source, policy }
    }

    /// # Errors
    ///
    /// - [`EnrichError::Fetch`] if the provider call fails or the document is
    ///   not a JSON object.
    /// - [`EnrichError::Timeout`] / [`EnrichError::Cancelled`] from `guard`.
    pub async fn fetch(&self, url: &str, guard: &CallGuard) -> Result<ProfileRecord, EnrichError> {
        let stage = Stage::ProfileFetch;
        let doc = guard
            .run(stage, async {
                self.source
                    .fetch_profile(url)
                    .await
                    .map_err(|e| EnrichError::fetch(stage, &e))
            })
            .await?;

        let Value::Object(fields) = doc else {
            return Err(EnrichError::Fetch {
                stage,
                message: format!("expected a JSON object, got {}", json_kind(&doc)),
            });
        };

        let scanned = fields.len();
        let record = self.policy.apply(fields);
        tracing::debug!(url, scanned, kept = record.len(), "profile record shaped");
        Ok(record)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
