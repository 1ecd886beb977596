use std::fmt;
use std::time::Duration;

use icebreaker_providers::ProviderError;
use thiserror::Error;

/// External call boundary inside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Reasoning,
    Search,
    ProfileFetch,
    HandleLookup,
    ActivityFetch,
    Synthesis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Reasoning => "reasoning",
            Stage::Search => "search",
            Stage::ProfileFetch => "profile fetch",
            Stage::HandleLookup => "handle lookup",
            Stage::ActivityFetch => "activity fetch",
            Stage::Synthesis => "synthesis",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by [`crate::Enricher::enrich`] and its stages.
///
/// Nothing is swallowed: every variant reaches the caller.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A search or generation provider reported an error.
    #[error("upstream error during {stage}: {message}")]
    Upstream { stage: Stage, message: String },

    /// A scrape call failed or returned malformed data.
    #[error("fetch failed during {stage}: {message}")]
    Fetch { stage: Stage, message: String },

    #[error("no handle found for \"{name}\"")]
    Resolution { name: String },

    #[error("entity resolution gave no final answer within {cycles} cycles")]
    LoopExceeded { cycles: u32 },

    #[error("generation output does not match the PersonIntel schema: {reason}")]
    SchemaParse { reason: String, raw: String },

    #[error("{stage} timed out after {}s", .after.as_secs())]
    Timeout { stage: Stage, after: Duration },

    #[error("cancelled during {stage}")]
    Cancelled { stage: Stage },
}

impl EnrichError {
    pub(crate) fn upstream(stage: Stage, err: &ProviderError) -> Self {
        Self::Upstream {
            stage,
            message: err.to_string(),
        }
    }

    pub(crate) fn fetch(stage: Stage, err: &ProviderError) -> Self {
        Self::Fetch {
            stage,
            message: err.to_string(),
        }
    }

    /// `true` when retrying the same call with different input may succeed.
    #[must_use]
    pub fn is_retryable_with_new_input(&self) -> bool {
        matches!(
            self,
            Self::LoopExceeded { .. } | Self::Resolution { .. } | Self::InvalidInput(_)
        )
    }
}
