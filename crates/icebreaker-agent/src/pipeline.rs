//! Enrichment pipeline orchestration.

use std::sync::Arc;
use std::time::Duration;

use icebreaker_core::{AppConfig, Enrichment, EvidenceBundle};
use tokio_util::sync::CancellationToken;

use crate::capability::{ActivityFetch, Generate, HandleLookup, ProfileFetch, SearchCapability};
use crate::error::EnrichError;
use crate::guard::CallGuard;
use crate::resolver::{canonical_url, EntityResolver};
use crate::scrape::{ActivityScraper, ProfileScraper};
use crate::synthesizer::StructuredSynthesizer;

/// Per-run bounds and switches, usually taken from [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichSettings {
    pub max_cycles: u32,
    pub call_timeout: Duration,
    pub activity_fetch_count: u32,
    pub schema_retry: bool,
}

impl EnrichSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_cycles: config.resolver_max_cycles,
            call_timeout: Duration::from_secs(config.call_timeout_secs),
            activity_fetch_count: config.activity_fetch_count,
            schema_retry: config.schema_retry,
        }
    }
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            max_cycles: 5,
            call_timeout: Duration::from_secs(60),
            activity_fetch_count: 5,
            schema_retry: true,
        }
    }
}

/// The external capabilities one pipeline needs.
#[derive(Clone)]
pub struct Capabilities {
    pub search: Arc<dyn SearchCapability>,
    pub llm: Arc<dyn Generate>,
    pub profiles: Arc<dyn ProfileFetch>,
    pub handles: Arc<dyn HandleLookup>,
    pub activity: Arc<dyn ActivityFetch>,
}

/// Name in, [`Enrichment`] out.
#[derive(Clone)]
pub struct Enricher {
    resolver: EntityResolver,
    profiles: ProfileScraper,
    activity: ActivityScraper,
    synthesizer: StructuredSynthesizer,
    call_timeout: Duration,
}

impl Enricher {
    #[must_use]
    pub fn new(capabilities: Capabilities, settings: EnrichSettings) -> Self {
        let Capabilities {
            search,
            llm,
            profiles,
            handles,
            activity,
        } = capabilities;
        Self {
            resolver: EntityResolver::new(search, Arc::clone(&llm), settings.max_cycles),
            profiles: ProfileScraper::new(profiles),
            activity: ActivityScraper::new(handles, activity, settings.activity_fetch_count),
            synthesizer: StructuredSynthesizer::new(llm, settings.schema_retry),
            call_timeout: settings.call_timeout,
        }
    }

    fn guard(&self, cancel: CancellationToken) -> CallGuard {
        CallGuard::new(self.call_timeout, cancel)
    }

    fn validate(name: &str) -> Result<&str, EnrichError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EnrichError::InvalidInput("name must not be blank".to_string()));
        }
        Ok(name)
    }

    /// Runs the full pipeline with a token nobody else holds.
    ///
    /// # Errors
    ///
    /// See [`Enricher::enrich_with_cancel`].
    pub async fn enrich(&self, name: &str) -> Result<Enrichment, EnrichError> {
        self.enrich_with_cancel(name, CancellationToken::new()).await
    }

    /// Run the full pipeline for one person.
    ///
    /// 1. Resolve the name to a profile URL.
    /// 2. Scrape the profile record and the activity feed concurrently.
    /// 3. Pair both in an [`EvidenceBundle`].
    /// 4. Synthesize [`icebreaker_core::PersonIntel`] and attach the profile image.
    ///
    /// # Errors
    ///
    /// Returns the first [`EnrichError`] raised by any stage. Nothing is
    /// logged and skipped.
    pub async fn enrich_with_cancel(
        &self,
        name: &str,
        cancel: CancellationToken,
    ) -> Result<Enrichment, EnrichError> {
        let name = Self::validate(name)?;
        let guard = self.guard(cancel);

        let answer = self.resolver.resolve(name, &guard).await?;
        let profile_url = canonical_url(&answer).unwrap_or(&answer);
        tracing::info!(name, profile_url, "profile url resolved");

        let (profile, activity) = tokio::try_join!(
            self.profiles.fetch(profile_url, &guard),
            self.activity.fetch(name, &guard),
        )?;

        let bundle = EvidenceBundle::new(profile, activity);
        let intel = self.synthesizer.synthesize(&bundle, &guard).await?;
        tracing::info!(name, facts = intel.facts.len(), "enrichment complete");

        Ok(Enrichment {
            intel,
            image_url: bundle.image_url().map(str::to_string),
        })
    }

    /// Runs only entity resolution and returns the final answer.
    ///
    /// # Errors
    ///
    /// Same as the resolution step of [`Enricher::enrich_with_cancel`].
    pub async fn resolve(&self, name: &str, cancel: CancellationToken) -> Result<String, EnrichError> {
        let name = Self::validate(name)?;
        self.resolver.resolve(name, &self.guard(cancel)).await
    }
}
