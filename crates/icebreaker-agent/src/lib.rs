//! Person-intelligence enrichment for Icebreaker.
//!
//! Resolves a name to a profile URL with a bounded reasoning loop, scrapes the
//! profile record and activity feed concurrently, and synthesizes a typed
//! [`icebreaker_core::PersonIntel`] from the combined evidence.

pub mod capability;
pub mod error;
pub mod extract;
pub mod guard;
pub mod pipeline;
pub mod resolver;
pub mod scrape;
pub mod synthesizer;

pub use capability::{ActivityFetch, Generate, HandleLookup, ProfileFetch, SearchCapability};
pub use error::{EnrichError, Stage};
pub use extract::{extract, NO_RESULT};
pub use guard::CallGuard;
pub use pipeline::{Capabilities, EnrichSettings, Enricher};
pub use resolver::{canonical_url, EntityResolver};
pub use scrape::{ActivityScraper, ProfileScraper};
pub use synthesizer::StructuredSynthesizer;
