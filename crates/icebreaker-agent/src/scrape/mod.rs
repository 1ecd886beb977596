//! Source scrapers: fetch a raw provider document, then shape it into evidence.

pub mod activity;
pub mod profile;

pub use activity::{collect_feed, ActivityScraper};
pub use profile::{FieldPolicy, ProfileScraper, LINKEDIN_POLICY};
