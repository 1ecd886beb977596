//! Command handlers: wire the HTTP providers into an [`Enricher`] and print
//! the result to stdout.

use std::sync::Arc;

use anyhow::Context;
use icebreaker_agent::{canonical_url, Capabilities, EnrichSettings, Enricher};
use icebreaker_core::AppConfig;
use icebreaker_providers::{HttpSettings, OpenAiClient, ProxycurlClient, SerpClient, TwitterClient};
use tokio_util::sync::CancellationToken;

/// Builds the provider clients from `config`.
///
/// # Errors
///
/// Returns an error if any client cannot be built (bad base URL, TLS init).
pub(crate) fn build_enricher(config: &AppConfig) -> anyhow::Result<Enricher> {
    let http = HttpSettings::from_config(config);

    let search = SerpClient::new(&config.serp_api_key, &config.serp_base_url, &http)
        .context("failed to build search client")?;
    let llm = OpenAiClient::new(
        &config.openai_api_key,
        &config.openai_model,
        &config.openai_base_url,
        &http,
    )
    .context("failed to build generation client")?;
    let profiles = ProxycurlClient::new(&config.proxycurl_api_key, &config.proxycurl_base_url, &http)
        .context("failed to build profile client")?;
    let twitter = Arc::new(
        TwitterClient::new(
            &config.rapidapi_key,
            &config.rapidapi_host,
            &config.twitter_base_url,
            &http,
        )
        .context("failed to build activity client")?,
    );

    Ok(Enricher::new(
        Capabilities {
            search: Arc::new(search),
            llm: Arc::new(llm),
            profiles: Arc::new(profiles),
            handles: twitter.clone(),
            activity: twitter,
        },
        EnrichSettings::from_config(config),
    ))
}

pub(crate) async fn run_enrich(
    config: &AppConfig,
    name: &str,
    pretty: bool,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let enricher = build_enricher(config)?;
    tracing::info!(name, model = %config.openai_model, "starting enrichment");

    let enrichment = enricher
        .enrich_with_cancel(name, cancel)
        .await
        .with_context(|| format!("enrichment failed for \"{name}\""))?;

    let output = if pretty {
        serde_json::to_string_pretty(&enrichment)?
    } else {
        serde_json::to_string(&enrichment)?
    };
    println!("{output}");
    Ok(())
}

pub(crate) async fn run_resolve(
    config: &AppConfig,
    name: &str,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let enricher = build_enricher(config)?;
    let answer = enricher
        .resolve(name, cancel)
        .await
        .with_context(|| format!("resolution failed for \"{name}\""))?;
    println!("{}", canonical_url(&answer).unwrap_or(&answer));
    Ok(())
}
