//! Schema-constrained generation of [`PersonIntel`] from an evidence bundle.

use std::sync::{Arc, LazyLock};

use icebreaker_core::{EvidenceBundle, PersonIntel};
use regex::Regex;

use crate::capability::Generate;
use crate::error::{EnrichError, Stage};
use crate::guard::CallGuard;

const INSTRUCTION: &str = "Given the LinkedIn information and the Twitter activity below about a \
person, I want you to create:\n\
1. a short summary\n\
2. two interesting facts about them\n\
3. a topic that may interest them\n\
4. two creative ice breakers to open a conversation with them";

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)```").expect("valid fence regex")
});

/// Format instructions embedding the JSON-schema description of [`PersonIntel`].
#[must_use]
pub fn format_instructions() -> String {
    let schema = serde_json::to_string_pretty(&PersonIntel::json_schema())
        .unwrap_or_else(|_| PersonIntel::json_schema().to_string());
    format!(
        "The output must be a single JSON object that conforms to the JSON schema below. \
         Every property listed under \"required\" must be present with the stated type.\n\n\
         Output schema:\n```json\n{schema}\n```"
    )
}

/// Full generation request for one bundle.
#[must_use]
pub fn render_prompt(bundle: &EvidenceBundle) -> String {
    format!("{INSTRUCTION}\n\n{bundle}\n\n{}", format_instructions())
}

fn corrective_prompt(original: &str, raw: &str, reason: &str) -> String {
    format!(
        "{original}\n\nYour previous answer could not be parsed:\n{raw}\n\n\
         Error: {reason}\n\nReply again with only the JSON object."
    )
}

/// Parses the JSON object inside the first Markdown code fence that holds
/// one; without such a fence, the span from the first `{` to the last `}`.
///
/// # Errors
///
/// Returns [`EnrichError::SchemaParse`] carrying the raw text when no object is
/// found or a field is missing or mistyped.
pub fn parse_intel(raw: &str) -> Result<PersonIntel, EnrichError> {
    let schema_error = |reason: String| EnrichError::SchemaParse {
        reason,
        raw: raw.to_string(),
    };

    let candidate = FENCE_RE
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|body| body.starts_with('{') && body.ends_with('}'));
    if let Some(body) = candidate {
        return PersonIntel::from_schema_text(body).map_err(|e| schema_error(e.to_string()));
    }

    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(schema_error("no JSON object in output".to_string()));
    };
    if end < start {
        return Err(schema_error("no JSON object in output".to_string()));
    }

    PersonIntel::from_schema_text(&raw[start..=end]).map_err(|e| schema_error(e.to_string()))
}

#[derive(Clone)]
pub struct StructuredSynthesizer {
    llm: Arc<dyn Generate>,
    corrective_retry: bool,
}

impl StructuredSynthesizer {
    #[must_use]
    pub fn new(llm: Arc<dyn Generate>, corrective_retry: bool) -> Self {
        Self {
            llm,
            corrective_retry,
        }
    }

    async fn generate(&self, prompt: &str, guard: &CallGuard) -> Result<String, EnrichError> {
        guard
            .run(Stage::Synthesis, async {
                self.llm
                    .generate(prompt)
                    .await
                    .map_err(|e| EnrichError::upstream(Stage::Synthesis, &e))
            })
            .await
    }

    /// Sends one generation request and parses the reply. When corrective
    /// retry is on, a failed parse triggers exactly one follow-up request.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::SchemaParse`] when the (final) reply does not match.
    /// - [`EnrichError::Upstream`] when generation fails.
    /// - [`EnrichError::Timeout`] / [`EnrichError::Cancelled`] from `guard`.
    pub async fn synthesize(
        &self,
        bundle: &EvidenceBundle,
        guard: &CallGuard,
    ) -> Result<PersonIntel, EnrichError> {
        let prompt = render_prompt(bundle);
        let raw = self.generate(&prompt, guard).await?;

        let (reason, raw) = match parse_intel(&raw) {
            Ok(intel) => return Ok(intel),
            Err(EnrichError::SchemaParse { reason, raw }) if self.corrective_retry => (reason, raw),
            Err(e) => return Err(e),
        };

        tracing::warn!(%reason, "synthesis output rejected, sending corrective request");
        let retry_raw = self
            .generate(&corrective_prompt(&prompt, &raw, &reason), guard)
            .await?;
        parse_intel(&retry_raw)
    }
}
