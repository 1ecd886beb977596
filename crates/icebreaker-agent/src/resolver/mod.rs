//! Entity resolution: turns a person's name into a profile URL through a
//! bounded Think → Act → Observe loop over a single search tool.

pub mod react;

use std::sync::{Arc, LazyLock};

use icebreaker_core::RESOLVER_CYCLE_CEILING;
use regex::Regex;

use crate::capability::{Generate, SearchCapability};
use crate::error::{EnrichError, Stage};
use crate::extract::extract_with_rule;
use crate::guard::CallGuard;
use react::{parse_step, render_prompt, Scratchpad, Step, ToolSpec};

pub const SEARCH_TOOL: ToolSpec = ToolSpec {
    name: "Crawl Google 4 linkedin profile page",
    description: "useful for when you need get the Linkedin Page URL",
};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s<>()\[\]]+").expect("valid url regex"));

/// Resolver state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverState {
    Think,
    Act { log: String, tool: String, input: String },
    Observe { log: String, observation: String },
    Done(String),
    Failed,
}

/// Returns the first `http(s)://` URL in `answer`, trailing punctuation trimmed.
#[must_use]
pub fn canonical_url(answer: &str) -> Option<&str> {
    URL_RE
        .find(answer)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '"', '\'']))
}

#[derive(Clone)]
pub struct EntityResolver {
    search: Arc<dyn SearchCapability>,
    llm: Arc<dyn Generate>,
    max_cycles: u32,
}

impl EntityResolver {
    /// `max_cycles` is clamped to `1..=RESOLVER_CYCLE_CEILING`.
    #[must_use]
    pub fn new(search: Arc<dyn SearchCapability>, llm: Arc<dyn Generate>, max_cycles: u32) -> Self {
        Self {
            search,
            llm,
            max_cycles: max_cycles.clamp(1, RESOLVER_CYCLE_CEILING),
        }
    }

    fn question(name: &str) -> String {
        format!(
            "given the full name {name} I want you to get me a link to their Linkedin profile page. \
             Your answer should contain only a URL"
        )
    }

    /// Runs the loop until the reasoning stage gives a final answer.
    ///
    /// Returns the final answer text as produced; see [`canonical_url`] for
    /// pulling the URL out of it.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::LoopExceeded`] when `max_cycles` reasoning calls pass
    ///   without a final answer.
    /// - [`EnrichError::Upstream`] when search or generation fails, or the
    ///   search document carries an error.
    /// - [`EnrichError::Timeout`] / [`EnrichError::Cancelled`] from `guard`.
    pub async fn resolve(&self, name: &str, guard: &CallGuard) -> Result<String, EnrichError> {
        let question = Self::question(name);
        let tools = [SEARCH_TOOL];
        let mut scratchpad = Scratchpad::default();
        let mut cycle = 0u32;
        let mut state = ResolverState::Think;

        loop {
            state = match state {
                ResolverState::Think if cycle >= self.max_cycles => ResolverState::Failed,
                ResolverState::Think => {
                    cycle += 1;
                    let prompt = render_prompt(&question, &tools, &scratchpad);
                    let output = guard
                        .run(Stage::Reasoning, async {
                            self.llm
                                .generate(&prompt)
                                .await
                                .map_err(|e| EnrichError::upstream(Stage::Reasoning, &e))
                        })
                        .await?;

                    match parse_step(&output) {
                        Ok(Step::Finish { answer }) => ResolverState::Done(answer),
                        Ok(Step::Act { tool, input }) => ResolverState::Act {
                            log: output,
                            tool,
                            input,
                        },
                        Err(invalid) => {
                            tracing::debug!(cycle, reason = %invalid.0, "unparseable reasoning output");
                            ResolverState::Observe {
                                log: output,
                                observation: format!("Invalid Format: {}", invalid.0),
                            }
                        }
                    }
                }
                ResolverState::Act { log, tool, input } => {
                    let observation = if tool == SEARCH_TOOL.name {
                        self.search_observation(&input, guard).await?
                    } else {
                        tracing::debug!(cycle, tool = %tool, "unknown tool requested");
                        format!(
                            "{tool} is not a valid tool, try one of [{}].",
                            SEARCH_TOOL.name
                        )
                    };
                    ResolverState::Observe { log, observation }
                }
                ResolverState::Observe { log, observation } => {
                    scratchpad.record(&log, &observation);
                    ResolverState::Think
                }
                ResolverState::Done(answer) => {
                    tracing::info!(name, cycles = cycle, "entity resolved");
                    return Ok(answer.trim().to_string());
                }
                ResolverState::Failed => {
                    tracing::warn!(name, cycles = self.max_cycles, "entity resolution exhausted its cycles");
                    return Err(EnrichError::LoopExceeded {
                        cycles: self.max_cycles,
                    });
                }
            };
        }
    }

    async fn search_observation(&self, query: &str, guard: &CallGuard) -> Result<String, EnrichError> {
        let doc = guard
            .run(Stage::Search, async {
                self.search
                    .search(query)
                    .await
                    .map_err(|e| EnrichError::upstream(Stage::Search, &e))
            })
            .await?;
        let extraction = extract_with_rule(&doc)?;
        tracing::debug!(query, rule = ?extraction.rule, "search observed");
        Ok(extraction.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_pulls_url_out_of_prose() {
        assert_eq!(
            canonical_url("Ada Lovelace profile page: https://linkedin.com/in/ada"),
            Some("https://linkedin.com/in/ada")
        );
        assert_eq!(
            canonical_url("See https://linkedin.com/in/ada."),
            Some("https://linkedin.com/in/ada")
        );
        assert_eq!(canonical_url("no link here"), None);
    }

    #[test]
    fn question_names_the_person() {
        assert!(EntityResolver::question("Ada Lovelace").contains("full name Ada Lovelace"));
    }
}
