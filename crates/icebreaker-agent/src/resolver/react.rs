//! ReAct prompt rendering and reasoning-output parsing.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "Observation:";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:(.*?)\n\s*Action\s*\d*\s*Input\s*\d*\s*:(.*)")
        .expect("valid action regex")
});

/// A tool the reasoning stage may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// One parsed reasoning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Act { tool: String, input: String },
    Finish { answer: String },
}

/// Why a reasoning output could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStep(pub String);

/// Thought/Action/Observation history fed back on every cycle.
#[derive(Debug, Default, Clone)]
pub struct Scratchpad {
    turns: Vec<(String, String)>,
}

impl Scratchpad {
    /// Records the reasoning text of a cycle with the observation it produced.
    pub fn record(&mut self, log: &str, observation: &str) {
        self.turns
            .push((log.trim_end().to_string(), observation.to_string()));
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for (log, observation) in &self.turns {
            let _ = write!(out, " {log}\n{OBSERVATION} {observation}\nThought:");
        }
        out
    }
}

/// Renders the full prompt for one reasoning cycle.
#[must_use]
pub fn render_prompt(question: &str, tools: &[ToolSpec], scratchpad: &Scratchpad) -> String {
    let tool_lines = tools
        .iter()
        .map(|tool| format!("{}: {}", tool.name, tool.description))
        .collect::<Vec<_>>()
        .join("\n");
    let tool_names = tools
        .iter()
        .map(|tool| tool.name)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Answer the following question as best you can. You have access to these tools:\n\n\
         {tool_lines}\n\n\
         Use this format:\n\n\
         Question: the input question you must answer\n\
         Thought: what to do next\n\
         Action: the tool to use, one of [{tool_names}]\n\
         Action Input: the input to the tool\n\
         {OBSERVATION} the result of the tool\n\
         ... (Thought/Action/Action Input/Observation may repeat)\n\
         Thought: I now know the final answer\n\
         {FINAL_ANSWER} the final answer to the original question\n\n\
         Begin!\n\n\
         Question: {question}\n\
         Thought:{}",
        scratchpad.render()
    )
}

/// Parses one reasoning output into a [`Step`].
///
/// Anything after a self-written `Observation:` is ignored; the real
/// observation comes from the tool. `Final Answer:` wins over an action.
///
/// # Errors
///
/// Returns [`InvalidStep`] when the output has neither a final answer nor an
/// `Action:`/`Action Input:` pair.
pub fn parse_step(output: &str) -> Result<Step, InvalidStep> {
    let text = if output.trim_start().starts_with(OBSERVATION) {
        ""
    } else {
        output
            .find(&format!("\n{OBSERVATION}"))
            .map_or(output, |cut| &output[..cut])
    };

    if let Some(pos) = text.find(FINAL_ANSWER) {
        let answer = text[pos + FINAL_ANSWER.len()..].trim();
        if answer.is_empty() {
            return Err(InvalidStep("empty final answer".to_string()));
        }
        return Ok(Step::Finish {
            answer: answer.to_string(),
        });
    }

    let Some(caps) = ACTION_RE.captures(text) else {
        return Err(InvalidStep(
            "missing 'Action:' after 'Thought:' or 'Final Answer:'".to_string(),
        ));
    };

    let tool = caps[1].trim().trim_matches('`').trim().to_string();
    let input = caps[2].trim().trim_matches('"').trim().to_string();
    if tool.is_empty() {
        return Err(InvalidStep("empty action name".to_string()));
    }
    Ok(Step::Act { tool, input })
}
