use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Structured intelligence synthesized about one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIntel {
    pub summary: String,
    pub facts: Vec<String>,
    pub topics_of_interest: Vec<String>,
    pub ice_breakers: Vec<String>,
}

impl PersonIntel {
    /// `(field, description)` pairs for every field, in declaration order.
    pub const FIELDS: [(&'static str, &'static str); 4] = [
        ("summary", "Summary of the person"),
        ("facts", "Interesting facts about the person"),
        ("topics_of_interest", "Topics that may interest the person"),
        (
            "ice_breakers",
            "Creative ice breakers to open a conversation with the person",
        ),
    ];

    /// JSON-schema description of the expected generation output.
    #[must_use]
    pub fn json_schema() -> Value {
        let mut properties = serde_json::Map::new();
        for (field, description) in Self::FIELDS {
            let property = if field == "summary" {
                json!({ "title": title_case(field), "description": description, "type": "string" })
            } else {
                json!({
                    "title": title_case(field),
                    "description": description,
                    "type": "array",
                    "items": { "type": "string" }
                })
            };
            properties.insert(field.to_string(), property);
        }
        json!({
            "title": "PersonIntel",
            "type": "object",
            "properties": properties,
            "required": Self::FIELDS.iter().map(|(field, _)| *field).collect::<Vec<_>>(),
        })
    }

    /// The textual encoding the synthesizer expects back from generation.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialization fails.
    pub fn to_schema_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses the textual encoding produced by [`PersonIntel::to_schema_text`].
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if a field is missing or has the wrong type.
    pub fn from_schema_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn title_case(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Terminal artifact of one enrichment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub intel: PersonIntel,
    /// Profile image reference taken from the profile record, not from generation.
    pub image_url: Option<String>,
}
