//! Decoding of submitted answers.
//!
//! Two payload shapes are accepted:
//!
//! ```json
//! ["A", "", null, "c,e"]
//! ```
//!
//! and the answer-service shape
//!
//! ```json
//! { "answers": [ { "answer": "A" }, { "answer": null } ] }
//! ```
//!
//! `null` answers decode to empty strings, which the marker treats as not submitted.

use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Plain(Vec<Option<String>>),
    Service { answers: Vec<AnswerEntry> },
}

#[derive(Deserialize)]
struct AnswerEntry {
    #[serde(default)]
    answer: Option<String>,
}

/// Decode a submission payload into an ordered list of raw answers.
pub fn decode_submission(raw: &str) -> Result<Vec<String>, String> {
    let payload: Payload =
        serde_json::from_str(raw).map_err(|e| format!("Invalid submission JSON: {e}"))?;

    let answers: Vec<String> = match payload {
        Payload::Plain(values) => values.into_iter().map(Option::unwrap_or_default).collect(),
        Payload::Service { answers } => answers
            .into_iter()
            .map(|entry| entry.answer.unwrap_or_default())
            .collect(),
    };
    tracing::debug!(answers = answers.len(), "submission decoded");
    Ok(answers)
}
