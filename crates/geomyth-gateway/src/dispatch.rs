//! Method dispatch
//!
//! Dispatches an envelope over the closed method set. Only `myth.parse`
//! carries real (still trivial) logic; every other registered method
//! returns a stub acknowledgement, and unregistered methods report
//! `unknown_method`.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::json;

use crate::envelope::Envelope;
use crate::methods::MethodRegistry;

/// Motif keyword sets checked against the lower-cased document
const MOTIF_SETS: &[(&str, &[&str])] = &[
    ("volcano", &["fire", "flame", "ash", "volcano"]),
    ("flood/tsunami", &["wave", "flood", "sea", "tsunami"]),
];

#[derive(Debug, Deserialize)]
struct MythParseInput {
    doc: String,
    #[serde(default)]
    #[allow(dead_code)]
    language: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    ocr: Option<bool>,
}

/// Execute one envelope against the method table
pub fn execute(registry: &MethodRegistry, envelope: &Envelope) -> serde_json::Value {
    let method = envelope.method.as_str();
    match method {
        "myth.parse" => myth_parse(&envelope.parameters),
        _ if registry.contains(method) => json!({
            "ok": true,
            "result": { "message": format!("Method {method} stubbed") },
        }),
        _ => json!({
            "ok": false,
            "error": "unknown_method",
            "method": method,
        }),
    }
}

fn myth_parse(parameters: &serde_json::Value) -> serde_json::Value {
    let input: MythParseInput = match serde_json::from_value(parameters.clone()) {
        Ok(input) => input,
        Err(err) => {
            return json!({
                "ok": false,
                "error": "invalid_parameters",
                "detail": err.to_string(),
            })
        }
    };

    let text = input.doc.to_lowercase();
    let mut motifs = Vec::new();
    for (name, keywords) in MOTIF_SETS {
        if keywords.iter().any(|k| text.contains(k)) {
            motifs.push(json!({ "name": name, "confidence": 0.6 }));
        }
    }

    // every capitalized token is an entity of unknown type
    let entities: Vec<_> = input
        .doc
        .split_whitespace()
        .filter_map(|token| {
            let word: String = token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_string();
            is_capitalized(&word).then_some(word)
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|word| json!({ "text": word, "type": "UNKNOWN" }))
        .collect();

    json!({
        "ok": true,
        "result": {
            "entities": entities,
            "motifs": motifs,
            "relations": [],
        },
    })
}

/// First char uppercase, remainder lowercase
fn is_capitalized(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| c.is_lowercase()),
        _ => false,
    }
}
