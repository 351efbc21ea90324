//! Response schema validation for compliance assessments.
//!
//! Model output is untrusted data. It is only ever handed to a strict JSON parser and then
//! checked field by field; nothing here evaluates or interprets it any other way.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 100.0;

/// Validated compliance assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    /// Always within 0–100.
    pub score: u8,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    /// The model supplied a score outside 0–100 and it was clamped.
    #[serde(default, skip_serializing_if = "is_false")]
    pub score_clamped: bool,
    /// Non-string list entries were dropped, or a bare string was promoted to a list.
    #[serde(default, skip_serializing_if = "is_false")]
    pub fields_sanitized: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// The model output could not be turned into a `ComplianceResult`.
///
/// `raw_output` is the exact text received, kept for operator diagnosis.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct ParseFailure {
    pub reason: String,
    pub raw_output: String,
}

/// Parses raw model output into a `ComplianceResult`.
///
/// Steps:
/// 1. trim and strip surrounding code fences
/// 2. strict JSON parse, top level must be an object
/// 3. validate and coerce `score`, `missingKeywords`, `suggestions`
pub fn parse_compliance_response(raw: &str) -> Result<ComplianceResult, ParseFailure> {
    let fail = |reason: String| ParseFailure {
        reason,
        raw_output: raw.to_string(),
    };

    let text = strip_json_fences(raw);
    if text.is_empty() {
        return Err(fail("model returned an empty response".to_string()));
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| fail(format!("response is not valid JSON: {e}")))?;

    let object = match &value {
        Value::Object(map) => map,
        other => {
            return Err(fail(format!(
                "expected a JSON object, got {}",
                type_name(other)
            )))
        }
    };

    let (score, score_clamped) = coerce_score(object).map_err(fail)?;
    let (missing_keywords, keywords_sanitized) =
        coerce_string_list(object, "missingKeywords").map_err(fail)?;
    let (suggestions, suggestions_sanitized) =
        coerce_string_list(object, "suggestions").map_err(fail)?;

    Ok(ComplianceResult {
        score,
        missing_keywords,
        suggestions,
        score_clamped,
        fields_sanitized: keywords_sanitized || suggestions_sanitized,
    })
}

/// Returns the score as an integer in 0–100 and whether clamping was applied.
fn coerce_score(object: &Map<String, Value>) -> Result<(u8, bool), String> {
    let value = object
        .get("score")
        .ok_or_else(|| "missing required field 'score'".to_string())?;

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| format!("field 'score' must be a number, got {}", type_name(value)))?;

    let rounded = number.round();
    if rounded < SCORE_MIN {
        Ok((SCORE_MIN as u8, true))
    } else if rounded > SCORE_MAX {
        Ok((SCORE_MAX as u8, true))
    } else {
        Ok((rounded as u8, false))
    }
}

/// Returns the list of strings under `field` and whether anything had to be sanitized.
fn coerce_string_list(
    object: &Map<String, Value>,
    field: &str,
) -> Result<(Vec<String>, bool), String> {
    match object.get(field) {
        None => Err(format!("missing required field '{field}'")),
        Some(Value::Array(items)) => {
            let strings: Vec<String> = items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect();
            let sanitized = strings.len() != items.len();
            Ok((strings, sanitized))
        }
        Some(Value::String(single)) => Ok((vec![single.clone()], true)),
        Some(other) => Err(format!(
            "field '{field}' must be an array of strings, got {}",
            type_name(other)
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    // Optional language tag on the opening fence, e.g. `json`.
    let inner = inner.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    inner
        .trim_start()
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or_else(|| inner.trim())
}
