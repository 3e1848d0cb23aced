//! Judgment response extraction.
//!
//! Judge models frequently wrap valid JSON in prose, use single quotes, or
//! drop the required schema entirely. Extraction therefore never fails:
//! three strategy tiers are tried in order and the first success wins, with
//! the final tier degrading to a best-effort score and explanation rather
//! than an error. A partially-wrong score is more useful than a hard
//! failure.

use regex::Regex;
use serde_json::Value;

/// Maximum explanation length when falling back to the raw response text.
const MAX_FALLBACK_EXPLANATION: usize = 500;

/// Placeholder when no explanation survives any tier.
const EMPTY_EXPLANATION: &str = "No explanation provided";

/// Validated score/explanation pair recovered from a judge response.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentResult {
    pub explanation: String,
    pub score: f64,
}

/// Extract a judgment from raw judge-model output.
///
/// Tier 1 parses the whole trimmed text as JSON. Tier 2 hunts for an
/// embedded JSON object carrying both `"score"` and `"explanation"`.
/// Tier 3 falls back to regex recovery of a score and whatever explanation
/// text can be salvaged. The score is always clamped to [0, 10].
pub fn extract(raw: &str) -> JudgmentResult {
    let text = raw.trim();

    if let Some(result) = parse_whole(text) {
        return result;
    }
    if let Some(result) = parse_embedded(text) {
        return result;
    }
    parse_loose(text)
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 10.0)
}

/// Accept a JSON value only when `score` is a number and `explanation` a
/// string, both at the top level.
fn validate(value: &Value) -> Option<JudgmentResult> {
    let object = value.as_object()?;
    let score = object.get("score")?.as_f64()?;
    let explanation = object.get("explanation")?.as_str()?;

    Some(JudgmentResult {
        explanation: explanation.to_string(),
        score: clamp_score(score),
    })
}

/// Tier 1: the entire response is the JSON object.
fn parse_whole(text: &str) -> Option<JudgmentResult> {
    let value: Value = serde_json::from_str(text).ok()?;
    validate(&value)
}

/// Tier 2: a JSON object is embedded in surrounding prose.
///
/// Walks each `{` in the text to its matching close brace (string-aware, so
/// braces inside JSON strings do not end the scan) and parses the smallest
/// region that contains both required keys.
fn parse_embedded(text: &str) -> Option<JudgmentResult> {
    for (start, _) in text.match_indices('{') {
        let Some(end) = matching_brace(&text[start..]) else {
            continue;
        };
        let candidate = &text[start..start + end + 1];
        if !candidate.contains("\"score\"") || !candidate.contains("\"explanation\"") {
            continue;
        }
        if let Some(result) = parse_whole(candidate) {
            return Some(result);
        }
    }
    None
}

/// Byte offset of the brace closing the object that opens at the start of
/// `text`, or None when the object never closes.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Tier 3: regex recovery from free-form text.
fn parse_loose(text: &str) -> JudgmentResult {
    let score = loose_score(text).unwrap_or(0.0);
    let explanation = loose_explanation(text);

    JudgmentResult {
        explanation: if explanation.is_empty() {
            EMPTY_EXPLANATION.to_string()
        } else {
            explanation
        },
        score: clamp_score(score),
    }
}

/// First decimal number following the token `score`, tolerating filler
/// words like "the score is 7".
fn loose_score(text: &str) -> Option<f64> {
    let re = Regex::new(r"(?i)score\D*?(-?\d+(?:\.\d+)?)").expect("invalid score pattern");
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn loose_explanation(text: &str) -> String {
    // (a) a quoted string following the "explanation" key
    let quoted =
        Regex::new(r#""explanation"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("invalid quoted pattern");
    if let Some(captures) = quoted.captures(text) {
        return unescape(&captures[1]);
    }

    // (b) an explanation: label, up to end of line
    let labeled =
        Regex::new(r"(?i)explanation\s*:\s*([^\r\n]+)").expect("invalid labeled pattern");
    if let Some(captures) = labeled.captures(text) {
        return captures[1].trim().to_string();
    }

    // (c) the whole input with score mentions stripped, truncated
    let score_mention =
        Regex::new(r"(?i)score\s*:?\s*-?\d+(?:\.\d+)?").expect("invalid mention pattern");
    let stripped = score_mention.replace_all(text, "");
    let stripped = stripped.trim();

    if stripped.chars().count() > MAX_FALLBACK_EXPLANATION {
        let truncated: String = stripped.chars().take(MAX_FALLBACK_EXPLANATION).collect();
        format!("{}...", truncated)
    } else {
        stripped.to_string()
    }
}

/// Undo the JSON string escapes a regex capture leaves behind.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
