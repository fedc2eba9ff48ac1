//! Decision parsing.
//!
//! Converts the model's raw, untrusted reply into a guaranteed-well-formed
//! [`Decision`]. Never fails past this boundary: the two fallback tiers keep
//! "the model produced gibberish" (stay quiet) distinct from "our own
//! processing broke" (say something went wrong).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use earshot_protocol::Decision;

/// Spoken when a reply was valid JSON but defeated the structured
/// conversion.
const FALLBACK_NOTICE: &str = "Something went wrong, please try again later.";

/// Matches an opening fence marker with an optional json tag.
static FENCE_TAGGED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```json\n?").expect("invalid fence regex"));

/// Parse a raw model reply into a decision.
///
/// Tier 1: cleaned reply parses and converts -> that decision, with the
/// silence invariant re-enforced. Tier 2: reply is not JSON at all -> the
/// silent default. Tier 3: reply is JSON but the expected two-field shape
/// cannot be extracted -> the apologetic notice.
pub fn parse_decision(raw: &str) -> Decision {
    let cleaned = strip_fences(raw);

    let value: Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            debug!("model reply is not JSON, staying silent: {}", e);
            return Decision::silent();
        }
    };

    match decision_from_value(&value) {
        Ok(decision) => decision.normalized(),
        Err(reason) => {
            warn!("failed to extract decision from JSON reply: {}", reason);
            Decision::respond(FALLBACK_NOTICE)
        }
    }
}

/// Remove code-fence wrapping the model sometimes adds despite instructions.
/// Tolerates zero, one, or multiple markers: strip what matches, keep the
/// rest.
fn strip_fences(raw: &str) -> String {
    let cleaned = FENCE_TAGGED.replace_all(raw, "");
    cleaned.replace("```", "").trim().to_string()
}

/// Extract the `{shouldRespond, responseText}` shape from a parsed JSON
/// value.
///
/// `shouldRespond` must be present and boolean. A missing `responseText`
/// defaults to empty; any non-string value for it is an error.
fn decision_from_value(value: &Value) -> Result<Decision, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("payload is not an object: {}", value))?;

    let should_respond = obj
        .get("shouldRespond")
        .ok_or("missing shouldRespond field")?
        .as_bool()
        .ok_or("shouldRespond is not a boolean")?;

    let response_text = match obj.get("responseText") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => return Err(format!("responseText is not a string: {}", other)),
    };

    Ok(Decision {
        should_respond,
        response_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_payload() {
        let decision = parse_decision(r#"{"shouldRespond": true, "responseText": "Brasília."}"#);
        assert_eq!(decision, Decision::respond("Brasília."));
    }

    #[test]
    fn test_fence_stripping_is_layer_independent() {
        let payload = r#"{"shouldRespond": true, "responseText": "hello"}"#;
        let once = format!("```json\n{payload}\n```");
        let twice = format!("```json\n```json\n{payload}\n```\n```");

        let expected = parse_decision(payload);
        assert_eq!(parse_decision(&once), expected);
        assert_eq!(parse_decision(&twice), expected);
    }

    #[test]
    fn test_fence_marker_case_insensitive() {
        let wrapped = "```JSON\n{\"shouldRespond\": false, \"responseText\": \"\"}\n```";
        assert_eq!(parse_decision(wrapped), Decision::silent());
    }

    #[test]
    fn test_untagged_fences() {
        let wrapped = "```\n{\"shouldRespond\": true, \"responseText\": \"yes\"}\n```";
        assert_eq!(parse_decision(wrapped), Decision::respond("yes"));
    }

    #[test]
    fn test_gibberish_stays_silent() {
        assert_eq!(parse_decision("not json at all"), Decision::silent());
        assert_eq!(parse_decision("I'm not sure"), Decision::silent());
        assert_eq!(parse_decision(""), Decision::silent());
    }

    #[test]
    fn test_wrong_shape_apologizes() {
        // Valid JSON, but the structured conversion fails: this is our
        // contract with the model breaking, not background noise.
        let decision = parse_decision(r#"{"shouldRespond": "yes"}"#);
        assert!(decision.should_respond);
        assert_eq!(decision.response_text, FALLBACK_NOTICE);

        let decision = parse_decision(r#"[1, 2, 3]"#);
        assert_eq!(decision.response_text, FALLBACK_NOTICE);
    }

    #[test]
    fn test_tiers_never_conflate() {
        let silent = parse_decision("not json at all");
        let notice = parse_decision(r#"{"shouldRespond": 1}"#);
        assert_ne!(silent.should_respond, notice.should_respond);
        assert_ne!(silent.response_text, notice.response_text);
    }

    #[test]
    fn test_silence_invariant_enforced() {
        // Syntactically valid but inconsistent: the model said "don't
        // respond" yet supplied text anyway.
        let decision =
            parse_decision(r#"{"shouldRespond": false, "responseText": "should not leak"}"#);
        assert_eq!(decision, Decision::silent());
    }

    #[test]
    fn test_missing_response_text_defaults_to_empty() {
        let decision = parse_decision(r#"{"shouldRespond": false}"#);
        assert_eq!(decision, Decision::silent());
    }

    #[test]
    fn test_extra_whitespace_tolerated() {
        let decision =
            parse_decision("  \n {\"shouldRespond\": true, \"responseText\": \"hi\"} \n ");
        assert_eq!(decision, Decision::respond("hi"));
    }
}
