//! Transport string decoding.
//!
//! The generated program hands back a single JSON document:
//!
//! ```text
//! { "result": <any>, "steps": [ { "step", "line", "code", "variables" }, ... ] }
//! ```
//!
//! Decoding is all-or-nothing. A malformed document, a missing or mistyped
//! field, or a step sequence that is not exactly `0..N` fails the whole
//! parse; callers never see a truncated trace.

use serde::{Deserialize, Serialize};

use crate::error::TraceError;
use crate::step::{TraceOutcome, TraceStep};

#[derive(Debug, Serialize, Deserialize)]
struct TransportPayload {
    #[serde(default)]
    result: serde_json::Value,
    steps: Vec<TraceStep>,
}

/// Decodes the transport string and returns only its steps.
pub fn parse(raw: &str) -> Result<Vec<TraceStep>, TraceError> {
    parse_outcome(raw).map(|outcome| outcome.steps)
}

/// Decodes the transport string, keeping the traced function's return value.
///
/// The returned outcome has an empty `stdout`; the host fills it in.
pub fn parse_outcome(raw: &str) -> Result<TraceOutcome, TraceError> {
    let payload: TransportPayload = serde_json::from_str(raw)?;
    check_sequence(&payload.steps)?;
    Ok(TraceOutcome {
        result: payload.result,
        steps: payload.steps,
        stdout: String::new(),
    })
}

/// Encodes a result and steps into the transport shape.
pub fn encode(result: &serde_json::Value, steps: &[TraceStep]) -> Result<String, TraceError> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        result: &'a serde_json::Value,
        steps: &'a [TraceStep],
    }
    serde_json::to_string(&Borrowed { result, steps })
        .map_err(|e| TraceError::Unknown(format!("failed to encode trace: {}", e)))
}

fn check_sequence(steps: &[TraceStep]) -> Result<(), TraceError> {
    for (position, step) in steps.iter().enumerate() {
        if step.step as usize != position {
            return Err(TraceError::Parse(format!(
                "step index {} found at position {}",
                step.step, position
            )));
        }
        if step.line == 0 {
            return Err(TraceError::Parse(format!(
                "step {} reports line 0",
                step.step
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::Variables;
    use proptest::prelude::*;
    use serde_json::json;

    fn step(step: u32, line: u32, code: &str, vars: serde_json::Value) -> TraceStep {
        TraceStep {
            step,
            line,
            code: code.to_string(),
            variables: serde_json::from_value(vars).unwrap(),
        }
    }

    #[test]
    fn parses_single_step_trace() {
        let raw = r#"{"result": 6, "steps": [{"step": 0, "line": 2, "code": "return n + 1", "variables": {"n": 5}}]}"#;
        let outcome = parse_outcome(raw).unwrap();
        assert_eq!(outcome.result, json!(6));
        assert_eq!(outcome.steps, vec![step(0, 2, "return n + 1", json!({ "n": 5 }))]);

        let steps = parse(raw).unwrap();
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn string_fallback_survives_as_string() {
        let raw = r#"{"result": null, "steps": [{"step": 0, "line": 4, "code": "return p", "variables": {"p": "<__main__.Point object at 0x7f>"}}]}"#;
        let steps = parse(raw).unwrap();
        assert!(steps[0].variables["p"].is_string());
    }

    #[test]
    fn missing_result_defaults_to_null() {
        let outcome = parse_outcome(r#"{"steps": []}"#).unwrap();
        assert_eq!(outcome.result, serde_json::Value::Null);
        assert!(outcome.steps.is_empty());
    }

    #[test]
    fn big_integers_are_not_rounded() {
        let raw = r#"{"result": 15511210043330985984000000, "steps": [{"step": 0, "line": 3, "code": "return acc", "variables": {"acc": -15511210043330985984000000, "ratio": 0.1}}]}"#;
        let outcome = parse_outcome(raw).unwrap();
        assert_eq!(outcome.result.to_string(), "15511210043330985984000000");
        assert_eq!(
            outcome.result,
            serde_json::from_str::<serde_json::Value>("15511210043330985984000000").unwrap()
        );
        let vars = &outcome.steps[0].variables;
        assert_eq!(vars["acc"].to_string(), "-15511210043330985984000000");
        assert_eq!(vars["ratio"].to_string(), "0.1");

        let again = parse_outcome(&encode(&outcome.result, &outcome.steps).unwrap()).unwrap();
        assert_eq!(again.result.to_string(), "15511210043330985984000000");
        assert_eq!(again.steps, outcome.steps);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse("{\"steps\": [").unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(parse(r#"{"result": 1}"#).is_err());
        assert!(parse(r#"{"steps": [{"step": 0, "line": 1, "code": "x"}]}"#).is_err());
    }

    #[test]
    fn rejects_nan_literal() {
        // Python's json.dumps emits bare NaN unless told not to.
        assert!(parse(r#"{"result": NaN, "steps": []}"#).is_err());
    }

    #[test]
    fn rejects_gaps_and_reordering() {
        let raw = json!({
            "result": null,
            "steps": [
                { "step": 0, "line": 2, "code": "a", "variables": {} },
                { "step": 2, "line": 3, "code": "b", "variables": {} }
            ]
        })
        .to_string();
        let err = parse(&raw).unwrap_err();
        assert_eq!(
            err,
            TraceError::Parse("step index 2 found at position 1".to_string())
        );
    }

    #[test]
    fn rejects_line_zero() {
        let raw = json!({
            "steps": [{ "step": 0, "line": 0, "code": "", "variables": {} }]
        })
        .to_string();
        assert!(parse(&raw).is_err());
    }

    #[test]
    fn encode_then_parse_restores_steps() {
        let steps = vec![
            step(0, 2, "total = 0", json!({ "xs": [1, 2, 3] })),
            step(1, 3, "for x in xs:", json!({ "xs": [1, 2, 3], "total": 0 })),
            step(
                2,
                4,
                "total += x",
                json!({ "xs": [1, 2, 3], "total": 0, "x": 1, "meta": { "k": null, "f": true } }),
            ),
        ];
        let raw = encode(&json!(6), &steps).unwrap();
        let outcome = parse_outcome(&raw).unwrap();
        assert_eq!(outcome.steps, steps);
        assert_eq!(outcome.result, json!(6));
    }

    fn arb_value() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            "[a-z ]{0,8}".prop_map(serde_json::Value::from),
        ]
    }

    proptest! {
        #[test]
        fn encoded_sequences_are_contiguous(
            entries in prop::collection::vec((1u32..200, "[ -~]{0,20}", prop::collection::vec(("[a-z]{1,4}", arb_value()), 0..4)), 0..12)
        ) {
            let steps: Vec<TraceStep> = entries
                .into_iter()
                .enumerate()
                .map(|(i, (line, code, vars))| TraceStep {
                    step: i as u32,
                    line,
                    code,
                    variables: vars.into_iter().collect::<Variables>(),
                })
                .collect();
            let raw = encode(&serde_json::Value::Null, &steps).unwrap();
            let parsed = parse(&raw).unwrap();
            for (i, s) in parsed.iter().enumerate() {
                prop_assert_eq!(s.step as usize, i);
            }
            prop_assert_eq!(parsed, steps);
        }
    }
}
