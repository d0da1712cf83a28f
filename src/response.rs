//! Response classification: parse, status check, acknowledgement inspection.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AdaptiveError, Result};

/// Reserved field the HTTP status code is attached under on every
/// successful result.
pub const HTTP_STATUS_FIELD: &str = "httpStatusCode";

/// Acknowledgement values the provider reports for an overall success.
/// `SuccessWithWarning` counts as success; the raw ack value stays on the
/// body for callers who branch on it.
const SUCCESS_ACKS: [&str; 2] = ["Success", "SuccessWithWarning"];

/// The slice of the provider response envelope classification needs.
#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    ack: Option<String>,
}

fn extract_ack(body: &Value) -> Option<String> {
    let envelope = body.get("responseEnvelope")?;
    let envelope: ResponseEnvelope = serde_json::from_value(envelope.clone()).ok()?;
    envelope.ack
}

/// Classifies one HTTP exchange into the caller-facing result.
///
/// Linear, per call:
/// 1. Parse the body as JSON when the response format is JSON.
/// 2. Non-2xx status wins over everything else: `HttpStatus` carrying the
///    parsed body, or the raw text when parsing failed.
/// 3. A 2xx body that did not parse is `MalformedResponse`.
/// 4. The numeric status is attached under [`HTTP_STATUS_FIELD`].
/// 5. `responseEnvelope.ack` decides success; any non-success value
///    (including an absent field) is `Ack` with the body attached.
pub(crate) fn classify(response_format: &str, status: u16, body: String) -> Result<Value> {
    let success_status = (200..300).contains(&status);

    if response_format != "JSON" {
        if !success_status {
            return Err(AdaptiveError::HttpStatus {
                status,
                body: Value::String(body),
            });
        }
        // Non-JSON payloads are handed back raw; no ack to inspect.
        return Ok(json!({ "raw": body, HTTP_STATUS_FIELD: status }));
    }

    let parsed: Option<Value> = serde_json::from_str(&body).ok();

    if !success_status {
        return Err(AdaptiveError::HttpStatus {
            status,
            body: parsed.unwrap_or(Value::String(body)),
        });
    }

    let mut parsed = match parsed {
        Some(value) => value,
        None => return Err(AdaptiveError::MalformedResponse { status, body }),
    };

    if let Some(map) = parsed.as_object_mut() {
        map.insert(HTTP_STATUS_FIELD.to_string(), json!(status));
    }

    match extract_ack(&parsed) {
        Some(ack) if SUCCESS_ACKS.contains(&ack.as_str()) => Ok(parsed),
        other => Err(AdaptiveError::Ack {
            ack: other.unwrap_or_else(|| "missing".to_string()),
            status,
            body: parsed,
        }),
    }
}
