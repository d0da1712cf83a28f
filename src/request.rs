//! Outbound request assembly: envelope defaults, headers, body encoding.

use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::credential::{Credential, TokenCredential};
use crate::error::{AdaptiveError, Result};
use crate::merge;
use crate::sign::auth_header;

/// Error-reporting language in the default request envelope.
const ENVELOPE_ERROR_LANGUAGE: &str = "en_US";

/// Response detail level in the default request envelope.
const ENVELOPE_DETAIL_LEVEL: &str = "ReturnAll";

fn default_envelope() -> Value {
    json!({
        "requestEnvelope": {
            "errorLanguage": ENVELOPE_ERROR_LANGUAGE,
            "detailLevel": ENVELOPE_DETAIL_LEVEL,
        }
    })
}

/// Merges the default `requestEnvelope` under a payload.
///
/// Caller-supplied envelope fields win over the defaults. Applying the
/// envelope twice is a no-op, so both the generic dispatcher and the
/// high-level operations can merge before their own checks.
pub(crate) fn apply_envelope(payload: Value) -> Value {
    match payload {
        Value::Null => default_envelope(),
        Value::Object(_) => merge::merged(default_envelope(), &payload),
        // Pre-encoded bodies pass through untouched.
        other => other,
    }
}

/// Header set and encoded body for one call.
#[derive(Debug)]
pub(crate) struct OutboundRequest {
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

/// Builds the signed header set and encoded body for one call.
///
/// When the payload carries a delegated token pair, the pair is removed
/// here and exchanged for an X-PAYPAL-AUTHORIZATION header; it never
/// reaches the wire body. `timestamp` feeds the signature and is only
/// supplied by tests; `None` uses the current time.
pub(crate) fn build_request(
    config: &ClientConfig,
    credential: &Credential,
    operation_path: &str,
    payload: Value,
    timestamp: Option<i64>,
) -> Result<OutboundRequest> {
    let mut payload = apply_envelope(payload);
    let delegated = TokenCredential::take_from(&mut payload);

    let mut headers: Vec<(&'static str, String)> = vec![
        ("X-PAYPAL-SECURITY-USERID", credential.user_id.clone()),
        ("X-PAYPAL-SECURITY-PASSWORD", credential.password.clone()),
        ("X-PAYPAL-SECURITY-SIGNATURE", credential.signature.clone()),
        ("X-PAYPAL-APPLICATION-ID", config.resolved_app_id()?),
        ("X-PAYPAL-REQUEST-DATA-FORMAT", config.request_format.clone()),
        (
            "X-PAYPAL-RESPONSE-DATA-FORMAT",
            config.response_format.clone(),
        ),
    ];

    if let Some(email) = &config.sandbox_email {
        headers.push(("X-PAYPAL-SANDBOX-EMAIL-ADDRESS", email.clone()));
    }
    if let Some(device_ip) = &config.device_ip {
        headers.push(("X-PAYPAL-DEVICE-IPADDRESS", device_ip.clone()));
    }

    if let Some(delegated) = delegated {
        let url = config.endpoint(operation_path);
        headers.push((
            "X-PAYPAL-AUTHORIZATION",
            auth_header(
                &credential.user_id,
                &credential.password,
                &delegated.token,
                &delegated.token_secret,
                &url,
                timestamp,
            )?,
        ));
    }

    let content_type = match config.request_format.as_str() {
        "JSON" => "application/json",
        _ => "application/x-www-form-urlencoded",
    };
    headers.push(("Content-Type", content_type.to_string()));

    let body = encode_body(&config.request_format, &payload)?;
    Ok(OutboundRequest { headers, body })
}

/// Serializes the payload in the configured request format.
///
/// Non-JSON formats require the caller to supply an already-encoded
/// string body.
fn encode_body(format: &str, payload: &Value) -> Result<String> {
    if format == "JSON" {
        return serde_json::to_string(payload)
            .map_err(|e| AdaptiveError::Config(format!("cannot encode request body: {}", e)));
    }
    match payload {
        Value::String(raw) => Ok(raw.clone()),
        _ => Err(AdaptiveError::Config(format!(
            "request format {} requires a pre-encoded string body",
            format
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credential() -> Credential {
        Credential::new("user_api1.example.com", "pass", "sig")
    }

    fn sandbox_config() -> ClientConfig {
        ClientConfig::default().with_sandbox(true)
    }

    fn header<'a>(request: &'a OutboundRequest, name: &str) -> Option<&'a str> {
        request
            .headers
            .iter()
            .find(|(header_name, _)| *header_name == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn envelope_defaults_applied() {
        let payload = apply_envelope(json!({"payKey": "AP-1"}));
        assert_eq!(payload["requestEnvelope"]["errorLanguage"], "en_US");
        assert_eq!(payload["requestEnvelope"]["detailLevel"], "ReturnAll");
        assert_eq!(payload["payKey"], "AP-1");
    }

    #[test]
    fn envelope_defaults_applied_to_null_payload() {
        let payload = apply_envelope(Value::Null);
        assert_eq!(payload["requestEnvelope"]["errorLanguage"], "en_US");
    }

    #[test]
    fn caller_envelope_fields_win() {
        let payload = apply_envelope(json!({
            "requestEnvelope": {"errorLanguage": "fr_FR"}
        }));
        assert_eq!(payload["requestEnvelope"]["errorLanguage"], "fr_FR");
        assert_eq!(payload["requestEnvelope"]["detailLevel"], "ReturnAll");
    }

    #[test]
    fn envelope_application_is_idempotent() {
        let once = apply_envelope(json!({"requestEnvelope": {"errorLanguage": "fr_FR"}}));
        let twice = apply_envelope(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn security_headers_present() {
        let request = build_request(
            &sandbox_config(),
            &test_credential(),
            "AdaptivePayments/Pay",
            json!({}),
            None,
        )
        .unwrap();
        assert_eq!(
            header(&request, "X-PAYPAL-SECURITY-USERID"),
            Some("user_api1.example.com")
        );
        assert_eq!(header(&request, "X-PAYPAL-SECURITY-PASSWORD"), Some("pass"));
        assert_eq!(header(&request, "X-PAYPAL-SECURITY-SIGNATURE"), Some("sig"));
        assert_eq!(
            header(&request, "X-PAYPAL-APPLICATION-ID"),
            Some(crate::config::SANDBOX_APP_ID)
        );
        assert_eq!(header(&request, "X-PAYPAL-REQUEST-DATA-FORMAT"), Some("JSON"));
        assert_eq!(header(&request, "X-PAYPAL-RESPONSE-DATA-FORMAT"), Some("JSON"));
        assert_eq!(header(&request, "Content-Type"), Some("application/json"));
    }

    #[test]
    fn optional_headers_follow_config() {
        let config = sandbox_config()
            .with_sandbox_email("buyer@example.com")
            .with_device_ip("203.0.113.7");
        let request = build_request(
            &config,
            &test_credential(),
            "AdaptivePayments/Pay",
            json!({}),
            None,
        )
        .unwrap();
        assert_eq!(
            header(&request, "X-PAYPAL-SANDBOX-EMAIL-ADDRESS"),
            Some("buyer@example.com")
        );
        assert_eq!(
            header(&request, "X-PAYPAL-DEVICE-IPADDRESS"),
            Some("203.0.113.7")
        );

        let bare = build_request(
            &sandbox_config(),
            &test_credential(),
            "AdaptivePayments/Pay",
            json!({}),
            None,
        )
        .unwrap();
        assert!(header(&bare, "X-PAYPAL-SANDBOX-EMAIL-ADDRESS").is_none());
        assert!(header(&bare, "X-PAYPAL-DEVICE-IPADDRESS").is_none());
    }

    #[test]
    fn delegated_pair_becomes_authorization_header() {
        let request = build_request(
            &sandbox_config(),
            &test_credential(),
            "Permissions/GetBasicPersonalData",
            json!({"token": "AA-token", "tokenSecret": "AA-secret"}),
            Some(1346182810),
        )
        .unwrap();

        let authorization = header(&request, "X-PAYPAL-AUTHORIZATION").unwrap();
        assert!(authorization.starts_with("token=AA-token,signature="));
        assert!(authorization.ends_with(",timestamp=1346182810"));

        // The pair never reaches the wire body.
        assert!(!request.body.contains("token"));
        assert!(!request.body.contains("AA-secret"));
    }

    #[test]
    fn delegated_authorization_is_reproducible() {
        let build = || {
            build_request(
                &sandbox_config(),
                &test_credential(),
                "Permissions/GetBasicPersonalData",
                json!({"token": "AA-token", "tokenSecret": "AA-secret"}),
                Some(1346182810),
            )
            .unwrap()
        };
        let first = build();
        let second = build();
        assert_eq!(
            header(&first, "X-PAYPAL-AUTHORIZATION"),
            header(&second, "X-PAYPAL-AUTHORIZATION")
        );
    }

    #[test]
    fn no_authorization_header_without_token() {
        let request = build_request(
            &sandbox_config(),
            &test_credential(),
            "AdaptivePayments/Pay",
            json!({"payKey": "AP-1"}),
            None,
        )
        .unwrap();
        assert!(header(&request, "X-PAYPAL-AUTHORIZATION").is_none());
    }

    #[test]
    fn body_is_json_with_envelope() {
        let request = build_request(
            &sandbox_config(),
            &test_credential(),
            "AdaptivePayments/Pay",
            json!({"actionType": "PAY"}),
            None,
        )
        .unwrap();
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["actionType"], "PAY");
        assert_eq!(body["requestEnvelope"]["errorLanguage"], "en_US");
    }

    #[test]
    fn app_id_failure_propagates() {
        let config = ClientConfig::default(); // production, no app id
        let err = build_request(
            &config,
            &test_credential(),
            "AdaptivePayments/Pay",
            json!({}),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AdaptiveError::Config(_)));
    }

    #[test]
    fn non_json_format_requires_string_body() {
        let config = sandbox_config().with_formats("NV", "NV");
        let err = build_request(
            &config,
            &test_credential(),
            "AdaptivePayments/Pay",
            json!({"actionType": "PAY"}),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, AdaptiveError::Config(_)));

        let ok = build_request(
            &config,
            &test_credential(),
            "AdaptivePayments/Pay",
            json!("requestEnvelope.errorLanguage=en_US&actionType=PAY"),
            None,
        )
        .unwrap();
        assert_eq!(ok.body, "requestEnvelope.errorLanguage=en_US&actionType=PAY");
        assert_eq!(
            header(&ok, "Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
    }
}
