//! Tests for the relay/verifier wire contract

use persona_core::{Audience, VerificationOutcome, VerifierResponse, RELAY_INTERNAL_ERROR};
use serde_json::json;

/// Test: real verifier responses carry extra fields that must be tolerated
#[test]
fn test_verifier_response_with_extra_fields() {
    let body = json!({
        "status": "okay",
        "email": "user@example.com",
        "audience": "http://127.0.0.1:3000",
        "expires": 1_700_000_000_000_i64,
        "issuer": "login.persona.org",
        "idpClaims": {}
    })
    .to_string();

    let response: VerifierResponse = serde_json::from_str(&body).unwrap();
    assert!(response.is_okay());
    assert_eq!(response.issuer.as_deref(), Some("login.persona.org"));

    let outcome = VerificationOutcome::from_response(response).unwrap();
    assert_eq!(outcome.email(), Some("user@example.com"));
}

/// Test: status is compared exactly
#[test]
fn test_status_is_case_sensitive() {
    let outcome =
        VerificationOutcome::from_verifier_body(r#"{"status":"OKAY","email":"user@example.com"}"#)
            .unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Rejected {
            reason: String::new()
        }
    );
}

/// Test: failure responses round out to the documented JSON shape
#[test]
fn test_failure_serialization_omits_success_fields() {
    let value = serde_json::to_value(VerifierResponse::failure("expired assertion")).unwrap();
    assert_eq!(
        value,
        json!({ "status": "failure", "reason": "expired assertion" })
    );
}

/// Test: audiences deserialize through the same canonicalization
#[test]
fn test_audience_serde() {
    let audience: Audience = serde_json::from_str(r#""https://app.example.com/login""#).unwrap();
    assert_eq!(audience.as_str(), "https://app.example.com");
    assert_eq!(
        serde_json::to_string(&audience).unwrap(),
        r#""https://app.example.com""#
    );

    assert!(serde_json::from_str::<Audience>(r#""app.example.com""#).is_err());
}

/// Test: the internal error message never mentions parser details
#[test]
fn test_internal_error_message_is_fixed() {
    assert!(!RELAY_INTERNAL_ERROR.contains("JSON"));
    assert!(!RELAY_INTERNAL_ERROR.is_empty());
}
