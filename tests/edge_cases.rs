//! Malformed input handling
//!
//! Structural problems surface as `Err` from the parser and as a single
//! `InvalidToken` entry from the validators. Nothing here may panic.

mod common;

use common::*;
use jwtkit::*;

fn parse_err(raw: &str) -> Error {
    TokenParser::default().parse(raw).unwrap_err()
}

fn validate(raw: &str) -> ValidationResult {
    let params = standard_params().symmetric_key(Key::symmetric(SECRET));
    ClaimsValidator::default().validate_str(raw, &params).unwrap()
}

fn assert_invalid_token(raw: &str) {
    let err = parse_err(raw);
    assert!(err.is_structural(), "{raw:?} gave non-structural {err:?}");

    let result = validate(raw);
    assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidToken], "{raw:?}");
}

// ============================================================================
// Empty and whitespace
// ============================================================================

#[test]
fn empty_string_is_a_caller_error_for_validators() {
    let params = standard_params().symmetric_key(Key::symmetric(SECRET));
    assert!(matches!(
        ClaimsValidator::default().validate_str("", &params),
        Err(Error::InvalidArgument(_))
    ));
    assert!(ClaimsValidator::default().try_validate("", &params).is_none());
}

#[test]
fn empty_string_is_structural_for_parser() {
    assert!(matches!(parse_err(""), Error::FormatInvalid(_)));
}

#[test]
fn whitespace_only_rejected() {
    for raw in [" ", "\t", "\n", "   \r\n  "] {
        assert_invalid_token(raw);
    }
}

#[test]
fn surrounding_whitespace_not_trimmed() {
    let jwt = standard_builder()
        .sign_with_secret(AlgorithmId::HS256, SECRET)
        .unwrap();

    assert_invalid_token(&format!(" {jwt}"));
    assert_invalid_token(&format!("{jwt}\n"));
}

// ============================================================================
// Segment structure
// ============================================================================

#[test]
fn wrong_segment_counts_rejected() {
    let header = jwtkit::utils::base64url::encode(r#"{"alg":"HS256"}"#);
    let payload = jwtkit::utils::base64url::encode(r#"{"sub":"x"}"#);

    for raw in [
        header.clone(),
        format!("{header}.{payload}.sig.extra"),
        format!("{header}.{payload}.a.b.c"),
        "....".to_string(),
        ".".to_string(),
    ] {
        assert_invalid_token(&raw);
    }
}

#[test]
fn empty_header_or_payload_rejected() {
    let header = jwtkit::utils::base64url::encode(r#"{"alg":"HS256"}"#);
    let payload = jwtkit::utils::base64url::encode(r#"{"sub":"x"}"#);

    assert_invalid_token(&format!(".{payload}.c2ln"));
    assert_invalid_token(&format!("{header}..c2ln"));
    assert_invalid_token("..");
}

#[test]
fn two_segment_token_parses() {
    let raw = format!(
        "{}.{}",
        jwtkit::utils::base64url::encode(r#"{"alg":"none"}"#),
        jwtkit::utils::base64url::encode(r#"{"sub":"x"}"#)
    );
    let token = TokenParser::default().parse(&raw).unwrap();
    assert_eq!(token.signature_segment(), "");
    assert_eq!(token.subject(), Some("x"));
}

// ============================================================================
// Base64URL
// ============================================================================

#[test]
fn padding_rejected() {
    let header = jwtkit::utils::base64url::encode(r#"{"alg":"HS256"}"#);
    let payload = jwtkit::utils::base64url::encode(r#"{"sub":"x1"}"#);

    assert_invalid_token(&format!("{header}==.{payload}.c2ln"));
    assert_invalid_token(&format!("{header}.{payload}=.c2ln"));
    assert_invalid_token(&format!("{header}.{payload}.c2ln="));
}

#[test]
fn standard_alphabet_rejected() {
    // '+' and '/' belong to standard Base64, not Base64URL
    let payload = jwtkit::utils::base64url::encode(r#"{"sub":"x"}"#);
    assert_invalid_token(&format!("ab+/.{payload}.c2ln"));
    assert_invalid_token(&format!("eyJhbGciOiJIUzI1NiJ9.{payload}.ab+/"));
}

#[test]
fn invalid_characters_rejected() {
    for raw in ["a$b.c.d", "abc.d#f.ghi", "abc.def.g h", "🦀.🦀.🦀"] {
        assert_invalid_token(raw);
    }
}

// ============================================================================
// JSON content
// ============================================================================

#[test]
fn non_object_json_rejected() {
    let valid_payload = r#"{"sub":"x"}"#;

    for (header, payload) in [
        ("[]", valid_payload),
        ("\"HS256\"", valid_payload),
        ("42", valid_payload),
        ("null", valid_payload),
        (r#"{"alg":"HS256"}"#, "[1,2,3]"),
        (r#"{"alg":"HS256"}"#, "true"),
    ] {
        let raw = compact(header, payload, b"sig");
        assert!(
            matches!(parse_err(&raw), Error::FormatNotAnObject { .. }),
            "{header} / {payload}"
        );
        assert_eq!(codes(&validate(&raw)), vec![ValidationErrorCode::InvalidToken]);
    }
}

#[test]
fn malformed_json_rejected() {
    for json in ["{", "{\"alg\":}", "{'alg':'HS256'}", "not json"] {
        let raw = compact(json, r#"{"sub":"x"}"#, b"sig");
        assert!(
            matches!(parse_err(&raw), Error::FormatInvalidJson(_)),
            "{json}"
        );
    }
}

#[test]
fn deeply_nested_json_rejected() {
    let nested = |levels: usize| {
        format!(r#"{{"sub":"x","a":{}{}}}"#, "[".repeat(levels), "]".repeat(levels))
    };

    // Well under the default size limit
    let raw = compact(r#"{"alg":"HS256"}"#, &nested(2_700), b"sig");
    assert!(raw.len() < 8192);
    assert!(matches!(parse_err(&raw), Error::FormatInvalidJson(_)));
    assert_eq!(codes(&validate(&raw)), vec![ValidationErrorCode::InvalidToken]);

    let raw = compact(r#"{"alg":"HS256"}"#, &nested(11_000), b"sig");
    let err = TokenParser::default()
        .with_max_token_size(64 * 1024)
        .parse(&raw)
        .unwrap_err();
    assert!(matches!(err, Error::FormatInvalidJson(_)));

    let raw = compact(r#"{"alg":"HS256"}"#, &nested(16), b"sig");
    assert!(TokenParser::default().parse(&raw).is_ok());
}

#[test]
fn invalid_utf8_rejected() {
    let header = jwtkit::utils::base64url::encode_bytes(&[0xff, 0xfe, 0xfd]);
    let payload = jwtkit::utils::base64url::encode(r#"{"sub":"x"}"#);
    assert_invalid_token(&format!("{header}.{payload}.c2ln"));
}

#[test]
fn wrongly_typed_registered_claims_reported() {
    let raw = TokenBuilder::default()
        .add_claim("iss", 42)
        .add_claim("aud", ISSUER)
        .add_claim("exp", "tomorrow")
        .sign_with_secret(AlgorithmId::HS256, SECRET)
        .unwrap();

    let token = TokenParser::default().parse(&raw).unwrap();
    assert_eq!(token.issuer(), None);
    assert_eq!(token.expiration(), None);
    // Typed access coerces where a conversion is defined, and fails otherwise
    assert_eq!(token.get_claim::<String>("iss").unwrap(), "42");
    assert!(matches!(
        token.get_claim::<i64>("exp"),
        Err(Error::ClaimConversion { .. })
    ));

    assert_eq!(
        codes(&validate(&raw)),
        vec![
            ValidationErrorCode::InvalidClaimValue,
            ValidationErrorCode::InvalidIssuer,
            ValidationErrorCode::InvalidAudience
        ]
    );
}

// ============================================================================
// Size limits
// ============================================================================

#[test]
fn oversized_token_rejected_before_decoding() {
    // Not even valid Base64URL: the size check must fire first
    let raw = "!".repeat(8193);
    assert!(matches!(
        parse_err(&raw),
        Error::TokenTooLarge { size: 8193, max: 8192 }
    ));
    assert_eq!(codes(&validate(&raw)), vec![ValidationErrorCode::InvalidToken]);
}

#[test]
fn size_limit_follows_parameters() {
    let jwt = standard_builder()
        .add_claim("padding", "x".repeat(600))
        .sign_with_secret(AlgorithmId::HS256, SECRET)
        .unwrap();

    let roomy = standard_params().symmetric_key(Key::symmetric(SECRET));
    assert!(ClaimsValidator::default()
        .validate_str(&jwt, &roomy)
        .unwrap()
        .is_valid());

    let tight = roomy.max_token_size(512);
    let result = ClaimsValidator::default().validate_str(&jwt, &tight).unwrap();
    assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidToken]);
}

#[test]
fn large_but_allowed_token_parses() {
    let jwt = standard_builder()
        .add_claim("blob", "y".repeat(4000))
        .sign_with_secret(AlgorithmId::HS256, SECRET)
        .unwrap();
    assert!(jwt.len() < 8192);

    let token = TokenParser::default().parse(&jwt).unwrap();
    assert_eq!(token.get_claim::<String>("blob").unwrap().len(), 4000);
}
