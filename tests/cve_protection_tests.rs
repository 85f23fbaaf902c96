//! Known JWT attack patterns
//!
//! - `alg: none` in every spelling (CVE-2015-9235 and friends)
//! - Signature stripping
//! - HS/RS algorithm confusion (CVE-2016-5431, CVE-2016-10555)
//! - Key-id tricks and policy downgrades

mod common;

use common::*;
use jwtkit::*;

fn payload() -> String {
    format!(
        r#"{{"iss":"{ISSUER}","aud":"{AUDIENCE}","sub":"admin","exp":{}}}"#,
        now() + 600
    )
}

fn hs256_params() -> ValidationParameters {
    standard_params().symmetric_key(Key::symmetric(SECRET))
}

fn rsa_params() -> ValidationParameters {
    standard_params().rsa_key(rsa_key().to_public())
}

fn validate(raw: &str, params: &ValidationParameters) -> ValidationResult {
    ClaimsValidator::default().validate_str(raw, params).unwrap()
}

// ============================================================================
// alg = none
// ============================================================================

#[test]
fn none_algorithm_rejected_in_every_spelling() {
    for alg in ["none", "None", "NONE", "nOnE", "none ", " none"] {
        let header = format!(r#"{{"alg":"{alg}","typ":"JWT"}}"#);

        let with_empty_signature = compact(&header, &payload(), b"");
        let two_segments = with_empty_signature.trim_end_matches('.').to_string();

        for raw in [&with_empty_signature, &two_segments] {
            let result = validate(raw, &hs256_params());
            assert!(!result.is_valid(), "alg {alg:?} accepted");
            assert_eq!(
                codes(&result),
                vec![ValidationErrorCode::InvalidSignature],
                "alg {alg:?}"
            );
        }
    }
}

#[test]
fn none_algorithm_rejected_even_when_unsigned_allowed_by_wrong_spelling() {
    let params = hs256_params().allow_unsigned_tokens(true);

    let canonical = compact(r#"{"alg":"none"}"#, &payload(), b"");
    assert!(validate(&canonical, &params).is_valid());

    for alg in ["None", "NONE", "nOnE"] {
        let raw = compact(&format!(r#"{{"alg":"{alg}"}}"#), &payload(), b"");
        assert!(!validate(&raw, &params).is_valid(), "alg {alg:?} accepted");
    }
}

#[test]
fn unsigned_token_with_signature_bytes_rejected() {
    let params = hs256_params().allow_unsigned_tokens(true);
    let raw = compact(r#"{"alg":"none"}"#, &payload(), b"sneaky");

    assert_eq!(
        codes(&validate(&raw, &params)),
        vec![ValidationErrorCode::InvalidSignature]
    );
}

#[test]
fn unsigned_token_needs_explicit_policy_entry() {
    let raw = TokenBuilder::default()
        .set_issuer(ISSUER)
        .set_audience(AUDIENCE)
        .set_expiration(now() + 60)
        .create_unsecured()
        .unwrap();

    let open = hs256_params().allow_unsigned_tokens(true);
    assert!(validate(&raw, &open).is_valid());

    let restricted = open.clone().algorithm_policy(AlgorithmPolicy::hs256_only());
    assert!(!validate(&raw, &restricted).is_valid());

    let listed = open.algorithm_policy(AlgorithmPolicy::allow_only(vec![
        AlgorithmId::HS256,
        AlgorithmId::None,
    ]));
    assert!(validate(&raw, &listed).is_valid());
}

#[test]
fn builder_refuses_to_sign_with_none() {
    let err = TokenBuilder::default()
        .sign(AlgorithmId::None, &Key::symmetric(SECRET))
        .unwrap_err();
    assert_eq!(err, Error::AlgorithmNoneRejected);
}

// ============================================================================
// Signature stripping
// ============================================================================

#[test]
fn stripped_signature_rejected() {
    let jwt = standard_builder()
        .sign_with_secret(AlgorithmId::HS256, SECRET)
        .unwrap();
    let signing_input = jwt.rsplit_once('.').unwrap().0;

    for raw in [format!("{signing_input}."), signing_input.to_string()] {
        assert_eq!(
            codes(&validate(&raw, &hs256_params())),
            vec![ValidationErrorCode::InvalidSignature],
            "{raw}"
        );
    }
}

#[test]
fn oversized_signature_rejected() {
    let raw = compact(r#"{"alg":"HS256"}"#, &payload(), &[0u8; 2048]);
    assert_eq!(
        codes(&validate(&raw, &hs256_params())),
        vec![ValidationErrorCode::InvalidSignature]
    );
}

// ============================================================================
// HS/RS algorithm confusion
// ============================================================================

#[test]
fn hs256_signed_with_rsa_public_key_rejected() {
    // The classic attack: use the published RSA key bytes as the HMAC secret
    let rsa_public = rsa_key().to_public();
    let public_der = rsa_public.as_rsa().unwrap().public_der().to_vec();

    let forged = TokenBuilder::default()
        .set_issuer(ISSUER)
        .set_audience(AUDIENCE)
        .set_subject("admin")
        .set_expiration(now() + 600)
        .sign_with_secret(AlgorithmId::HS256, &public_der)
        .unwrap();

    let result = validate(&forged, &rsa_params());
    assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidSignature]);
}

#[test]
fn rsa_key_never_used_as_hmac_secret() {
    let rsa_public = rsa_key().to_public();
    let public_der = rsa_public.as_rsa().unwrap().public_der().to_vec();

    let engine = SignatureEngine::new();
    let signing_input = b"header.payload";
    let mac = engine
        .sign(signing_input, AlgorithmId::HS256, &Key::symmetric(public_der))
        .unwrap();

    assert!(matches!(
        engine.verify_detailed(signing_input, &mac, AlgorithmId::HS256, &rsa_public),
        Err(Error::KeyTypeMismatch { .. })
    ));
}

#[test]
fn rs256_token_rejected_with_only_symmetric_key() {
    let jwt = standard_builder()
        .sign(AlgorithmId::RS256, &rsa_key())
        .unwrap();

    assert_eq!(
        codes(&validate(&jwt, &hs256_params())),
        vec![ValidationErrorCode::InvalidSignature]
    );
}

#[test]
fn es256_token_rejected_with_wrong_curve_key() {
    let p256 = ec_key(EcdsaCurve::P256);
    let p384 = ec_key(EcdsaCurve::P384);
    let jwt = standard_builder().sign(AlgorithmId::ES256, &p256).unwrap();

    let params = standard_params().ecdsa_key(p384.to_public());
    assert_eq!(
        codes(&validate(&jwt, &params)),
        vec![ValidationErrorCode::InvalidSignature]
    );
}

// ============================================================================
// Key-id tricks
// ============================================================================

#[test]
fn kid_pointing_at_wrong_family_key_rejected() {
    let jwt = standard_builder()
        .set_key_id("hmac-key")
        .sign(AlgorithmId::RS256, &rsa_key())
        .unwrap();

    let params = standard_params()
        .signing_key("hmac-key", Key::symmetric(SECRET))
        .signing_key("rsa-key", rsa_key().to_public());

    assert_eq!(
        codes(&validate(&jwt, &params)),
        vec![ValidationErrorCode::InvalidSignature]
    );
}

#[test]
fn kid_injection_strings_do_not_resolve() {
    let params = standard_params()
        .signing_key("primary", Key::symmetric(SECRET))
        .symmetric_key(Key::symmetric(SECRET));

    for kid in [
        "../../../../dev/null",
        "' OR '1'='1",
        "primary\u{0}",
        "PRIMARY",
        "",
    ] {
        let jwt = standard_builder()
            .set_key_id(kid)
            .sign_with_secret(AlgorithmId::HS256, SECRET)
            .unwrap();

        let result = validate(&jwt, &params);
        assert_eq!(
            codes(&result),
            vec![ValidationErrorCode::InvalidSignature],
            "kid {kid:?}"
        );
    }
}

#[test]
fn kid_selects_among_multiple_keys() {
    let other = b"another-secret-of-thirty-two-b!!";
    let params = standard_params()
        .signing_key("a", Key::symmetric(SECRET))
        .signing_key("b", Key::symmetric(other.as_slice()));

    let jwt = standard_builder()
        .set_key_id("b")
        .sign_with_secret(AlgorithmId::HS256, other)
        .unwrap();
    assert!(validate(&jwt, &params).is_valid());

    let mislabelled = standard_builder()
        .set_key_id("a")
        .sign_with_secret(AlgorithmId::HS256, other)
        .unwrap();
    assert!(!validate(&mislabelled, &params).is_valid());
}

// ============================================================================
// Policy downgrade
// ============================================================================

#[test]
fn policy_blocks_downgrade_to_weaker_family() {
    let jwt = standard_builder()
        .sign_with_secret(AlgorithmId::HS256, SECRET)
        .unwrap();

    let params = hs256_params().algorithm_policy(AlgorithmPolicy::recommended_asymmetric());
    let result = validate(&jwt, &params);

    assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidSignature]);
    assert_eq!(result.errors()[0].details(), Some(&ClaimValue::from("HS256")));
}

#[test]
fn non_string_alg_rejected() {
    for header in [r#"{"alg":256}"#, r#"{"alg":null}"#, r#"{"alg":["HS256"]}"#, r#"{}"#] {
        let raw = compact(header, &payload(), b"sig");
        assert_eq!(
            codes(&validate(&raw, &hs256_params())),
            vec![ValidationErrorCode::InvalidSignature],
            "{header}"
        );
    }
}

#[test]
fn unknown_algorithms_rejected() {
    for alg in ["HS1", "PS256", "EdDSA", "RS256 ", "hs256", "HS256HS256HS256HS256"] {
        let raw = compact(&format!(r#"{{"alg":"{alg}"}}"#), &payload(), b"sig");
        assert_eq!(
            codes(&validate(&raw, &hs256_params())),
            vec![ValidationErrorCode::InvalidSignature],
            "{alg}"
        );
    }
}
