//! Individual claim checks
//!
//! Each check reads the token through the context and appends what it finds
//! wrong. Checks never stop the run; the validator calls all enabled ones.

use crate::claims::{header, registered};
use crate::json::ClaimValue;
use crate::validation::{ValidationContext, ValidationError, ValidationErrorCode};

fn skew_seconds(ctx: &ValidationContext<'_>) -> i64 {
    i64::try_from(ctx.parameters.clock_skew.as_secs()).unwrap_or(i64::MAX)
}

/// Read a NumericDate claim; `Err` carries the error for a non-numeric value
fn numeric_date(
    ctx: &ValidationContext<'_>,
    name: &str,
) -> Option<std::result::Result<i64, ValidationError>> {
    let value = ctx.token.claim_value(name)?;
    Some(value.as_numeric_date().ok_or_else(|| {
        ValidationError::new(
            ValidationErrorCode::InvalidClaimValue,
            format!("Claim '{name}' must be a NumericDate, found {}", value.kind()),
        )
        .with_details(value.clone())
    }))
}

/// `exp` (required) and `nbf` (optional)
pub(crate) fn check_lifetime(ctx: &ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let skew = skew_seconds(ctx);

    match numeric_date(ctx, registered::EXPIRATION) {
        None => errors.push(ValidationError::new(
            ValidationErrorCode::MissingClaim,
            "Token has no expiration (exp) claim",
        )),
        Some(Err(error)) => errors.push(error),
        Some(Ok(exp)) => {
            if ctx.now.saturating_sub(skew) > exp {
                errors.push(
                    ValidationError::new(
                        ValidationErrorCode::TokenExpired,
                        format!("Token expired at {exp} (now: {}, skew: {skew}s)", ctx.now),
                    )
                    .with_details(exp),
                );
            }
        }
    }

    match numeric_date(ctx, registered::NOT_BEFORE) {
        None => {}
        Some(Err(error)) => errors.push(error),
        Some(Ok(nbf)) => {
            if ctx.now.saturating_add(skew) < nbf {
                errors.push(
                    ValidationError::new(
                        ValidationErrorCode::TokenNotYetValid,
                        format!("Token not valid before {nbf} (now: {}, skew: {skew}s)", ctx.now),
                    )
                    .with_details(nbf),
                );
            }
        }
    }
}

/// `iat` must not lie in the future and, if bounded, not too far in the past
pub(crate) fn check_issued_at(ctx: &ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let skew = skew_seconds(ctx);
    let max_age = ctx.parameters.max_token_age;

    let iat = match numeric_date(ctx, registered::ISSUED_AT) {
        None => {
            if max_age.is_some() {
                errors.push(ValidationError::new(
                    ValidationErrorCode::MissingClaim,
                    "Token has no issued-at (iat) claim",
                ));
            }
            return;
        }
        Some(Err(error)) => {
            errors.push(error);
            return;
        }
        Some(Ok(iat)) => iat,
    };

    if iat > ctx.now.saturating_add(skew) {
        errors.push(
            ValidationError::new(
                ValidationErrorCode::InvalidClaimValue,
                format!("Token issued in the future at {iat} (now: {})", ctx.now),
            )
            .with_details(iat),
        );
        return;
    }

    if let Some(max_age) = max_age {
        let max_age = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
        if ctx.now.saturating_sub(skew) > iat.saturating_add(max_age) {
            errors.push(
                ValidationError::new(
                    ValidationErrorCode::TokenExpired,
                    format!("Token issued at {iat} exceeds maximum age of {max_age}s"),
                )
                .with_details(iat),
            );
        }
    }
}

pub(crate) fn check_issuer(ctx: &ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let params = ctx.parameters;
    let accepted: Vec<&str> = params
        .valid_issuer
        .iter()
        .chain(params.valid_issuers.iter())
        .map(String::as_str)
        .collect();

    if accepted.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorCode::InvalidIssuer,
            "Issuer validation is enabled but no valid issuers are configured",
        ));
        return;
    }

    match ctx.token.issuer() {
        None => errors.push(ValidationError::new(
            ValidationErrorCode::InvalidIssuer,
            "Token has no issuer (iss) claim",
        )),
        Some(iss) if accepted.contains(&iss) => {}
        Some(iss) => errors.push(
            ValidationError::new(
                ValidationErrorCode::InvalidIssuer,
                format!("Issuer '{iss}' is not trusted"),
            )
            .with_details(iss),
        ),
    }
}

pub(crate) fn check_audience(ctx: &ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let params = ctx.parameters;
    let accepted: Vec<&str> = params
        .valid_audience
        .iter()
        .chain(params.valid_audiences.iter())
        .map(String::as_str)
        .collect();

    if accepted.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorCode::InvalidAudience,
            "Audience validation is enabled but no valid audiences are configured",
        ));
        return;
    }

    let audiences = ctx.token.audiences();
    if audiences.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorCode::InvalidAudience,
            "Token has no audience (aud) claim",
        ));
        return;
    }

    if !audiences.iter().any(|aud| accepted.contains(aud)) {
        errors.push(
            ValidationError::new(
                ValidationErrorCode::InvalidAudience,
                format!("Audience {audiences:?} does not match any accepted audience"),
            )
            .with_details(audiences),
        );
    }
}

/// Header `typ` must equal the required value exactly
pub(crate) fn check_token_type(ctx: &ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let required = ctx.parameters.required_token_type.as_str();
    match ctx.token.token_type() {
        Some(typ) if typ == required => {}
        found => errors.push(
            ValidationError::new(
                ValidationErrorCode::InvalidToken,
                format!("Token type must be '{required}', found {found:?}"),
            )
            .with_details(ctx.token.header_value(header::TOKEN_TYPE).cloned()),
        ),
    }
}

pub(crate) fn check_replay(ctx: &ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let jti = match ctx.token.jwt_id() {
        Some(jti) if !jti.is_empty() => jti,
        _ => {
            errors.push(ValidationError::new(
                ValidationErrorCode::JtiMissing,
                "Token has no JWT ID (jti) claim",
            ));
            return;
        }
    };

    if let Some(check) = &ctx.parameters.replay_check {
        if !check(jti) {
            errors.push(
                ValidationError::new(
                    ValidationErrorCode::JtiAlreadyUsed,
                    format!("JWT ID '{jti}' has already been used"),
                )
                .with_details(jti),
            );
        }
    }
}

/// Runs only when a confirmation callback is configured and `cnf` is present
pub(crate) fn check_confirmation(ctx: &ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let (Some(check), Some(cnf)) = (
        &ctx.parameters.confirmation_check,
        ctx.token.claim_value(registered::CONFIRMATION),
    ) else {
        return;
    };

    match cnf {
        ClaimValue::Object(map) if check(map) => {}
        ClaimValue::Object(_) => errors.push(ValidationError::new(
            ValidationErrorCode::InvalidClaimValue,
            "Confirmation (cnf) claim was rejected",
        )),
        other => errors.push(
            ValidationError::new(
                ValidationErrorCode::InvalidClaimValue,
                format!("Confirmation (cnf) claim must be an object, found {}", other.kind()),
            )
            .with_details(other.clone()),
        ),
    }
}
