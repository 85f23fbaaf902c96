use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::keys::{EcdsaCurve, Key};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaSigningAlgorithm, UnparsedPublicKey};

/// ES256 algorithm (ECDSA with P-256 and SHA-256)
pub struct ES256;

/// ES384 algorithm (ECDSA with P-384 and SHA-384)
pub struct ES384;

/// ES512 algorithm (ECDSA with P-521 and SHA-512)
pub struct ES512;

/// Signing parameters for a curve
///
/// JWS signatures use the fixed-width `R || S` encoding (RFC 7518 §3.4),
/// not ASN.1 DER.
pub(crate) fn signing_algorithm(curve: EcdsaCurve) -> &'static EcdsaSigningAlgorithm {
    match curve {
        EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
        EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
        EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
    }
}

fn verification_algorithm(curve: EcdsaCurve) -> &'static dyn signature::VerificationAlgorithm {
    match curve {
        EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_FIXED,
        EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_FIXED,
        EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_FIXED,
    }
}

macro_rules! ecdsa_algorithm {
    ($alg:ident, $curve:expr) => {
        impl Algorithm for $alg {
            fn name(&self) -> &'static str {
                stringify!($alg)
            }

            fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
                sign_ecdsa(self.name(), signing_input, key, $curve)
            }

            fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
                verify_ecdsa(self.name(), signing_input, signature, key, $curve)
            }
        }
    };
}

ecdsa_algorithm!(ES256, EcdsaCurve::P256);
ecdsa_algorithm!(ES384, EcdsaCurve::P384);
ecdsa_algorithm!(ES512, EcdsaCurve::P521);

/// Verify curve matches algorithm
fn check_curve(name: &str, key: &Key, curve: EcdsaCurve) -> Result<()> {
    let actual = key.as_ecdsa()?.curve();
    if actual != curve {
        return Err(Error::KeyTypeMismatch {
            algorithm: name.to_string(),
            expected: format!("ECDSA {curve:?}"),
            actual: format!("ECDSA {actual:?}"),
        });
    }
    Ok(())
}

fn sign_ecdsa(name: &str, signing_input: &[u8], key: &Key, curve: EcdsaCurve) -> Result<Vec<u8>> {
    check_curve(name, key, curve)?;

    let key_pair = key.as_ecdsa()?.key_pair().ok_or_else(|| Error::KeyTypeMismatch {
        algorithm: name.to_string(),
        expected: "ECDSA private key".to_string(),
        actual: "ECDSA public key".to_string(),
    })?;

    let signature = key_pair
        .sign(&SystemRandom::new(), signing_input)
        .map_err(|_| Error::SigningFailed(format!("{name} signing failed")))?;

    Ok(signature.as_ref().to_vec())
}

fn verify_ecdsa(
    name: &str,
    signing_input: &[u8],
    signature: &[u8],
    key: &Key,
    curve: EcdsaCurve,
) -> Result<()> {
    check_curve(name, key, curve)?;

    UnparsedPublicKey::new(verification_algorithm(curve), key.as_ecdsa()?.public_point())
        .verify(signing_input, signature)
        .map_err(|_| Error::SignatureInvalid)
}
