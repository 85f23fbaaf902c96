use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::keys::Key;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaEncoding, UnparsedPublicKey};

/// RS256 algorithm (RSA PKCS#1 v1.5 with SHA-256)
pub struct RS256;

/// RS384 algorithm (RSA PKCS#1 v1.5 with SHA-384)
pub struct RS384;

/// RS512 algorithm (RSA PKCS#1 v1.5 with SHA-512)
pub struct RS512;

macro_rules! rsa_algorithm {
    ($alg:ident, $signing:expr, $verification:expr) => {
        impl Algorithm for $alg {
            fn name(&self) -> &'static str {
                stringify!($alg)
            }

            fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
                sign_rsa(self.name(), signing_input, key, $signing)
            }

            fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
                verify_rsa(signing_input, signature, key, $verification)
            }
        }
    };
}

rsa_algorithm!(
    RS256,
    &signature::RSA_PKCS1_SHA256,
    &signature::RSA_PKCS1_2048_8192_SHA256
);
rsa_algorithm!(
    RS384,
    &signature::RSA_PKCS1_SHA384,
    &signature::RSA_PKCS1_2048_8192_SHA384
);
rsa_algorithm!(
    RS512,
    &signature::RSA_PKCS1_SHA512,
    &signature::RSA_PKCS1_2048_8192_SHA512
);

/// Generic RSA signing
fn sign_rsa(
    name: &str,
    signing_input: &[u8],
    key: &Key,
    encoding: &'static dyn RsaEncoding,
) -> Result<Vec<u8>> {
    let rsa_key = key.as_rsa()?;
    let key_pair = rsa_key.key_pair().ok_or_else(|| Error::KeyTypeMismatch {
        algorithm: name.to_string(),
        expected: "RSA private key".to_string(),
        actual: "RSA public key".to_string(),
    })?;

    let mut signature = vec![0u8; key_pair.public_modulus_len()];
    key_pair
        .sign(encoding, &SystemRandom::new(), signing_input, &mut signature)
        .map_err(|_| Error::SigningFailed(format!("{name} signing failed")))?;

    Ok(signature)
}

/// Generic RSA signature verification
fn verify_rsa(
    signing_input: &[u8],
    signature: &[u8],
    key: &Key,
    algorithm: &'static dyn signature::VerificationAlgorithm,
) -> Result<()> {
    let rsa_key = key.as_rsa()?;

    UnparsedPublicKey::new(algorithm, rsa_key.public_der())
        .verify(signing_input, signature)
        .map_err(|_| Error::SignatureInvalid)
}
