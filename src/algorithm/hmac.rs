use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HS256 algorithm (HMAC with SHA-256)
pub struct HS256;

/// HS384 algorithm (HMAC with SHA-384)
pub struct HS384;

/// HS512 algorithm (HMAC with SHA-512)
pub struct HS512;

macro_rules! hmac_algorithm {
    ($alg:ident, $digest:ty) => {
        impl Algorithm for $alg {
            fn name(&self) -> &'static str {
                stringify!($alg)
            }

            fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>> {
                let secret = secret_bytes(key)?;
                let mut mac =
                    Hmac::<$digest>::new_from_slice(secret).map_err(|_| Error::SignatureInvalid)?;
                mac.update(signing_input);
                Ok(mac.finalize().into_bytes().to_vec())
            }

            fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()> {
                let expected = self.sign(signing_input, key)?;

                if signature.len() != expected.len() {
                    return Err(Error::SignatureInvalid);
                }

                if constant_time_eq(signature, &expected) {
                    Ok(())
                } else {
                    Err(Error::SignatureInvalid)
                }
            }
        }
    };
}

hmac_algorithm!(HS256, Sha256);
hmac_algorithm!(HS384, Sha384);
hmac_algorithm!(HS512, Sha512);

fn secret_bytes(key: &Key) -> Result<&[u8]> {
    let secret = key.as_symmetric()?.as_bytes();
    if secret.is_empty() {
        return Err(Error::KeyRejected("HMAC secret is empty".to_string()));
    }
    Ok(secret)
}
