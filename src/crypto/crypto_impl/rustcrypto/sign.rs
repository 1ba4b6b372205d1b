/*
 * Copyright (c) 2024 The NAMIB Project Developers.
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */
use ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use log::{debug, error};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use p256::SecretKey;
use rand::{CryptoRng, RngCore};

use crate::ec::SignCryptoBackend;
use crate::error::SupportError;

use super::{p256_public_key, p256_secret_key, RustCryptoBackendError, RustCryptoContext};

/// Parses a PKCS#8 encoded P-256 key pair.
fn p256_key_pair(key_pair: &[u8]) -> Result<SecretKey, SupportError<RustCryptoBackendError>> {
    SecretKey::from_pkcs8_der(key_pair)
        .map_err(|e| SupportError::malformed(format!("invalid PKCS#8 P-256 key pair: {e}")))
}

fn encode_key_pair(
    secret_key: &SecretKey,
) -> Result<Vec<u8>, SupportError<RustCryptoBackendError>> {
    Ok(secret_key.to_pkcs8_der()?.as_bytes().to_vec())
}

impl<RNG: RngCore + CryptoRng> SignCryptoBackend for RustCryptoContext<RNG> {
    fn generate_ec_key_pair(&mut self) -> Result<Vec<u8>, SupportError<Self::Error>> {
        encode_key_pair(&SecretKey::random(&mut self.rng))
    }

    fn ec_key_pair_public_key(
        &mut self,
        key_pair: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let secret_key = p256_key_pair(key_pair)?;
        Ok(secret_key.public_key().to_sec1_bytes().to_vec())
    }

    fn ec_key_pair_private_key(
        &mut self,
        key_pair: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        Ok(p256_key_pair(key_pair)?.to_bytes().to_vec())
    }

    fn ec_private_key_to_key_pair(
        &mut self,
        private_key: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        encode_key_pair(&p256_secret_key(private_key)?)
    }

    fn sign_ecdsa_digest(
        &mut self,
        key_pair: &[u8],
        digest: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let signing_key = SigningKey::from(p256_key_pair(key_pair)?);
        let signature: Signature = signing_key.sign_prehash(digest)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn verify_ecdsa_digest(
        &mut self,
        public_key: &[u8],
        digest: &[u8],
        der_signature: &[u8],
    ) -> Result<bool, SupportError<Self::Error>> {
        let verifying_key = VerifyingKey::from(p256_public_key(public_key)?);
        let signature = match Signature::from_der(der_signature) {
            Ok(signature) => signature,
            Err(e) => {
                error!("ECDSA signature is not valid DER: {e}");
                return Ok(false);
            }
        };
        match verifying_key.verify_prehash(digest, &signature) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!("ECDSA verification rejected the signature: {e}");
                Ok(false)
            }
        }
    }

    fn ecdsa_der_to_cose(
        &mut self,
        der_signature: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let signature = Signature::from_der(der_signature)
            .map_err(|e| SupportError::malformed(format!("invalid DER ECDSA signature: {e}")))?;
        // See RFC 8152, section 8.1
        Ok(signature.to_bytes().to_vec())
    }

    fn ecdsa_cose_to_der(
        &mut self,
        cose_signature: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        // Unlike OpenSSL, RustCrypto refuses to represent r or s outside of [1, n - 1].
        let signature = Signature::from_slice(cose_signature).map_err(|e| {
            SupportError::malformed(format!("COSE signature is not a valid P-256 signature: {e}"))
        })?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}
