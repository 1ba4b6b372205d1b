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
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use strum_macros::Display;

use crate::crypto::CryptoBackend;
use crate::error::SupportError;

#[cfg(rustcrypto_aead_base)]
mod aead;
#[cfg(rustcrypto_kdf_base)]
mod kdf;
#[cfg(rustcrypto_key_agreement_base)]
mod key_agreement;
#[cfg(rustcrypto_mac_base)]
mod mac;
#[cfg(rustcrypto_sign_base)]
mod sign;

#[derive(Debug, Display)]
#[non_exhaustive]
/// Errors that might be returned from the `RustCrypto` cryptographic backend.
pub enum RustCryptoBackendError {
    /// Provided parameter has invalid length.
    #[cfg(rustcrypto_mac_base)]
    InvalidLength(digest::InvalidLength),
    /// Error in ECDSA operation.
    #[cfg(rustcrypto_sign_base)]
    EcdsaError(ecdsa::Error),
    /// Error while encoding a key as PKCS#8.
    #[cfg(rustcrypto_sign_base)]
    Pkcs8Error(p256::pkcs8::Error),
    /// Other error (error message is provided as a string).
    Other(&'static str),
}

#[cfg(rustcrypto_mac_base)]
impl From<digest::InvalidLength> for SupportError<RustCryptoBackendError> {
    fn from(value: digest::InvalidLength) -> Self {
        SupportError::Backend(RustCryptoBackendError::InvalidLength(value))
    }
}

#[cfg(rustcrypto_sign_base)]
impl From<ecdsa::Error> for SupportError<RustCryptoBackendError> {
    fn from(value: ecdsa::Error) -> Self {
        SupportError::Backend(RustCryptoBackendError::EcdsaError(value))
    }
}

#[cfg(rustcrypto_sign_base)]
impl From<p256::pkcs8::Error> for SupportError<RustCryptoBackendError> {
    fn from(value: p256::pkcs8::Error) -> Self {
        SupportError::Backend(RustCryptoBackendError::Pkcs8Error(value))
    }
}

#[cfg(rustcrypto_aead_base)]
impl From<aes_gcm::aead::Error> for SupportError<RustCryptoBackendError> {
    fn from(_value: aes_gcm::aead::Error) -> Self {
        SupportError::verification("AES-GCM tag mismatch")
    }
}

/// Context for the RustCrypto cryptographic backend.
///
/// Can be used as a [`CryptoBackend`] for every operation of this crate except for X.509
/// certificate handling, which needs the OpenSSL backend.
///
/// Capability support (each one behind its own feature):
/// - [x] Random number generation, SHA-256
/// - [x] AES-128-GCM (`rustcrypto-aes-gcm`)
/// - [x] P-256 key generation and PKCS#8 (de-)serialization (`rustcrypto-ecdsa`)
/// - [x] ECDSA with SHA-256 and signature conversion (`rustcrypto-ecdsa`)
/// - [x] HMAC-SHA-256 (`rustcrypto-hmac`)
/// - [x] HKDF-SHA-256 (`rustcrypto-hkdf`)
/// - [x] ECDH on P-256 (`rustcrypto-ecdh`)
/// - [ ] X.509 certificate generation and verification
/// - [ ] PKCS#12 creation
pub struct RustCryptoContext<RNG: RngCore + CryptoRng> {
    rng: RNG,
}

impl<RNG: RngCore + CryptoRng> RustCryptoContext<RNG> {
    /// Creates a new RustCrypto context using the given random number generator `rng`.
    pub fn new(rng: RNG) -> RustCryptoContext<RNG> {
        RustCryptoContext { rng }
    }
}

impl<RNG: RngCore + CryptoRng> CryptoBackend for RustCryptoContext<RNG> {
    type Error = RustCryptoBackendError;

    fn generate_rand(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.rng.fill_bytes(buf);
        Ok(())
    }

    fn sha256(&mut self, data: &[u8]) -> Result<Vec<u8>, SupportError<Self::Error>> {
        Ok(Sha256::digest(data).to_vec())
    }
}

/// Parses an uncompressed P-256 point (`0x04 || X || Y`).
#[cfg(any(rustcrypto_sign_base, rustcrypto_key_agreement_base))]
fn p256_public_key(
    public_key: &[u8],
) -> Result<p256::PublicKey, SupportError<RustCryptoBackendError>> {
    use crate::common::constants::ec::{P256_UNCOMPRESSED_POINT_SIZE, SEC1_UNCOMPRESSED_TAG};

    if public_key.len() != P256_UNCOMPRESSED_POINT_SIZE
        || public_key.first() != Some(&SEC1_UNCOMPRESSED_TAG)
    {
        return Err(SupportError::malformed(format!(
            "public key must be an uncompressed point of {P256_UNCOMPRESSED_POINT_SIZE} bytes"
        )));
    }
    p256::PublicKey::from_sec1_bytes(public_key)
        .map_err(|e| SupportError::malformed(format!("invalid P-256 public key: {e}")))
}

/// Reconstructs a P-256 secret key from its raw 32 byte scalar.
#[cfg(any(rustcrypto_sign_base, rustcrypto_key_agreement_base))]
fn p256_secret_key(
    private_key: &[u8],
) -> Result<p256::SecretKey, SupportError<RustCryptoBackendError>> {
    use crate::common::constants::ec::P256_COORDINATE_SIZE;

    if private_key.len() != P256_COORDINATE_SIZE {
        return Err(SupportError::malformed(format!(
            "private key must be {P256_COORDINATE_SIZE} bytes, got {}",
            private_key.len()
        )));
    }
    // Rejects zero and scalars that are not smaller than the group order.
    p256::SecretKey::from_bytes(p256::FieldBytes::from_slice(private_key))
        .map_err(|_| SupportError::malformed("private key is not a valid P-256 scalar"))
}
