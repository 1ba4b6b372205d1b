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
mod aead;
mod certificate;
mod kdf;
mod key_agreement;
mod mac;
mod sign;

use openssl::bn::{BigNum, BigNumContext};
use openssl::ec::{EcGroup, EcKey, EcPoint};
use openssl::error::ErrorStack;
use openssl::nid::Nid;
use openssl::pkey::{PKey, Private, Public};
use strum_macros::Display;

use crate::common::constants::ec::{P256_COORDINATE_SIZE, P256_UNCOMPRESSED_POINT_SIZE};
use crate::crypto::CryptoBackend;
use crate::error::SupportError;

/// Represents an error caused by the OpenSSL cryptographic backend.
#[derive(Debug, Display)]
#[non_exhaustive]
pub enum OpensslBackendError {
    /// Standard OpenSSL error (represented as an [`ErrorStack`] in the openssl library crate).
    OpensslError(ErrorStack),
    /// Other error (error message is provided as a string).
    Other(&'static str),
}

impl From<ErrorStack> for OpensslBackendError {
    fn from(value: ErrorStack) -> Self {
        OpensslBackendError::OpensslError(value)
    }
}

impl From<ErrorStack> for SupportError<OpensslBackendError> {
    fn from(value: ErrorStack) -> Self {
        SupportError::Backend(value.into())
    }
}

/// Context for the OpenSSL cryptographic backend.
///
/// Can be used as a [`CryptoBackend`] for every operation of this crate.
///
/// Capability support:
/// - [x] Random number generation, SHA-256
/// - [x] AES-128-GCM
/// - [x] P-256 key generation and PKCS#8 (de-)serialization
///     - [x] Derive the public key from a raw private scalar
/// - [x] ECDSA with SHA-256 (sign/verify of precomputed digests)
/// - [x] ECDSA signature conversion between DER and COSE form
/// - [x] HMAC-SHA-256
/// - [x] HKDF-SHA-256
/// - [x] ECDH on P-256
/// - [x] X.509 certificate generation and verification
/// - [x] PKCS#12 creation
///
/// Elliptic Curve support:
/// - [x] P-256
/// - [ ] P-384
/// - [ ] P-521
#[derive(Default)]
pub struct OpensslContext {}

impl OpensslContext {
    /// Creates a new OpenSSL context.
    #[must_use]
    pub fn new() -> OpensslContext {
        OpensslContext {}
    }
}

impl CryptoBackend for OpensslContext {
    type Error = OpensslBackendError;

    fn generate_rand(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        openssl::rand::rand_bytes(buf).map_err(OpensslBackendError::from)
    }

    fn sha256(&mut self, data: &[u8]) -> Result<Vec<u8>, SupportError<Self::Error>> {
        Ok(openssl::sha::sha256(data).to_vec())
    }
}

/// Returns the [`EcGroup`] of the NIST P-256 curve.
fn p256_group() -> Result<EcGroup, ErrorStack> {
    EcGroup::from_curve_name(Nid::X9_62_PRIME256V1)
}

/// Parses an uncompressed P-256 point (`0x04 || X || Y`) into a public key.
fn p256_public_key(
    public_key: &[u8],
) -> Result<PKey<Public>, SupportError<OpensslBackendError>> {
    if public_key.len() != P256_UNCOMPRESSED_POINT_SIZE {
        return Err(SupportError::malformed(format!(
            "public key must be {P256_UNCOMPRESSED_POINT_SIZE} bytes, got {}",
            public_key.len()
        )));
    }
    let group = p256_group()?;
    let mut ctx = BigNumContext::new()?;
    let point = EcPoint::from_bytes(&group, public_key, &mut ctx)
        .map_err(|e| SupportError::malformed(format!("invalid P-256 public key: {e}")))?;
    let ec_key = EcKey::from_public_key(&group, &point)?;
    Ok(PKey::from_ec_key(ec_key)?)
}

/// Reconstructs a P-256 private key from its raw scalar, deriving the public point.
fn p256_private_key(
    private_key: &[u8],
) -> Result<EcKey<Private>, SupportError<OpensslBackendError>> {
    if private_key.len() != P256_COORDINATE_SIZE {
        return Err(SupportError::malformed(format!(
            "private key must be {P256_COORDINATE_SIZE} bytes, got {}",
            private_key.len()
        )));
    }
    let group = p256_group()?;
    let mut ctx = BigNumContext::new()?;
    let scalar = BigNum::from_slice(private_key)?;
    let mut order = BigNum::new()?;
    group.order(&mut order, &mut ctx)?;
    if scalar.num_bits() == 0 || scalar >= order {
        return Err(SupportError::malformed(
            "private key is not a valid P-256 scalar",
        ));
    }
    let mut point = EcPoint::new(&group)?;
    point.mul_generator2(&group, &scalar, &mut ctx)?;
    let ec_key = EcKey::from_private_components(&group, &scalar, &point)?;
    ec_key.check_key()?;
    Ok(ec_key)
}

/// Parses a PKCS#8 encoded P-256 key pair.
fn p256_key_pair(key_pair: &[u8]) -> Result<EcKey<Private>, SupportError<OpensslBackendError>> {
    let pkey = PKey::private_key_from_pkcs8(key_pair)
        .map_err(|e| SupportError::malformed(format!("invalid PKCS#8 key pair: {e}")))?;
    let ec_key = pkey
        .ec_key()
        .map_err(|e| SupportError::malformed(format!("key pair is not an EC key: {e}")))?;
    if ec_key.group().curve_name() != Some(Nid::X9_62_PRIME256V1) {
        return Err(SupportError::malformed("key pair is not on curve P-256"));
    }
    Ok(ec_key)
}

/// Encodes the public point of `ec_key` in uncompressed form.
fn p256_encode_point<T: openssl::pkey::HasPublic>(
    ec_key: &EcKey<T>,
) -> Result<Vec<u8>, SupportError<OpensslBackendError>> {
    let mut ctx = BigNumContext::new()?;
    Ok(ec_key.public_key().to_bytes(
        ec_key.group(),
        openssl::ec::PointConversionForm::UNCOMPRESSED,
        &mut ctx,
    )?)
}
