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

//! P-256 key handling, ECDSA and the conversion of ECDSA signatures between DER and COSE form.
//!
//! Key pairs are passed around as PKCS#8 `PrivateKeyInfo` DER blobs, public keys as 65 byte
//! uncompressed points (`0x04 || X || Y`) and private keys as 32 byte big-endian scalars.

use core::convert::Infallible;

use log::error;

use crate::common::constants::cose::ECDSA_SIGNATURE_SIZE;
use crate::common::constants::ec::{
    P256_COORDINATE_SIZE, P256_UNCOMPRESSED_POINT_SIZE, SEC1_UNCOMPRESSED_TAG,
    SHA256_DIGEST_SIZE,
};
use crate::crypto::CryptoBackend;
use crate::error::SupportError;


/// Provides basic operations for P-256 keys and ECDSA with SHA-256.
pub trait SignCryptoBackend: CryptoBackend {
    /// Generates a fresh P-256 key pair and returns it as PKCS#8 DER.
    ///
    /// # Errors
    /// Returns an error if the backend failed to generate the key.
    fn generate_ec_key_pair(&mut self) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Returns the uncompressed public point of a PKCS#8 encoded key pair.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if `key_pair` is not a PKCS#8 P-256 key.
    fn ec_key_pair_public_key(
        &mut self,
        key_pair: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Returns the 32 byte private scalar of a PKCS#8 encoded key pair.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if `key_pair` is not a PKCS#8 P-256 key.
    fn ec_key_pair_private_key(
        &mut self,
        key_pair: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Builds a PKCS#8 key pair from a raw 32 byte private scalar.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if `private_key` is not a valid P-256 scalar.
    fn ec_private_key_to_key_pair(
        &mut self,
        private_key: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Signs a precomputed SHA-256 `digest` and returns the DER encoded signature.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] for an invalid key pair.
    fn sign_ecdsa_digest(
        &mut self,
        key_pair: &[u8],
        digest: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Checks a DER encoded signature over `digest`.
    ///
    /// A signature that does not verify or can't be parsed yields `Ok(false)`.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if `public_key` is not a valid P-256 point.
    fn verify_ecdsa_digest(
        &mut self,
        public_key: &[u8],
        digest: &[u8],
        der_signature: &[u8],
    ) -> Result<bool, SupportError<Self::Error>>;

    /// Converts a DER encoded signature to the 64 byte `r || s` form.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if the signature isn't valid DER or one of its
    /// integers is wider than 32 bytes.
    fn ecdsa_der_to_cose(
        &mut self,
        der_signature: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Converts a 64 byte `r || s` signature to DER.
    ///
    /// Implementations may assume that `cose_signature` is exactly 64 bytes long.
    ///
    /// # Errors
    /// Returns an error if the backend failed to encode the signature.
    fn ecdsa_cose_to_der(
        &mut self,
        cose_signature: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;
}

/// Generates a new P-256 key pair, encoded as PKCS#8 `PrivateKeyInfo`.
///
/// # Errors
/// Returns [`SupportError::Backend`] if key generation failed.
pub fn create_ec_key_pair<B: SignCryptoBackend>(
    backend: &mut B,
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend.generate_ec_key_pair().map_err(|e| {
        error!("Error generating EC key pair: {e}");
        e
    })
}

/// Returns the 65 byte uncompressed public key of `key_pair`.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `key_pair` is not a PKCS#8 encoded P-256 key.
pub fn ec_key_pair_get_public_key<B: SignCryptoBackend>(
    backend: &mut B,
    key_pair: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend.ec_key_pair_public_key(key_pair).map_err(|e| {
        error!("Error getting public key from key pair: {e}");
        e
    })
}

/// Returns the 32 byte private scalar of `key_pair`, left-padded with zeros.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `key_pair` is not a PKCS#8 encoded P-256 key.
pub fn ec_key_pair_get_private_key<B: SignCryptoBackend>(
    backend: &mut B,
    key_pair: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend.ec_key_pair_private_key(key_pair).map_err(|e| {
        error!("Error getting private key from key pair: {e}");
        e
    })
}

/// Turns a raw 32 byte private scalar into a PKCS#8 key pair, deriving the public point.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `private_key` isn't 32 bytes long, is zero, or is
/// not smaller than the order of P-256.
pub fn ec_private_key_to_key_pair<B: SignCryptoBackend>(
    backend: &mut B,
    private_key: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend.ec_private_key_to_key_pair(private_key).map_err(|e| {
        error!("Error converting private key to key pair: {e}");
        e
    })
}

/// Signs SHA-256(`data`) with `key_pair` and returns the DER encoded ECDSA signature.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] for an invalid key pair.
pub fn sign_ecdsa<B: SignCryptoBackend>(
    backend: &mut B,
    key_pair: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let digest = backend.sha256(data)?;
    sign_ecdsa_digest(backend, key_pair, &digest)
}

/// Signs a precomputed SHA-256 `digest` with `key_pair` and returns the DER encoded signature.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `digest` is not 32 bytes long or the key pair is
/// invalid.
pub fn sign_ecdsa_digest<B: SignCryptoBackend>(
    backend: &mut B,
    key_pair: &[u8],
    digest: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    check_digest(digest)?;
    backend.sign_ecdsa_digest(key_pair, digest).map_err(|e| {
        error!("Error signing digest: {e}");
        e
    })
}

/// Checks that `der_signature` is a valid signature over `digest` for `public_key`.
///
/// Returns `Ok(false)` if the signature does not verify, including when it is not valid DER.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `digest` is not 32 bytes long or `public_key` is
/// not a valid uncompressed P-256 point.
pub fn check_ecdsa_signature<B: SignCryptoBackend>(
    backend: &mut B,
    digest: &[u8],
    der_signature: &[u8],
    public_key: &[u8],
) -> Result<bool, SupportError<B::Error>> {
    check_digest(digest)?;
    let valid = backend
        .verify_ecdsa_digest(public_key, digest, der_signature)
        .map_err(|e| {
            error!("Error checking ECDSA signature: {e}");
            e
        })?;
    if !valid {
        error!("ECDSA signature does not verify");
    }
    Ok(valid)
}

/// Splits an uncompressed P-256 public key into its X and Y coordinates.
///
/// Leading zero bytes are stripped from both coordinates.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `public_key` is not 65 bytes long or does not
/// start with `0x04`.
pub fn ec_public_key_get_x_and_y(
    public_key: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), SupportError<Infallible>> {
    if public_key.len() != P256_UNCOMPRESSED_POINT_SIZE
        || public_key[0] != SEC1_UNCOMPRESSED_TAG
    {
        error!("Public key is not an uncompressed P-256 point");
        return Err(SupportError::malformed(
            "public key is not an uncompressed P-256 point",
        ));
    }
    let (x, y) = public_key[1..].split_at(P256_COORDINATE_SIZE);
    Ok((strip_leading_zeros(x), strip_leading_zeros(y)))
}

fn strip_leading_zeros(value: &[u8]) -> Vec<u8> {
    let first = value.iter().position(|b| *b != 0).unwrap_or(value.len());
    value[first..].to_vec()
}

/// Converts a DER encoded ECDSA signature into the 64 byte `r || s` form used by COSE.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the signature is not valid DER or an integer does
/// not fit into 32 bytes.
pub fn ecdsa_signature_der_to_cose<B: SignCryptoBackend>(
    backend: &mut B,
    der_signature: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend.ecdsa_der_to_cose(der_signature).map_err(|e| {
        error!("Error converting DER signature to COSE: {e}");
        e
    })
}

/// Converts a 64 byte `r || s` ECDSA signature into DER.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `cose_signature` is not exactly 64 bytes long.
pub fn ecdsa_signature_cose_to_der<B: SignCryptoBackend>(
    backend: &mut B,
    cose_signature: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    if cose_signature.len() != ECDSA_SIGNATURE_SIZE {
        error!(
            "COSE signature must be {ECDSA_SIGNATURE_SIZE} bytes, got {}",
            cose_signature.len()
        );
        return Err(SupportError::malformed(format!(
            "COSE signature must be {ECDSA_SIGNATURE_SIZE} bytes, got {}",
            cose_signature.len()
        )));
    }
    backend.ecdsa_cose_to_der(cose_signature).map_err(|e| {
        error!("Error converting COSE signature to DER: {e}");
        e
    })
}

fn check_digest<T>(digest: &[u8]) -> Result<(), SupportError<T>> {
    if digest.len() == SHA256_DIGEST_SIZE {
        Ok(())
    } else {
        error!(
            "Digest must be {SHA256_DIGEST_SIZE} bytes, got {}",
            digest.len()
        );
        Err(SupportError::malformed(format!(
            "digest must be {SHA256_DIGEST_SIZE} bytes, got {}",
            digest.len()
        )))
    }
}
