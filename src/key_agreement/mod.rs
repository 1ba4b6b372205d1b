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

//! ECDH on P-256 and HKDF with SHA-256, used to derive session keys.

use log::error;

use crate::common::constants::ec::SHA256_DIGEST_SIZE;
use crate::crypto::CryptoBackend;
use crate::error::SupportError;


/// Largest output HKDF-SHA-256 can produce (RFC 5869, section 2.3).
pub const HKDF_SHA256_MAX_OUTPUT_SIZE: usize = 255 * SHA256_DIGEST_SIZE;

/// Provides HKDF with SHA-256.
pub trait KdfCryptoBackend: CryptoBackend {
    /// Extracts a pseudorandom key from `ikm` and `salt` and expands it with `info` to `size`
    /// bytes.
    ///
    /// An empty `salt` stands for the default salt of zeros. Implementations may assume that
    /// `size` is between 1 and [`HKDF_SHA256_MAX_OUTPUT_SIZE`].
    ///
    /// # Errors
    /// Returns an error if the backend failed to derive the key.
    fn hkdf_sha256(
        &mut self,
        ikm: &[u8],
        salt: &[u8],
        info: &[u8],
        size: usize,
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;
}

/// Provides elliptic curve Diffie-Hellman on P-256.
pub trait KeyAgreementCryptoBackend: CryptoBackend {
    /// Computes the shared secret (the X coordinate of the shared point) from an uncompressed
    /// `public_key` and a raw 32 byte `private_key`.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if one of the keys is invalid.
    fn ecdh_p256(
        &mut self,
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;
}

/// Computes the ECDH shared secret between `public_key` (65 bytes, uncompressed) and
/// `private_key` (32 byte scalar).
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if either key is not a valid P-256 key.
pub fn ecdh<B: KeyAgreementCryptoBackend>(
    backend: &mut B,
    public_key: &[u8],
    private_key: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend.ecdh_p256(public_key, private_key).map_err(|e| {
        error!("Error performing ECDH: {e}");
        e
    })
}

/// Derives `size` bytes from `shared_secret` with HKDF-SHA-256.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `size` is zero or larger than
/// [`HKDF_SHA256_MAX_OUTPUT_SIZE`].
pub fn hkdf<B: KdfCryptoBackend>(
    backend: &mut B,
    shared_secret: &[u8],
    salt: &[u8],
    info: &[u8],
    size: usize,
) -> Result<Vec<u8>, SupportError<B::Error>> {
    if size == 0 || size > HKDF_SHA256_MAX_OUTPUT_SIZE {
        error!("Invalid HKDF output size {size}");
        return Err(SupportError::malformed(format!(
            "HKDF output size must be between 1 and {HKDF_SHA256_MAX_OUTPUT_SIZE}, got {size}"
        )));
    }
    backend
        .hkdf_sha256(shared_secret, salt, info, size)
        .map_err(|e| {
            error!("Error performing HKDF: {e}");
            e
        })
}
