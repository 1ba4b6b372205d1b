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

//! Abstraction over the cryptographic library that performs the actual primitive operations.
//!
//! Every operation of this crate is generic over a backend implementing [`CryptoBackend`] and
//! the more specific traits for the operations it needs:
//! - [`AeadCryptoBackend`](crate::aead::AeadCryptoBackend) for AES-128-GCM,
//! - [`SignCryptoBackend`](crate::ec::SignCryptoBackend) for P-256 keys and ECDSA,
//! - [`MacCryptoBackend`](crate::cose::MacCryptoBackend) for HMAC-SHA-256,
//! - [`KdfCryptoBackend`](crate::key_agreement::KdfCryptoBackend) for HKDF-SHA-256,
//! - [`KeyAgreementCryptoBackend`](crate::key_agreement::KeyAgreementCryptoBackend) for ECDH,
//! - [`CertificateCryptoBackend`](crate::x509::CertificateCryptoBackend) for X.509 and PKCS#12.
//!
//! Two implementations are provided in [`crypto_impl`]: one based on OpenSSL (feature `openssl`,
//! enabled by default) and one based on the RustCrypto crates (features `rustcrypto-*`).
//! Backends keep no state between calls, apart from the random number generator.

use core::fmt::{Debug, Display};

use log::error;

use crate::error::SupportError;

pub mod crypto_impl;

/// Base trait for cryptographic backends.
pub trait CryptoBackend {
    /// Error type that this backend may return.
    type Error: Display + Debug;

    /// Fills the given buffer with random bytes from a cryptographically secure source.
    ///
    /// # Errors
    /// Returns the backend error if no random data could be generated.
    fn generate_rand(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Calculates the SHA-256 digest of `data`.
    ///
    /// # Errors
    /// Returns an error if the backend failed to compute the digest.
    fn sha256(&mut self, data: &[u8]) -> Result<Vec<u8>, SupportError<Self::Error>>;
}

/// Returns `num_bytes` random bytes generated by `backend`.
///
/// # Errors
/// Returns [`SupportError::Backend`] if the backend failed to generate random data.
pub fn get_random<B: CryptoBackend>(
    backend: &mut B,
    num_bytes: usize,
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let mut buf = vec![0u8; num_bytes];
    backend.generate_rand(&mut buf).map_err(|e| {
        error!("Error generating {num_bytes} random bytes: {e}");
        SupportError::Backend(e)
    })?;
    Ok(buf)
}

/// Calculates the SHA-256 digest of `data` using `backend`.
///
/// # Errors
/// Returns [`SupportError::Backend`] if the backend failed to compute the digest.
pub fn sha256<B: CryptoBackend>(
    backend: &mut B,
    data: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend.sha256(data)
}
