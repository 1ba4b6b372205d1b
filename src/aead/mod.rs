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

//! AES-128-GCM authenticated encryption with a self-contained output layout.
//!
//! The output of [`encrypt_aes_128_gcm`] is `nonce (12 bytes) || ciphertext || tag (16 bytes)`,
//! so a blob can be decrypted with nothing but the key and the additional authenticated data.
//!
//! # Example
//! ```
//! # #[cfg(feature = "openssl")] {
//! use idcred::aead::{decrypt_aes_128_gcm, encrypt_aes_128_gcm};
//! use idcred::OpensslContext;
//!
//! let mut backend = OpensslContext::new();
//! let key = [0x42u8; 16];
//! let nonce = [0x01u8; 12];
//! let blob = encrypt_aes_128_gcm(&mut backend, &key, &nonce, b"hello", b"aad")?;
//! assert_eq!(blob.len(), 12 + 5 + 16);
//! assert_eq!(&blob[..12], &nonce);
//! assert_eq!(decrypt_aes_128_gcm(&mut backend, &key, &blob, b"aad")?, b"hello");
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use log::error;

use crate::common::constants::aead::{
    AES_128_KEY_SIZE, AES_GCM_NONCE_SIZE, MIN_CIPHERTEXT_SIZE,
};
use crate::crypto::{get_random, CryptoBackend};
use crate::error::SupportError;

#[cfg(test)]
mod tests;

/// Provides basic operations for AES-128-GCM authenticated encryption.
///
/// Implementations may assume that the key is 16 and the nonce 12 bytes long, this is checked
/// before the backend is called.
pub trait AeadCryptoBackend: CryptoBackend {
    /// Encrypts `plaintext` and authenticates it together with `aad`.
    ///
    /// Returns the ciphertext with the 16 byte authentication tag appended. Implementations may
    /// assume a 16 byte `key` and a 12 byte `nonce`.
    ///
    /// # Errors
    /// Returns an error if the backend failed to perform the encryption.
    fn encrypt_aes_128_gcm(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Decrypts `ciphertext_with_tag` (which has the authentication tag as its last 16 bytes)
    /// and checks the tag over the ciphertext and `aad`.
    ///
    /// Implementations may assume a 16 byte `key` and a 12 byte `nonce`, but not a minimum length
    /// of `ciphertext_with_tag`.
    ///
    /// # Errors
    /// - [`SupportError::MalformedInput`] if `ciphertext_with_tag` is shorter than the tag.
    /// - [`SupportError::VerificationFailure`] if the tag does not match, in which case no
    ///   plaintext is returned.
    fn decrypt_aes_128_gcm(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        ciphertext_with_tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;
}

fn check_key<T>(key: &[u8]) -> Result<(), SupportError<T>> {
    if key.len() == AES_128_KEY_SIZE {
        Ok(())
    } else {
        error!(
            "AES-128 key must be {AES_128_KEY_SIZE} bytes, got {}",
            key.len()
        );
        Err(SupportError::malformed(format!(
            "AES-128 key must be {AES_128_KEY_SIZE} bytes, got {}",
            key.len()
        )))
    }
}

/// Encrypts `plaintext` under `key` and `nonce` with AES-128-GCM, authenticating `aad` as well.
///
/// The returned buffer is `nonce || ciphertext || tag` and is `plaintext.len() + 28` bytes long.
/// Encryption is deterministic for a given key, nonce, plaintext and AAD.
///
/// # Errors
/// - [`SupportError::MalformedInput`] if `key` is not 16 or `nonce` is not 12 bytes long.
/// - [`SupportError::Backend`] if the backend failed to encrypt.
pub fn encrypt_aes_128_gcm<B: AeadCryptoBackend>(
    backend: &mut B,
    key: &[u8],
    nonce: &[u8],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    check_key(key)?;
    if nonce.len() != AES_GCM_NONCE_SIZE {
        error!(
            "AES-GCM nonce must be {AES_GCM_NONCE_SIZE} bytes, got {}",
            nonce.len()
        );
        return Err(SupportError::malformed(format!(
            "AES-GCM nonce must be {AES_GCM_NONCE_SIZE} bytes, got {}",
            nonce.len()
        )));
    }
    let ciphertext_with_tag = backend
        .encrypt_aes_128_gcm(key, nonce, plaintext, aad)
        .map_err(|e| {
            error!("AES-GCM encryption failed: {e}");
            e
        })?;
    let mut blob = Vec::with_capacity(nonce.len() + ciphertext_with_tag.len());
    blob.extend_from_slice(nonce);
    blob.extend(ciphertext_with_tag);
    Ok(blob)
}

/// Like [`encrypt_aes_128_gcm`], but with a fresh random nonce drawn from `backend`.
///
/// # Errors
/// See [`encrypt_aes_128_gcm`].
pub fn encrypt_aes_128_gcm_random_nonce<B: AeadCryptoBackend>(
    backend: &mut B,
    key: &[u8],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let nonce = get_random(backend, AES_GCM_NONCE_SIZE)?;
    encrypt_aes_128_gcm(backend, key, &nonce, plaintext, aad)
}

/// Decrypts a `nonce || ciphertext || tag` blob created by [`encrypt_aes_128_gcm`].
///
/// `aad` must be identical to the one used for encryption.
///
/// # Errors
/// - [`SupportError::MalformedInput`] if `key` is not 16 bytes long or `encrypted` is shorter
///   than 28 bytes.
/// - [`SupportError::VerificationFailure`] if the authentication tag does not match.
pub fn decrypt_aes_128_gcm<B: AeadCryptoBackend>(
    backend: &mut B,
    key: &[u8],
    encrypted: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    check_key(key)?;
    if encrypted.len() < MIN_CIPHERTEXT_SIZE {
        error!(
            "Encrypted data of {} bytes is shorter than the minimum of {MIN_CIPHERTEXT_SIZE}",
            encrypted.len()
        );
        return Err(SupportError::malformed(format!(
            "encrypted data must be at least {MIN_CIPHERTEXT_SIZE} bytes, got {}",
            encrypted.len()
        )));
    }
    let (nonce, ciphertext_with_tag) = encrypted.split_at(AES_GCM_NONCE_SIZE);
    backend
        .decrypt_aes_128_gcm(key, nonce, ciphertext_with_tag, aad)
        .map_err(|e| {
            error!("AES-GCM decryption failed: {e}");
            e
        })
}
