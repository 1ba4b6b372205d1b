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

//! Integrity protection for secure access control profiles.
//!
//! A profile is protected by a tag computed with AES-128-GCM over an empty plaintext, using the
//! canonical CBOR encoding of the profile as additional authenticated data. The tag has the
//! layout of any other AES-GCM blob of this crate (`nonce || tag`, 28 bytes), so it can be checked
//! with nothing but the storage key.
//!
//! # Example
//! ```
//! # #[cfg(feature = "openssl")] {
//! use idcred::access_control::{
//!     calc_mac, check_mac, get_test_hardware_bound_key, SecureAccessControlProfile,
//! };
//! use idcred::OpensslContext;
//!
//! let mut backend = OpensslContext::new();
//! let storage_key = get_test_hardware_bound_key();
//! let mut profile = SecureAccessControlProfile::builder()
//!     .id(1)
//!     .user_authentication_required(true)
//!     .timeout_millis(10_000u64)
//!     .build()?;
//! profile.mac = calc_mac(&mut backend, &profile, storage_key)?;
//! assert!(check_mac(&mut backend, &profile, storage_key)?);
//!
//! profile.timeout_millis = 0;
//! assert!(!check_mac(&mut backend, &profile, storage_key)?);
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use core::convert::Infallible;

use derive_builder::Builder;
use log::error;
use serde::Serialize;
use serde_bytes::Bytes;
use subtle::ConstantTimeEq;

use crate::aead::{encrypt_aes_128_gcm, AeadCryptoBackend};
use crate::common::cbor::encode;
use crate::common::constants::aead::AES_GCM_NONCE_SIZE;
use crate::common::constants::TEST_HARDWARE_BOUND_KEY;
use crate::crypto::get_random;
use crate::error::SupportError;


/// Access control profile as provisioned into a credential, together with its tag.
#[derive(Debug, PartialEq, Eq, Clone, Builder)]
#[builder(setter(into), derive(Debug, PartialEq))]
pub struct SecureAccessControlProfile {
    /// Identifier of the profile, unique within a credential.
    pub id: i32,

    /// DER encoded certificate a reader has to authenticate with, empty if any reader may
    /// access the data.
    #[builder(default)]
    pub reader_certificate: Vec<u8>,

    /// Whether the user has to authenticate before data may be released.
    #[builder(default)]
    pub user_authentication_required: bool,

    /// Time in milliseconds that a user authentication stays valid, `0` meaning "every access".
    /// Only used if [`Self::user_authentication_required`] is set.
    #[builder(default)]
    pub timeout_millis: u64,

    /// Secure user id the authentication must be bound to.
    /// Only used if [`Self::user_authentication_required`] is set.
    #[builder(default)]
    pub secure_user_id: u64,

    /// Tag created by [`calc_mac`].
    #[builder(default)]
    pub mac: Vec<u8>,
}

impl SecureAccessControlProfile {
    /// Initializes and returns a new [`SecureAccessControlProfileBuilder`].
    #[must_use]
    pub fn builder() -> SecureAccessControlProfileBuilder {
        SecureAccessControlProfileBuilder::default()
    }
}

/// Map that is encoded by [`encode_cbor`]; the order of the fields is the order of the map keys.
#[derive(Serialize)]
struct ProfileMap<'a> {
    id: i32,
    #[serde(rename = "readerCertificate", skip_serializing_if = "Option::is_none")]
    reader_certificate: Option<&'a Bytes>,
    #[serde(
        rename = "userAuthenticationRequired",
        skip_serializing_if = "Option::is_none"
    )]
    user_authentication_required: Option<bool>,
    #[serde(rename = "timeoutMillis", skip_serializing_if = "Option::is_none")]
    timeout_millis: Option<u64>,
    #[serde(rename = "secureUserId", skip_serializing_if = "Option::is_none")]
    secure_user_id: Option<u64>,
}

impl<'a> From<&'a SecureAccessControlProfile> for ProfileMap<'a> {
    fn from(profile: &'a SecureAccessControlProfile) -> Self {
        let user_auth = profile.user_authentication_required;
        ProfileMap {
            id: profile.id,
            reader_certificate: (!profile.reader_certificate.is_empty())
                .then(|| Bytes::new(&profile.reader_certificate)),
            user_authentication_required: user_auth.then_some(true),
            timeout_millis: user_auth.then_some(profile.timeout_millis),
            secure_user_id: user_auth.then_some(profile.secure_user_id),
        }
    }
}

/// Returns the canonical CBOR encoding of `profile` that its tag is computed over.
///
/// The encoding is a map with the keys `id`, `readerCertificate` (only if a reader certificate
/// is set) and, only if user authentication is required, `userAuthenticationRequired`,
/// `timeoutMillis` and `secureUserId`. The tag itself is not part of the encoding.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the profile can't be encoded.
pub fn encode_cbor(
    profile: &SecureAccessControlProfile,
) -> Result<Vec<u8>, SupportError<Infallible>> {
    encode(&ProfileMap::from(profile)).map_err(|e| {
        error!("Error encoding access control profile {}: {e}", profile.id);
        e
    })
}

fn calc_mac_with_nonce<B: AeadCryptoBackend>(
    backend: &mut B,
    profile: &SecureAccessControlProfile,
    storage_key: &[u8],
    nonce: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let encoded = encode_cbor(profile).map_err(SupportError::widen)?;
    encrypt_aes_128_gcm(backend, storage_key, nonce, &[], &encoded)
}

/// Computes the tag of `profile` under `storage_key` with a fresh random nonce.
///
/// The current value of [`SecureAccessControlProfile::mac`] is ignored; callers store the result
/// there.
///
/// # Errors
/// - [`SupportError::MalformedInput`] if `storage_key` is not 16 bytes long.
/// - [`SupportError::Backend`] if the backend failed to generate the nonce or encrypt.
pub fn calc_mac<B: AeadCryptoBackend>(
    backend: &mut B,
    profile: &SecureAccessControlProfile,
    storage_key: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let nonce = get_random(backend, AES_GCM_NONCE_SIZE)?;
    calc_mac_with_nonce(backend, profile, storage_key, &nonce)
}

/// Checks that [`SecureAccessControlProfile::mac`] is a valid tag of `profile` under
/// `storage_key`.
///
/// Returns `Ok(false)` if the tag does not match, including when it is too short to contain a
/// nonce.
///
/// # Errors
/// - [`SupportError::MalformedInput`] if `storage_key` is not 16 bytes long.
/// - [`SupportError::Backend`] if the backend failed to encrypt.
pub fn check_mac<B: AeadCryptoBackend>(
    backend: &mut B,
    profile: &SecureAccessControlProfile,
    storage_key: &[u8],
) -> Result<bool, SupportError<B::Error>> {
    let Some(nonce) = profile.mac.get(..AES_GCM_NONCE_SIZE) else {
        error!(
            "Tag of access control profile {} is only {} bytes long",
            profile.id,
            profile.mac.len()
        );
        return Ok(false);
    };
    let expected = calc_mac_with_nonce(backend, profile, storage_key, nonce)?;
    let valid = bool::from(expected.ct_eq(&profile.mac));
    if !valid {
        error!("Tag of access control profile {} does not match", profile.id);
    }
    Ok(valid)
}

/// Returns the storage key used in place of a hardware-bound key by software implementations.
///
/// This key is public, use it for testing only.
#[must_use]
pub fn get_test_hardware_bound_key() -> &'static [u8; 16] {
    &TEST_HARDWARE_BOUND_KEY
}
