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
use core::convert::Infallible;

use coset::{iana, CborSerializable, CoseMac0, Header, MacContext};
use log::error;
use subtle::ConstantTimeEq;

use crate::common::constants::cose::ALG_HMAC_256_256;
use crate::cose::{
    envelope_payload, header_algorithm, hmac_sha256, protected_header, signed_content,
    MacCryptoBackend,
};
use crate::error::SupportError;


fn to_envelope<T>(mac0: CoseMac0) -> Result<Vec<u8>, SupportError<T>> {
    mac0.to_vec().map_err(|e| {
        error!("Error encoding COSE_Mac0: {e}");
        SupportError::from(e)
    })
}

/// Creates a COSE_Mac0 with an HMAC-SHA-256 tag under `key`.
///
/// Exactly one of `data` (embedded payload) and `detached_content` is authenticated, the other one
/// has to be empty. The unprotected header is always empty.
///
/// # Errors
/// Returns [`SupportError::PolicyViolation`] if both `data` and `detached_content` are non-empty.
pub fn cose_mac0<B: MacCryptoBackend>(
    backend: &mut B,
    key: &[u8],
    data: &[u8],
    detached_content: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let content = signed_content(data, detached_content)?;
    let protected = protected_header(iana::Algorithm::HMAC_256_256);
    let to_be_maced =
        coset::mac_structure_data(MacContext::CoseMac0, protected.clone(), &[], content);
    let tag = hmac_sha256(backend, key, &to_be_maced)?;
    to_envelope(CoseMac0 {
        protected,
        unprotected: Header::default(),
        payload: envelope_payload(data),
        tag,
    })
}

/// Assembles a COSE_Mac0 around a `tag` that was computed elsewhere.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the structure can't be encoded.
pub fn cose_mac_with_digest(tag: &[u8], data: &[u8]) -> Result<Vec<u8>, SupportError<Infallible>> {
    to_envelope(CoseMac0 {
        protected: protected_header(iana::Algorithm::HMAC_256_256),
        unprotected: Header::default(),
        payload: envelope_payload(data),
        tag: tag.to_vec(),
    })
}

/// Verifies a COSE_Mac0 created by [`cose_mac0`] with `key`.
///
/// Returns `Ok(false)` if the tag does not match or the protected algorithm is not
/// HMAC 256/256. Tags are compared in constant time.
///
/// # Errors
/// - [`SupportError::MalformedInput`] if the envelope is not a COSE_Mac0 with a numeric algorithm.
/// - [`SupportError::PolicyViolation`] if both the payload and `detached_content` are non-empty.
pub fn cose_check_mac0<B: MacCryptoBackend>(
    backend: &mut B,
    envelope: &[u8],
    detached_content: &[u8],
    key: &[u8],
) -> Result<bool, SupportError<B::Error>> {
    let mac0 = CoseMac0::from_slice(envelope).map_err(|e| {
        error!("Passed-in COSE_Mac0 is not valid: {e}");
        SupportError::from(e)
    })?;
    let payload = mac0.payload.as_deref().unwrap_or_default();
    let content = signed_content(payload, detached_content)?;

    let alg = header_algorithm(&mac0.protected.header).map_err(|e| {
        error!("Error getting algorithm of COSE_Mac0: {e}");
        e
    })?;
    if alg != ALG_HMAC_256_256 {
        error!("Unexpected COSE_Mac0 algorithm {alg}");
        return Ok(false);
    }

    let to_be_maced =
        coset::mac_structure_data(MacContext::CoseMac0, mac0.protected, &[], content);
    let expected = hmac_sha256(backend, key, &to_be_maced)?;
    let valid = bool::from(expected.as_slice().ct_eq(mac0.tag.as_slice()));
    if !valid {
        error!("COSE_Mac0 tag check failed");
    }
    Ok(valid)
}
