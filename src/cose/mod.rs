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

//! Creation and verification of COSE_Sign1 and COSE_Mac0 structures
//! ([RFC 8152](https://www.rfc-editor.org/rfc/rfc8152.html)), as used for identity credentials.
//!
//! All structures are untagged 4-element arrays `[protected, unprotected, payload, signature/tag]`.
//! The protected header only contains the algorithm (`ES256` or `HMAC 256/256`), the unprotected
//! header optionally contains an `x5chain` with the signer's certificate chain.
//!
//! Content may either be embedded as the payload or be "detached", i.e. transported separately and
//! only supplied when signing and verifying. In the latter case the payload is CBOR `null`.
//! At most one of the two may be non-empty.
//!
//! # Example
//! ```
//! # #[cfg(feature = "openssl")] {
//! use idcred::cose::{cose_check_mac0, cose_mac0, cose_sign_get_payload};
//! use idcred::OpensslContext;
//!
//! let mut backend = OpensslContext::new();
//! let key = [0x0bu8; 32];
//! let mac0 = cose_mac0(&mut backend, &key, b"payload", &[])?;
//! assert!(cose_check_mac0(&mut backend, &mac0, &[], &key)?);
//! assert_eq!(cose_sign_get_payload(&mac0)?, b"payload");
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use ciborium::value::Value;
use coset::{iana, Algorithm, Header, HeaderBuilder, ProtectedHeader};
use log::error;

use crate::common::cbor::{decode_single, encode};
use crate::common::constants::SEMANTIC_TAG_ENCODED_CBOR;
use crate::crypto::CryptoBackend;
use crate::error::SupportError;
use crate::key_agreement::{ecdh, hkdf, KdfCryptoBackend, KeyAgreementCryptoBackend};

pub use mac0::{cose_check_mac0, cose_mac0, cose_mac_with_digest};
pub use sign1::{
    cose_check_ecdsa_signature, cose_sign_ecdsa, cose_sign_ecdsa_with_signature,
    cose_sign_get_alg, cose_sign_get_payload, cose_sign_get_signature, cose_sign_get_x5chain,
};

mod mac0;
mod sign1;


/// HKDF info used to derive the device MAC key.
const EMAC_KEY_INFO: &[u8] = b"EMacKey";

/// Size of the derived device MAC key.
const EMAC_KEY_SIZE: usize = 32;

/// Provides HMAC with SHA-256.
pub trait MacCryptoBackend: CryptoBackend {
    /// Computes the HMAC-SHA-256 tag of `data` under `key`.
    ///
    /// # Errors
    /// Returns an error if the backend failed to compute the tag.
    fn hmac_sha256(
        &mut self,
        key: &[u8],
        data: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;
}

/// Computes the HMAC-SHA-256 tag of `data` under `key`.
///
/// # Errors
/// Returns [`SupportError::Backend`] if the backend failed to compute the tag.
pub fn hmac_sha256<B: MacCryptoBackend>(
    backend: &mut B,
    key: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend.hmac_sha256(key, data).map_err(|e| {
        error!("Error computing HMAC: {e}");
        e
    })
}

/// Protected header containing nothing but `alg`.
fn protected_header(alg: iana::Algorithm) -> ProtectedHeader {
    ProtectedHeader {
        original_data: None,
        header: HeaderBuilder::new().algorithm(alg).build(),
    }
}

/// Returns the numeric value of the `alg` parameter of `header`.
fn header_algorithm<T>(header: &Header) -> Result<i64, SupportError<T>> {
    match &header.alg {
        Some(Algorithm::Assigned(alg)) => Ok(*alg as i64),
        Some(Algorithm::PrivateUse(alg)) => Ok(*alg),
        Some(Algorithm::Text(alg)) => Err(SupportError::malformed(format!(
            "algorithm {alg:?} is not a number"
        ))),
        None => Err(SupportError::malformed(
            "protected header has no algorithm",
        )),
    }
}

/// Checks that at most one of `payload` and `detached_content` is non-empty and returns the one
/// that is covered by the signature or MAC.
fn signed_content<'a, T>(
    payload: &'a [u8],
    detached_content: &'a [u8],
) -> Result<&'a [u8], SupportError<T>> {
    match (payload.is_empty(), detached_content.is_empty()) {
        (false, false) => {
            error!("data and detached content cannot both be non-empty");
            Err(SupportError::policy(
                "data and detached content cannot both be non-empty",
            ))
        }
        (false, true) => Ok(payload),
        (true, _) => Ok(detached_content),
    }
}

/// Payload as stored in the envelope, `None` (CBOR `null`) if empty.
fn envelope_payload(data: &[u8]) -> Option<Vec<u8>> {
    (!data.is_empty()).then(|| data.to_vec())
}

/// Derives the device MAC key: ECDH between `private_key` and `public_key`, followed by
/// HKDF-SHA-256 with the SHA-256 digest of `session_transcript_bytes` as salt and `"EMacKey"` as
/// info.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if one of the keys is invalid.
pub fn calc_emac_key<B: KeyAgreementCryptoBackend + KdfCryptoBackend>(
    backend: &mut B,
    private_key: &[u8],
    public_key: &[u8],
    session_transcript_bytes: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let shared_secret = ecdh(backend, public_key, private_key)?;
    let salt = backend.sha256(session_transcript_bytes)?;
    hkdf(backend, &shared_secret, &salt, EMAC_KEY_INFO, EMAC_KEY_SIZE)
}

/// Builds the encoded `DeviceAuthenticationBytes`, i.e.
/// `#6.24(bstr .cbor ["DeviceAuthentication", SessionTranscript, DocType, #6.24(bstr .cbor
/// DeviceNameSpaces)])`.
fn device_authentication_bytes<T>(
    session_transcript_encoded: &[u8],
    doc_type: &str,
    device_name_spaces_encoded: &[u8],
) -> Result<Vec<u8>, SupportError<T>> {
    let session_transcript = decode_single(session_transcript_encoded).map_err(|e| {
        error!("Error parsing session transcript: {e}");
        e.widen()
    })?;
    let device_authentication = Value::Array(vec![
        Value::Text("DeviceAuthentication".to_string()),
        session_transcript,
        Value::Text(doc_type.to_string()),
        Value::Tag(
            SEMANTIC_TAG_ENCODED_CBOR,
            Box::new(Value::Bytes(device_name_spaces_encoded.to_vec())),
        ),
    ]);
    let encoded = encode(&device_authentication).map_err(SupportError::widen)?;
    encode(&Value::Tag(
        SEMANTIC_TAG_ENCODED_CBOR,
        Box::new(Value::Bytes(encoded)),
    ))
    .map_err(SupportError::widen)
}

/// Computes the device MAC over `DeviceAuthentication` as a COSE_Mac0 with detached content.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `session_transcript_encoded` is not a single CBOR
/// data item.
pub fn calc_mac<B: MacCryptoBackend>(
    backend: &mut B,
    session_transcript_encoded: &[u8],
    doc_type: &str,
    device_name_spaces_encoded: &[u8],
    emac_key: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let detached = device_authentication_bytes(
        session_transcript_encoded,
        doc_type,
        device_name_spaces_encoded,
    )?;
    cose_mac0(backend, emac_key, &[], &detached)
}
