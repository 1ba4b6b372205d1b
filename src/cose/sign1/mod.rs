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

use ciborium::value::Value;
use coset::{iana, CborSerializable, CoseSign1, Header, Label, SignatureContext};
use log::error;

use crate::common::constants::cose::{ECDSA_SIGNATURE_SIZE, LABEL_X5CHAIN};
use crate::cose::{envelope_payload, header_algorithm, protected_header, signed_content};
use crate::ec::{
    check_ecdsa_signature, ecdsa_signature_cose_to_der, ecdsa_signature_der_to_cose, sign_ecdsa,
    SignCryptoBackend,
};
use crate::error::SupportError;
use crate::x509::certificate_chain_split;


/// Unprotected header carrying `certificate_chain` as `x5chain`, or an empty header if there is no
/// chain.
///
/// A single certificate is stored as a byte string, several as an array of byte strings.
fn x5chain_header<T>(certificate_chain: &[u8]) -> Result<Header, SupportError<T>> {
    if certificate_chain.is_empty() {
        return Ok(Header::default());
    }
    let mut certificates = certificate_chain_split(certificate_chain).map_err(|e| {
        error!("Error splitting certificate chain: {e}");
        e.widen()
    })?;
    let value = if certificates.len() == 1 {
        Value::Bytes(certificates.remove(0))
    } else {
        Value::Array(certificates.into_iter().map(Value::Bytes).collect())
    };
    Ok(Header {
        rest: vec![(Label::Int(LABEL_X5CHAIN), value)],
        ..Header::default()
    })
}

fn to_envelope<T>(sign1: CoseSign1) -> Result<Vec<u8>, SupportError<T>> {
    sign1.to_vec().map_err(|e| {
        error!("Error encoding COSE_Sign1: {e}");
        SupportError::from(e)
    })
}

/// Parses an untagged COSE_Sign1 (or structurally identical COSE_Mac0).
fn parse_sign1<T>(envelope: &[u8]) -> Result<CoseSign1, SupportError<T>> {
    CoseSign1::from_slice(envelope).map_err(|e| {
        error!("Passed-in COSE_Sign1 is not valid: {e}");
        SupportError::from(e)
    })
}

/// Creates a COSE_Sign1 signed with ECDSA (P-256, SHA-256) by `key_pair`.
///
/// Exactly one of `data` (embedded payload) and `detached_content` is signed, the other one has to
/// be empty. If `certificate_chain` is not empty, it is split into its certificates and added as
/// `x5chain` to the unprotected header.
///
/// # Errors
/// - [`SupportError::PolicyViolation`] if both `data` and `detached_content` are non-empty.
/// - [`SupportError::MalformedInput`] if `certificate_chain` or `key_pair` can't be parsed.
///
/// # Example
/// ```
/// # #[cfg(feature = "openssl")] {
/// use idcred::cose::{cose_check_ecdsa_signature, cose_sign_ecdsa, cose_sign_get_payload};
/// use idcred::ec::{create_ec_key_pair, ec_key_pair_get_public_key};
/// use idcred::OpensslContext;
///
/// let mut backend = OpensslContext::new();
/// let key_pair = create_ec_key_pair(&mut backend)?;
/// let public_key = ec_key_pair_get_public_key(&mut backend, &key_pair)?;
///
/// let sign1 = cose_sign_ecdsa(&mut backend, &key_pair, b"data", &[], &[])?;
/// assert!(cose_check_ecdsa_signature(&mut backend, &sign1, &[], &public_key)?);
/// assert_eq!(cose_sign_get_payload(&sign1)?, b"data");
/// # }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn cose_sign_ecdsa<B: SignCryptoBackend>(
    backend: &mut B,
    key_pair: &[u8],
    data: &[u8],
    detached_content: &[u8],
    certificate_chain: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let content = signed_content(data, detached_content)?;
    let protected = protected_header(iana::Algorithm::ES256);
    let unprotected = x5chain_header(certificate_chain)?;

    let to_be_signed =
        coset::sig_structure_data(SignatureContext::CoseSign1, protected.clone(), None, &[], content);
    let der_signature = sign_ecdsa(backend, key_pair, &to_be_signed)?;
    let signature = ecdsa_signature_der_to_cose(backend, &der_signature)?;

    to_envelope(CoseSign1 {
        protected,
        unprotected,
        payload: envelope_payload(data),
        signature,
    })
}

/// Assembles a COSE_Sign1 around a `signature` (64 bytes, `r || s`) that was computed elsewhere
/// over the corresponding `Sig_structure`.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `signature` is not 64 bytes long or
/// `certificate_chain` can't be parsed.
pub fn cose_sign_ecdsa_with_signature(
    signature: &[u8],
    data: &[u8],
    certificate_chain: &[u8],
) -> Result<Vec<u8>, SupportError<Infallible>> {
    if signature.len() != ECDSA_SIGNATURE_SIZE {
        error!(
            "Invalid size for signature, expected {ECDSA_SIGNATURE_SIZE} got {}",
            signature.len()
        );
        return Err(SupportError::malformed(format!(
            "signature must be {ECDSA_SIGNATURE_SIZE} bytes, got {}",
            signature.len()
        )));
    }
    to_envelope(CoseSign1 {
        protected: protected_header(iana::Algorithm::ES256),
        unprotected: x5chain_header(certificate_chain)?,
        payload: envelope_payload(data),
        signature: signature.to_vec(),
    })
}

/// Verifies a COSE_Sign1 created by [`cose_sign_ecdsa`] against `public_key` (uncompressed P-256
/// point).
///
/// Returns `Ok(false)` if the signature does not verify, including when it does not have the
/// size of a P-256 signature.
///
/// # Errors
/// - [`SupportError::MalformedInput`] if the envelope is not a COSE_Sign1 or `public_key` is not a
///   P-256 point.
/// - [`SupportError::PolicyViolation`] if both the payload and `detached_content` are non-empty.
pub fn cose_check_ecdsa_signature<B: SignCryptoBackend>(
    backend: &mut B,
    envelope: &[u8],
    detached_content: &[u8],
    public_key: &[u8],
) -> Result<bool, SupportError<B::Error>> {
    let sign1 = parse_sign1(envelope)?;
    let payload = sign1.payload.as_deref().unwrap_or_default();
    let content = signed_content(payload, detached_content)?;

    if sign1.signature.len() != ECDSA_SIGNATURE_SIZE {
        error!(
            "COSE_Sign1 signature has {} bytes instead of {ECDSA_SIGNATURE_SIZE}",
            sign1.signature.len()
        );
        return Ok(false);
    }
    let der_signature = match ecdsa_signature_cose_to_der(backend, &sign1.signature) {
        Ok(der_signature) => der_signature,
        Err(SupportError::Backend(e)) => return Err(SupportError::Backend(e)),
        Err(e) => {
            error!("COSE_Sign1 signature can't be converted to DER: {e}");
            return Ok(false);
        }
    };

    let to_be_signed = coset::sig_structure_data(
        SignatureContext::CoseSign1,
        sign1.protected,
        None,
        &[],
        content,
    );
    let digest = backend.sha256(&to_be_signed)?;
    let valid = check_ecdsa_signature(backend, &digest, &der_signature, public_key)?;
    if !valid {
        error!("COSE_Sign1 signature check failed");
    }
    Ok(valid)
}

/// Returns the payload of a COSE_Sign1 or COSE_Mac0, which is empty if the payload is `null`.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the envelope can't be parsed.
pub fn cose_sign_get_payload(envelope: &[u8]) -> Result<Vec<u8>, SupportError<Infallible>> {
    Ok(parse_sign1(envelope)?.payload.unwrap_or_default())
}

/// Returns the signature (or tag) of a COSE_Sign1 or COSE_Mac0.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the envelope can't be parsed.
pub fn cose_sign_get_signature(envelope: &[u8]) -> Result<Vec<u8>, SupportError<Infallible>> {
    Ok(parse_sign1(envelope)?.signature)
}

/// Returns the algorithm in the protected header of a COSE_Sign1 or COSE_Mac0, e.g. `-7` for
/// ECDSA with SHA-256.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the envelope can't be parsed or has no numeric
/// algorithm.
pub fn cose_sign_get_alg(envelope: &[u8]) -> Result<i64, SupportError<Infallible>> {
    let sign1 = parse_sign1(envelope)?;
    header_algorithm(&sign1.protected.header).map_err(|e| {
        error!("Error getting algorithm of COSE_Sign1: {e}");
        e
    })
}

/// Returns the `x5chain` of a COSE_Sign1 as a concatenated certificate chain.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the envelope can't be parsed, has no `x5chain` or
/// the `x5chain` is neither a byte string nor an array of byte strings.
pub fn cose_sign_get_x5chain(envelope: &[u8]) -> Result<Vec<u8>, SupportError<Infallible>> {
    let sign1 = parse_sign1(envelope)?;
    let x5chain = sign1
        .unprotected
        .rest
        .into_iter()
        .find_map(|(label, value)| (label == Label::Int(LABEL_X5CHAIN)).then_some(value));
    match x5chain {
        Some(Value::Bytes(certificate)) => Ok(certificate),
        Some(Value::Array(certificates)) => certificates
            .into_iter()
            .try_fold(Vec::new(), |mut chain, certificate| match certificate {
                Value::Bytes(certificate) => {
                    chain.extend(certificate);
                    Ok(chain)
                }
                _ => {
                    error!("Item in x5chain array is not a bstr");
                    Err(SupportError::malformed("item in x5chain array is not a bstr"))
                }
            }),
        Some(_) => {
            error!("Value for x5chain label is not a bstr or array");
            Err(SupportError::malformed(
                "value for x5chain label is not a bstr or array",
            ))
        }
        None => {
            error!("Did not find x5chain label in unprotected headers");
            Err(SupportError::malformed(
                "did not find x5chain label in unprotected headers",
            ))
        }
    }
}
