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

//! X.509 certificates and certificate chains.
//!
//! A certificate chain is transported as the concatenation of its DER encoded certificates,
//! leaf first. [`certificate_chain_split`] recovers the individual certificates by parsing each
//! of them as an X.509 certificate.
//!
//! Chain validation is structural only: [`certificate_chain_validate`] checks that every
//! certificate is signed by the key of the next one. Validity periods are not checked and no
//! trust anchor is consulted, callers have to decide whether they trust the last certificate.

use core::convert::Infallible;
use core::ops::Range;

use der::asn1::{AnyRef, BitStringRef};
use der::{Decode, Reader, SliceReader};
use derive_builder::Builder;
use log::error;
use x509_cert::spki::SubjectPublicKeyInfoRef;
use x509_cert::Certificate;

use crate::ec::SignCryptoBackend;
use crate::error::SupportError;

/// Tag of the explicit `[0] version` field of a `TBSCertificate`.
const VERSION_TAG: u8 = 0xa0;

/// Fields of a `TBSCertificate` between the version and the `subjectPublicKeyInfo`: serial number,
/// signature algorithm, issuer, validity and subject.
const FIELDS_BEFORE_SPKI: usize = 5;

#[cfg(test)]
mod tests;

/// Provides X.509 certificate and PKCS#12 operations.
pub trait CertificateCryptoBackend: SignCryptoBackend {
    /// Creates a v3 certificate for `subject_public_key` (uncompressed P-256 point), signed with
    /// ECDSA and SHA-256 by the raw `signing_private_key`.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] for invalid keys or certificate parameters.
    fn generate_certificate(
        &mut self,
        subject_public_key: &[u8],
        signing_private_key: &[u8],
        params: &CertificateParams,
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Packs `key_pair` (PKCS#8) and `certificate` into a PKCS#12 container with the friendly
    /// name `name` and an empty password.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] for an invalid key pair or certificate.
    fn create_pkcs12(
        &mut self,
        key_pair: &[u8],
        name: &str,
        certificate: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Returns the uncompressed P-256 public key of `certificate`.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if the certificate can't be parsed or has no
    /// P-256 key.
    fn certificate_public_key(
        &mut self,
        certificate: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>>;

    /// Checks whether `certificate` carries a valid signature by `public_key`.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if the certificate or key can't be parsed.
    fn certificate_signed_by_public_key(
        &mut self,
        certificate: &[u8],
        public_key: &[u8],
    ) -> Result<bool, SupportError<Self::Error>>;

    /// Returns `notBefore` and `notAfter` of `certificate` in seconds since the Unix epoch.
    ///
    /// # Errors
    /// Returns [`SupportError::MalformedInput`] if the certificate can't be parsed.
    fn certificate_validity(
        &mut self,
        certificate: &[u8],
    ) -> Result<(i64, i64), SupportError<Self::Error>>;
}

/// Contents of a certificate created by [`ec_public_key_generate_certificate`] or
/// [`ec_key_pair_get_pkcs12`].
#[derive(Debug, PartialEq, Eq, Clone, Builder)]
#[builder(
    setter(into),
    derive(Debug, PartialEq),
    build_fn(validate = "Self::validate")
)]
pub struct CertificateParams {
    /// Serial number as a decimal string.
    pub serial_decimal: String,

    /// Common name of the issuer.
    pub issuer: String,

    /// Common name of the subject.
    pub subject: String,

    /// Start of the validity period, in seconds since the Unix epoch.
    pub not_before: i64,

    /// End of the validity period, in seconds since the Unix epoch.
    pub not_after: i64,
}

impl CertificateParams {
    /// Initializes and returns a new [`CertificateParamsBuilder`].
    #[must_use]
    pub fn builder() -> CertificateParamsBuilder {
        CertificateParamsBuilder::default()
    }
}

impl CertificateParamsBuilder {
    fn validate(&self) -> Result<(), CertificateParamsBuilderError> {
        if let Some(serial) = &self.serial_decimal {
            if serial.is_empty() || !serial.bytes().all(|b| b.is_ascii_digit()) {
                return Err(CertificateParamsBuilderError::ValidationError(format!(
                    "serial {serial:?} is not a decimal number"
                )));
            }
        }
        if let (Some(not_before), Some(not_after)) = (self.not_before, self.not_after) {
            if not_after < not_before {
                return Err(CertificateParamsBuilderError::ValidationError(
                    "validity period ends before it starts".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Concatenates the DER encoded `certificates` into a single chain buffer.
#[must_use]
pub fn certificate_chain_join(certificates: &[Vec<u8>]) -> Vec<u8> {
    certificates.concat()
}

/// Splits a concatenated chain into its DER encoded certificates.
///
/// An empty chain yields an empty vector.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if an element of the chain is not a DER encoded
/// X.509 certificate.
pub fn certificate_chain_split(
    chain: &[u8],
) -> Result<Vec<Vec<u8>>, SupportError<Infallible>> {
    let split = || -> Result<Vec<Vec<u8>>, SupportError<Infallible>> {
        let mut certificates = Vec::new();
        let mut reader = SliceReader::new(chain)?;
        while !reader.is_finished() {
            let start = position(&reader)?;
            Certificate::decode(&mut reader)?;
            certificates.push(chain[start..position(&reader)?].to_vec());
        }
        Ok(certificates)
    };
    split().map_err(|e| {
        error!("Error splitting certificate chain: {e}");
        e
    })
}

/// Checks that each certificate of `chain` is signed by the public key of the following one.
///
/// A chain containing a single certificate is always valid.
///
/// # Errors
/// - [`SupportError::PolicyViolation`] if `chain` is empty.
/// - [`SupportError::MalformedInput`] if the chain or one of its certificates can't be parsed.
pub fn certificate_chain_validate<B: CertificateCryptoBackend>(
    backend: &mut B,
    chain: &[u8],
) -> Result<bool, SupportError<B::Error>> {
    let certificates = split_non_empty(chain)?;
    for (certificate, issuer) in certificates.iter().zip(certificates.iter().skip(1)) {
        let issuer_key = backend.certificate_public_key(issuer).map_err(|e| {
            error!("Error getting public key of issuing certificate: {e}");
            e
        })?;
        if !certificate_signed_by_public_key(backend, certificate, &issuer_key)? {
            error!("Certificate chain is broken: certificate is not signed by its successor");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Checks whether `certificate` is signed by `public_key` (uncompressed P-256 point).
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the certificate or key can't be parsed.
pub fn certificate_signed_by_public_key<B: CertificateCryptoBackend>(
    backend: &mut B,
    certificate: &[u8],
    public_key: &[u8],
) -> Result<bool, SupportError<B::Error>> {
    backend
        .certificate_signed_by_public_key(certificate, public_key)
        .map_err(|e| {
            error!("Error checking certificate signature: {e}");
            e
        })
}

/// Returns the public key of the first (leaf) certificate of `chain`.
///
/// # Errors
/// - [`SupportError::PolicyViolation`] if `chain` is empty.
/// - [`SupportError::MalformedInput`] if the certificate can't be parsed.
pub fn certificate_chain_get_top_most_key<B: CertificateCryptoBackend>(
    backend: &mut B,
    chain: &[u8],
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let certificates = split_non_empty(chain)?;
    backend.certificate_public_key(&certificates[0]).map_err(|e| {
        error!("Error getting public key of certificate: {e}");
        e
    })
}

fn split_non_empty<T>(chain: &[u8]) -> Result<Vec<Vec<u8>>, SupportError<T>> {
    let certificates = certificate_chain_split(chain).map_err(SupportError::widen)?;
    if certificates.is_empty() {
        error!("Certificate chain is empty");
        return Err(SupportError::policy("certificate chain is empty"));
    }
    Ok(certificates)
}

/// Locations of the parts of a certificate that are addressed by offset and size.
struct CertificateLayout {
    tbs_certificate: Range<usize>,
    public_key: Range<usize>,
    signature: Range<usize>,
}

fn position<'a, R: Reader<'a>>(reader: &R) -> Result<usize, der::Error> {
    usize::try_from(reader.position())
}

/// Range of the last `size` bytes before `end`, i.e. the content of an element just read.
fn ending_at(end: usize, size: usize) -> Range<usize> {
    end - size..end
}

fn bit_string_bytes<'a>(
    bit_string: &BitStringRef<'a>,
) -> Result<&'a [u8], SupportError<Infallible>> {
    bit_string
        .as_bytes()
        .ok_or_else(|| SupportError::malformed("BIT STRING has unused bits"))
}

impl CertificateLayout {
    fn of(certificate: &[u8]) -> Result<CertificateLayout, SupportError<Infallible>> {
        // Full parse first, the walk below relies on a well-formed certificate.
        Certificate::from_der(certificate)?;

        let outer = AnyRef::from_der(certificate)?;
        let content_start = certificate.len() - outer.value().len();
        let mut reader = SliceReader::new(outer.value())?;
        let tbs = AnyRef::decode(&mut reader)?;
        let tbs_end = content_start + position(&reader)?;
        // signatureAlgorithm
        AnyRef::decode(&mut reader)?;
        let signature = BitStringRef::decode(&mut reader)?;
        let signature_end = content_start + position(&reader)?;

        let tbs_content_start = tbs_end - tbs.value().len();
        let mut tbs_reader = SliceReader::new(tbs.value())?;
        if tbs_reader.peek_byte() == Some(VERSION_TAG) {
            AnyRef::decode(&mut tbs_reader)?;
        }
        for _ in 0..FIELDS_BEFORE_SPKI {
            AnyRef::decode(&mut tbs_reader)?;
        }
        let spki = SubjectPublicKeyInfoRef::decode(&mut tbs_reader)?;
        // subjectPublicKey is the last element of the SubjectPublicKeyInfo.
        let spki_end = tbs_content_start + position(&tbs_reader)?;

        Ok(CertificateLayout {
            tbs_certificate: content_start..tbs_end,
            public_key: ending_at(spki_end, bit_string_bytes(&spki.subject_public_key)?.len()),
            signature: ending_at(signature_end, bit_string_bytes(&signature)?.len()),
        })
    }
}

fn as_offset_and_size(range: &Range<usize>) -> (usize, usize) {
    (range.start, range.end - range.start)
}

/// Locates the raw public key (the content of the `subjectPublicKey` BIT STRING) inside
/// `certificate` and returns its offset and size.
///
/// For P-256 keys this is the 65 byte uncompressed point.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `certificate` is not a DER encoded X.509
/// certificate.
pub fn certificate_find_public_key(
    certificate: &[u8],
) -> Result<(usize, usize), SupportError<Infallible>> {
    CertificateLayout::of(certificate)
        .map(|layout| as_offset_and_size(&layout.public_key))
        .map_err(|e| {
            error!("Error finding public key in certificate: {e}");
            e
        })
}

/// Locates the complete `tbsCertificate` element inside `certificate` and returns its offset and
/// size.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `certificate` is not a DER encoded X.509
/// certificate.
pub fn certificate_tbs_certificate(
    certificate: &[u8],
) -> Result<(usize, usize), SupportError<Infallible>> {
    CertificateLayout::of(certificate)
        .map(|layout| as_offset_and_size(&layout.tbs_certificate))
        .map_err(|e| {
            error!("Error finding tbsCertificate: {e}");
            e
        })
}

/// Locates the signature inside `certificate` (without the BIT STRING's unused-bits octet) and
/// returns its offset and size.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `certificate` is not a DER encoded X.509
/// certificate.
pub fn certificate_find_signature(
    certificate: &[u8],
) -> Result<(usize, usize), SupportError<Infallible>> {
    CertificateLayout::of(certificate)
        .map(|layout| as_offset_and_size(&layout.signature))
        .map_err(|e| {
            error!("Error finding signature in certificate: {e}");
            e
        })
}

/// Returns the validity period of `certificate` as `(not_before, not_after)` in seconds since the
/// Unix epoch.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the certificate can't be parsed.
pub fn certificate_get_validity<B: CertificateCryptoBackend>(
    backend: &mut B,
    certificate: &[u8],
) -> Result<(i64, i64), SupportError<B::Error>> {
    backend.certificate_validity(certificate).map_err(|e| {
        error!("Error getting certificate validity: {e}");
        e
    })
}

/// Creates a certificate for `public_key`, signed by `signing_private_key`.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if a key or the serial number is invalid.
pub fn ec_public_key_generate_certificate<B: CertificateCryptoBackend>(
    backend: &mut B,
    public_key: &[u8],
    signing_private_key: &[u8],
    params: &CertificateParams,
) -> Result<Vec<u8>, SupportError<B::Error>> {
    backend
        .generate_certificate(public_key, signing_private_key, params)
        .map_err(|e| {
            error!("Error generating certificate: {e}");
            e
        })
}

/// Creates a self-signed certificate for `key_pair` and returns it together with the key in a
/// PKCS#12 container, protected by an empty password.
///
/// `name` becomes the friendly name of the PKCS#12 entry.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the key pair or the serial number is invalid.
pub fn ec_key_pair_get_pkcs12<B: CertificateCryptoBackend>(
    backend: &mut B,
    key_pair: &[u8],
    name: &str,
    params: &CertificateParams,
) -> Result<Vec<u8>, SupportError<B::Error>> {
    let public_key = crate::ec::ec_key_pair_get_public_key(backend, key_pair)?;
    let private_key = crate::ec::ec_key_pair_get_private_key(backend, key_pair)?;
    let certificate =
        ec_public_key_generate_certificate(backend, &public_key, &private_key, params)?;
    backend
        .create_pkcs12(key_pair, name, &certificate)
        .map_err(|e| {
            error!("Error creating PKCS#12: {e}");
            e
        })
}
