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
use log::debug;
use openssl::asn1::{Asn1Time, Asn1TimeRef};
use openssl::bn::BigNum;
use openssl::hash::MessageDigest;
use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{HasPublic, PKey, PKeyRef, Private};
use openssl::x509::{X509Builder, X509Name, X509NameBuilder, X509};

use crate::crypto::crypto_impl::openssl::{
    p256_encode_point, p256_key_pair, p256_private_key, p256_public_key, OpensslBackendError,
    OpensslContext,
};
use crate::error::SupportError;
use crate::x509::{CertificateCryptoBackend, CertificateParams};

const SECONDS_PER_DAY: i64 = 86_400;

impl CertificateCryptoBackend for OpensslContext {
    fn generate_certificate(
        &mut self,
        subject_public_key: &[u8],
        signing_private_key: &[u8],
        params: &CertificateParams,
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let subject_key = p256_public_key(subject_public_key)?;
        let signing_key = PKey::from_ec_key(p256_private_key(signing_private_key)?)?;
        Ok(build_certificate(&subject_key, &signing_key, params)?.to_der()?)
    }

    fn create_pkcs12(
        &mut self,
        key_pair: &[u8],
        name: &str,
        certificate: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let pkey = PKey::from_ec_key(p256_key_pair(key_pair)?)?;
        let cert = parse_certificate(certificate)?;
        // An empty password rather than no encryption at all, some importers require one.
        let pkcs12 = Pkcs12::builder()
            .name(name)
            .pkey(&pkey)
            .cert(&cert)
            .build2("")?;
        Ok(pkcs12.to_der()?)
    }

    fn certificate_public_key(
        &mut self,
        certificate: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let cert = parse_certificate(certificate)?;
        let ec_key = cert
            .public_key()?
            .ec_key()
            .map_err(|e| SupportError::malformed(format!("certificate key is not EC: {e}")))?;
        if ec_key.group().curve_name() != Some(Nid::X9_62_PRIME256V1) {
            return Err(SupportError::malformed(
                "certificate key is not on curve P-256",
            ));
        }
        p256_encode_point(&ec_key)
    }

    fn certificate_signed_by_public_key(
        &mut self,
        certificate: &[u8],
        public_key: &[u8],
    ) -> Result<bool, SupportError<Self::Error>> {
        let cert = parse_certificate(certificate)?;
        let pkey = p256_public_key(public_key)?;
        match cert.verify(&pkey) {
            Ok(valid) => Ok(valid),
            Err(e) => {
                debug!("Certificate signature verification failed: {e}");
                Ok(false)
            }
        }
    }

    fn certificate_validity(
        &mut self,
        certificate: &[u8],
    ) -> Result<(i64, i64), SupportError<Self::Error>> {
        let cert = parse_certificate(certificate)?;
        let epoch = Asn1Time::from_unix(0)?;
        Ok((
            seconds_since(&epoch, cert.not_before())?,
            seconds_since(&epoch, cert.not_after())?,
        ))
    }
}

fn parse_certificate(certificate: &[u8]) -> Result<X509, SupportError<OpensslBackendError>> {
    X509::from_der(certificate)
        .map_err(|e| SupportError::malformed(format!("invalid X.509 certificate: {e}")))
}

fn seconds_since(
    epoch: &Asn1TimeRef,
    time: &Asn1TimeRef,
) -> Result<i64, SupportError<OpensslBackendError>> {
    let diff = epoch.diff(time)?;
    Ok(i64::from(diff.days) * SECONDS_PER_DAY + i64::from(diff.secs))
}

fn common_name(name: &str) -> Result<X509Name, SupportError<OpensslBackendError>> {
    let mut builder = X509NameBuilder::new()?;
    builder
        .append_entry_by_text("CN", name)
        .map_err(|e| SupportError::malformed(format!("invalid common name {name:?}: {e}")))?;
    Ok(builder.build())
}

fn unix_time(seconds: i64) -> Result<Asn1Time, SupportError<OpensslBackendError>> {
    let seconds = seconds
        .try_into()
        .map_err(|_| SupportError::malformed(format!("timestamp {seconds} out of range")))?;
    Ok(Asn1Time::from_unix(seconds)?)
}

/// Builds a v3 certificate for `subject_key`, signed with SHA-256 by `signing_key`.
fn build_certificate<T: HasPublic>(
    subject_key: &PKeyRef<T>,
    signing_key: &PKeyRef<Private>,
    params: &CertificateParams,
) -> Result<X509, SupportError<OpensslBackendError>> {
    let mut builder = X509Builder::new()?;
    // Zero-based, 2 is X.509 v3.
    builder.set_version(2)?;
    let serial = BigNum::from_dec_str(&params.serial_decimal).map_err(|e| {
        SupportError::malformed(format!(
            "serial {:?} is not a decimal number: {e}",
            params.serial_decimal
        ))
    })?;
    builder.set_serial_number(&*serial.to_asn1_integer()?)?;
    builder.set_issuer_name(&*common_name(&params.issuer)?)?;
    builder.set_subject_name(&*common_name(&params.subject)?)?;
    builder.set_not_before(&*unix_time(params.not_before)?)?;
    builder.set_not_after(&*unix_time(params.not_after)?)?;
    builder.set_pubkey(subject_key)?;
    builder.sign(signing_key, MessageDigest::sha256())?;
    Ok(builder.build())
}
