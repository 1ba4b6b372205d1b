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
use rstest::rstest;

use super::{
    certificate_chain_join, certificate_chain_split, certificate_find_public_key,
    certificate_find_signature, certificate_tbs_certificate, CertificateParams,
};
use crate::error::ErrorKind;

/// Self-signed P-256 certificate for CN=Fixture, serial 7, without extensions.
const FIXTURE: &str = "308201103081b7a003020102020107300a06082a8648ce3d04030230123110300e06035504\
                       030c0746697874757265301e170d3233313131343232313332305a170d33303033313731\
                       37343634305a30123110300e06035504030c07466978747572653059301306072a8648ce\
                       3d020106082a8648ce3d030107034200049fad84aeae08bbef7f010014d82cef6a09de2b\
                       0cf871b5ce0c4f1d13a59a593407cb45769f1070e2c2470fe5b1bfe63133c0b0cdc64ea4\
                       bf3791a8ec2a07fd4f300a06082a8648ce3d040302034800304502201e15e3f841e4c624\
                       827986bab4361d1c3336858c6fe486d3648e310de7bf39910221009fd926f4766b2935bb\
                       57129477547b29960758f0227d9fa3d54f5d7b4ea21080";

const FIXTURE_PUBLIC_KEY: &str = "049fad84aeae08bbef7f010014d82cef6a09de2b0cf871b5ce0c4f1d13a59a\
                                  593407cb45769f1070e2c2470fe5b1bfe63133c0b0cdc64ea4bf3791a8ec2a\
                                  07fd4f";

fn fixture() -> Vec<u8> {
    hex::decode(FIXTURE).expect("invalid fixture")
}

#[test]
fn split_empty_chain() {
    assert!(certificate_chain_split(&[])
        .expect("empty chain is valid")
        .is_empty());
}

#[test]
fn split_and_join_are_inverse() {
    let certificates = vec![fixture(); 3];
    let chain = certificate_chain_join(&certificates);
    assert_eq!(chain.len(), 3 * 276);
    assert_eq!(
        certificate_chain_split(&chain).expect("split failed"),
        certificates
    );
}

#[rstest]
#[case::not_a_sequence(vec![0x31, 0x00])]
#[case::truncated_header(vec![0x30])]
#[case::truncated_content(vec![0x30, 0x05, 0x00, 0x00])]
#[case::truncated_long_length(vec![0x30, 0x82, 0x01])]
#[case::indefinite_length(vec![0x30, 0x80, 0x00, 0x00])]
#[case::oversized_length(vec![0x30, 0x85, 0x01, 0x00, 0x00, 0x00, 0x00])]
#[case::trailing_garbage(vec![0x30, 0x00, 0xff])]
#[case::sequence_that_is_not_a_certificate(vec![0x30, 0x03, 0x02, 0x01, 0x05])]
#[case::non_minimal_length(vec![0x30, 0x81, 0x03, 0x02, 0x01, 0x05])]
#[case::certificate_with_non_minimal_length({
    let mut certificate = vec![0x30, 0x83, 0x00];
    certificate.extend(&fixture()[2..]);
    certificate
})]
#[case::certificate_followed_by_garbage({
    let mut chain = fixture();
    chain.extend([0x30, 0x03, 0x02, 0x01, 0x05]);
    chain
})]
fn split_rejects_malformed_chains(#[case] chain: Vec<u8>) {
    let err = certificate_chain_split(&chain).expect_err("malformed chain was split");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn structure_of_fixture() {
    let certificate = fixture();
    let (offset, size) = certificate_find_public_key(&certificate).expect("no public key");
    assert_eq!((offset, size), (125, 65));
    assert_eq!(
        hex::encode(&certificate[offset..offset + size]),
        FIXTURE_PUBLIC_KEY
    );
    assert_eq!(
        certificate_tbs_certificate(&certificate).expect("no tbs"),
        (4, 186)
    );
    let (offset, size) = certificate_find_signature(&certificate).expect("no signature");
    assert_eq!((offset, size), (205, 71));
    assert_eq!(offset + size, certificate.len());
    // The signature value is itself a DER ECDSA signature.
    assert_eq!(certificate[offset], 0x30);
}

#[rstest]
#[case::not_der(b"certificate".to_vec())]
#[case::empty_sequence(vec![0x30, 0x00])]
#[case::no_tbs(vec![0x30, 0x03, 0x02, 0x01, 0x01])]
#[case::trailing_data({
    let mut certificate = fixture();
    certificate.push(0x00);
    certificate
})]
#[case::truncated(fixture()[..200].to_vec())]
fn structure_of_invalid_certificates(#[case] certificate: Vec<u8>) {
    for result in [
        certificate_find_public_key(&certificate),
        certificate_tbs_certificate(&certificate),
        certificate_find_signature(&certificate),
    ] {
        assert_eq!(
            result.expect_err("invalid certificate was parsed").kind(),
            ErrorKind::MalformedInput
        );
    }
}

#[test]
fn certificate_params_builder_validates() {
    let params = CertificateParams::builder()
        .serial_decimal("42")
        .issuer("Issuer")
        .subject("Subject")
        .not_before(0)
        .not_after(100)
        .build()
        .expect("valid params were rejected");
    assert_eq!(params.serial_decimal, "42");

    assert!(CertificateParams::builder()
        .serial_decimal("0x2a")
        .issuer("Issuer")
        .subject("Subject")
        .not_before(0)
        .not_after(100)
        .build()
        .is_err());
    assert!(CertificateParams::builder()
        .serial_decimal("1")
        .issuer("Issuer")
        .subject("Subject")
        .not_before(100)
        .not_after(0)
        .build()
        .is_err());
    assert!(CertificateParams::builder()
        .serial_decimal("1")
        .issuer("Issuer")
        .build()
        .is_err());
}

#[cfg(feature = "openssl")]
mod with_backend {
    use rstest::rstest;

    use crate::common::test_helper::{chain_certificates, flip_bit, openssl_ctx};
    use crate::ec::{
        check_ecdsa_signature, create_ec_key_pair, ec_key_pair_get_private_key,
        ec_key_pair_get_public_key,
    };
    use crate::error::ErrorKind;
    use crate::x509::{
        certificate_chain_get_top_most_key, certificate_chain_join, certificate_chain_split,
        certificate_chain_validate, certificate_find_public_key, certificate_find_signature,
        certificate_get_validity, certificate_signed_by_public_key, certificate_tbs_certificate,
        ec_key_pair_get_pkcs12, ec_public_key_generate_certificate, CertificateCryptoBackend,
        CertificateParams,
    };

    const NOT_BEFORE: i64 = 1_700_000_000;
    const NOT_AFTER: i64 = 1_900_000_000;

    fn params(serial: &str, issuer: &str, subject: &str) -> CertificateParams {
        CertificateParams::builder()
            .serial_decimal(serial)
            .issuer(issuer)
            .subject(subject)
            .not_before(NOT_BEFORE)
            .not_after(NOT_AFTER)
            .build()
            .expect("invalid certificate params")
    }

    struct Chain {
        certificates: Vec<Vec<u8>>,
        public_keys: Vec<Vec<u8>>,
    }

    /// Creates leaf, intermediate and root certificates, in that order.
    fn three_level_chain<B: CertificateCryptoBackend>(backend: &mut B) -> Chain {
        let mut public_keys = Vec::new();
        let mut private_keys = Vec::new();
        for _ in 0..3 {
            let key_pair = create_ec_key_pair(backend).expect("key generation failed");
            public_keys.push(ec_key_pair_get_public_key(backend, &key_pair).expect("no key"));
            private_keys.push(ec_key_pair_get_private_key(backend, &key_pair).expect("no key"));
        }
        let names = ["Leaf", "Intermediate", "Root"];
        let mut certificates = Vec::new();
        for level in 0..3 {
            let issuer = (level + 1).min(2);
            certificates.push(
                ec_public_key_generate_certificate(
                    backend,
                    &public_keys[level],
                    &private_keys[issuer],
                    &params(&(level + 1).to_string(), names[issuer], names[level]),
                )
                .expect("certificate generation failed"),
            );
        }
        Chain {
            certificates,
            public_keys,
        }
    }

    #[rstest]
    #[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
    fn valid_chains<B: CertificateCryptoBackend>(#[case] mut backend: B) {
        let chain = three_level_chain(&mut backend);
        let joined = certificate_chain_join(&chain.certificates);
        assert_eq!(
            certificate_chain_split(&joined).expect("split failed"),
            chain.certificates
        );
        assert!(certificate_chain_validate(&mut backend, &joined).expect("validation failed"));
        assert!(certificate_chain_validate(&mut backend, &chain.certificates[0])
            .expect("validation failed"));
        assert!(certificate_chain_validate(
            &mut backend,
            &certificate_chain_join(&chain.certificates[1..])
        )
        .expect("validation failed"));
        assert_eq!(
            certificate_chain_get_top_most_key(&mut backend, &joined).expect("no key"),
            chain.public_keys[0]
        );
    }

    #[rstest]
    #[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
    fn shared_certificate_fixtures_form_a_chain<B: CertificateCryptoBackend>(
        #[case] mut backend: B,
    ) {
        let certificates = chain_certificates(3);
        let chain = certificate_chain_join(&certificates);
        assert_eq!(
            certificate_chain_split(&chain).expect("split failed"),
            certificates
        );
        assert!(certificate_chain_validate(&mut backend, &chain).expect("validation failed"));
    }

    #[rstest]
    #[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
    fn broken_chains<B: CertificateCryptoBackend>(#[case] mut backend: B) {
        let chain = three_level_chain(&mut backend);

        let reordered = certificate_chain_join(&[
            chain.certificates[1].clone(),
            chain.certificates[0].clone(),
            chain.certificates[2].clone(),
        ]);
        assert!(!certificate_chain_validate(&mut backend, &reordered).expect("validation failed"));

        let skipped = certificate_chain_join(&[
            chain.certificates[0].clone(),
            chain.certificates[2].clone(),
        ]);
        assert!(!certificate_chain_validate(&mut backend, &skipped).expect("validation failed"));

        for level in 0..2 {
            let (offset, size) =
                certificate_find_signature(&chain.certificates[level]).expect("no signature");
            let mut certificates = chain.certificates.clone();
            certificates[level] = flip_bit(&certificates[level], offset + size - 1);
            let tampered = certificate_chain_join(&certificates);
            assert!(
                !certificate_chain_validate(&mut backend, &tampered).expect("validation failed")
            );
        }

        let err = certificate_chain_validate(&mut backend, &[])
            .expect_err("empty chain was validated");
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
        let err = certificate_chain_get_top_most_key(&mut backend, &[])
            .expect_err("empty chain has a key");
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    }

    #[rstest]
    #[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
    fn certificate_structure<B: CertificateCryptoBackend>(#[case] mut backend: B) {
        let chain = three_level_chain(&mut backend);
        let leaf = &chain.certificates[0];

        let (offset, size) = certificate_find_public_key(leaf).expect("no public key");
        assert_eq!(size, 65);
        assert_eq!(&leaf[offset..offset + size], chain.public_keys[0].as_slice());

        // The signature found in the certificate is over its tbsCertificate.
        let (tbs_offset, tbs_size) = certificate_tbs_certificate(leaf).expect("no tbs");
        assert_eq!(leaf[tbs_offset], 0x30);
        let (sig_offset, sig_size) = certificate_find_signature(leaf).expect("no signature");
        assert!(sig_offset > tbs_offset + tbs_size);
        assert_eq!(sig_offset + sig_size, leaf.len());
        let digest = backend
            .sha256(&leaf[tbs_offset..tbs_offset + tbs_size])
            .expect("digest failed");
        assert!(check_ecdsa_signature(
            &mut backend,
            &digest,
            &leaf[sig_offset..sig_offset + sig_size],
            &chain.public_keys[1]
        )
        .expect("check failed"));

        assert!(
            certificate_signed_by_public_key(&mut backend, leaf, &chain.public_keys[1])
                .expect("check failed")
        );
        assert!(
            !certificate_signed_by_public_key(&mut backend, leaf, &chain.public_keys[2])
                .expect("check failed")
        );
        assert_eq!(
            certificate_get_validity(&mut backend, leaf).expect("no validity"),
            (NOT_BEFORE, NOT_AFTER)
        );
    }

    #[rstest]
    #[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
    fn pkcs12_contains_self_signed_certificate<B: CertificateCryptoBackend>(
        #[case] mut backend: B,
    ) {
        let key_pair = create_ec_key_pair(&mut backend).expect("key generation failed");
        let public_key = ec_key_pair_get_public_key(&mut backend, &key_pair).expect("no key");
        let pkcs12 = ec_key_pair_get_pkcs12(
            &mut backend,
            &key_pair,
            "credential key",
            &params("1", "Self", "Self"),
        )
        .expect("PKCS#12 creation failed");

        let parsed = openssl::pkcs12::Pkcs12::from_der(&pkcs12)
            .expect("invalid PKCS#12")
            .parse2("")
            .expect("PKCS#12 does not open with the empty password");
        let certificate = parsed
            .cert
            .expect("PKCS#12 has no certificate")
            .to_der()
            .expect("encoding failed");
        assert!(parsed.pkey.is_some());
        assert!(certificate_chain_validate(&mut backend, &certificate).expect("invalid"));
        assert!(certificate_signed_by_public_key(&mut backend, &certificate, &public_key)
            .expect("check failed"));
    }

    #[rstest]
    #[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
    fn generation_rejects_invalid_input<B: CertificateCryptoBackend>(#[case] mut backend: B) {
        let key_pair = create_ec_key_pair(&mut backend).expect("key generation failed");
        let public_key = ec_key_pair_get_public_key(&mut backend, &key_pair).expect("no key");
        let private_key = ec_key_pair_get_private_key(&mut backend, &key_pair).expect("no key");

        let bad_serial = CertificateParams {
            serial_decimal: "twelve".to_string(),
            ..params("1", "Issuer", "Subject")
        };
        let err = ec_public_key_generate_certificate(
            &mut backend,
            &public_key,
            &private_key,
            &bad_serial,
        )
        .expect_err("invalid serial was accepted");
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = ec_public_key_generate_certificate(
            &mut backend,
            &public_key[..33],
            &private_key,
            &params("1", "Issuer", "Subject"),
        )
        .expect_err("truncated public key was accepted");
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = certificate_get_validity(&mut backend, b"not a certificate")
            .expect_err("garbage was parsed");
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }
}
