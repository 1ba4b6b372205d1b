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
    decrypt_aes_128_gcm, encrypt_aes_128_gcm, encrypt_aes_128_gcm_random_nonce,
    AeadCryptoBackend,
};
#[cfg(feature = "openssl")]
use crate::common::test_helper::openssl_ctx;
#[cfg(rustcrypto_aead_base)]
use crate::common::test_helper::rustcrypto_ctx;
use crate::common::test_helper::flip_bit;
use crate::error::ErrorKind;

const KEY: [u8; 16] = [0u8; 16];
const NONCE: [u8; 12] = [0u8; 12];

// AES-128-GCM with an all-zero key and nonce over "hello" and empty AAD.
const HELLO_BLOB: &str = "0000000000000000000000006bedb6a20ffc05f3475d29034caa1cc8fa3628c39f";

#[rstest]
#[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
#[cfg_attr(rustcrypto_aead_base, case::rustcrypto(rustcrypto_ctx()))]
fn encrypt_is_deterministic_for_fixed_nonce<B: AeadCryptoBackend>(#[case] mut backend: B) {
    let first = encrypt_aes_128_gcm(&mut backend, &KEY, &NONCE, b"hello", &[])
        .expect("encryption failed");
    let second = encrypt_aes_128_gcm(&mut backend, &KEY, &NONCE, b"hello", &[])
        .expect("encryption failed");
    assert_eq!(first, second);
    assert_eq!(hex::encode(&first), HELLO_BLOB);
    assert_eq!(&first[..12], &NONCE);
    assert_eq!(
        decrypt_aes_128_gcm(&mut backend, &KEY, &first, &[]).expect("decryption failed"),
        b"hello"
    );
}

#[rstest]
#[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
#[cfg_attr(rustcrypto_aead_base, case::rustcrypto(rustcrypto_ctx()))]
fn random_nonce_differs_between_calls<B: AeadCryptoBackend>(#[case] mut backend: B) {
    let first = encrypt_aes_128_gcm_random_nonce(&mut backend, &KEY, b"hello", &[])
        .expect("encryption failed");
    let second = encrypt_aes_128_gcm_random_nonce(&mut backend, &KEY, b"hello", &[])
        .expect("encryption failed");
    assert_ne!(first, second);
    for blob in [first, second] {
        assert_eq!(
            decrypt_aes_128_gcm(&mut backend, &KEY, &blob, &[]).expect("decryption failed"),
            b"hello"
        );
    }
}

#[rstest]
#[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
#[cfg_attr(rustcrypto_aead_base, case::rustcrypto(rustcrypto_ctx()))]
fn round_trip<B: AeadCryptoBackend>(
    #[case] mut backend: B,
    #[values(&b""[..], &b"a"[..], &[0x5au8; 100][..])] plaintext: &[u8],
    #[values(&b""[..], &b"associated data"[..])] aad: &[u8],
) {
    let key = [0x11u8; 16];
    let nonce = [0x22u8; 12];
    let blob = encrypt_aes_128_gcm(&mut backend, &key, &nonce, plaintext, aad)
        .expect("encryption failed");
    assert_eq!(blob.len(), plaintext.len() + 28);
    assert_eq!(
        decrypt_aes_128_gcm(&mut backend, &key, &blob, aad).expect("decryption failed"),
        plaintext
    );
}

#[rstest]
#[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
#[cfg_attr(rustcrypto_aead_base, case::rustcrypto(rustcrypto_ctx()))]
fn tampering_is_detected<B: AeadCryptoBackend>(#[case] mut backend: B) {
    let aad = b"profile";
    let blob = encrypt_aes_128_gcm(&mut backend, &KEY, &NONCE, b"secret data", aad)
        .expect("encryption failed");

    // Every region of the blob: nonce, ciphertext and tag.
    for index in [0, 11, 12, 20, blob.len() - 16, blob.len() - 1] {
        let err = decrypt_aes_128_gcm(&mut backend, &KEY, &flip_bit(&blob, index), aad)
            .expect_err("tampered data was decrypted");
        assert_eq!(err.kind(), ErrorKind::CryptographicFailure);
    }
    assert!(decrypt_aes_128_gcm(&mut backend, &KEY, &blob, &flip_bit(aad, 0)).is_err());
    assert!(decrypt_aes_128_gcm(&mut backend, &[1u8; 16], &blob, aad).is_err());
}

#[rstest]
#[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
#[cfg_attr(rustcrypto_aead_base, case::rustcrypto(rustcrypto_ctx()))]
fn invalid_lengths_are_rejected<B: AeadCryptoBackend>(#[case] mut backend: B) {
    let err = encrypt_aes_128_gcm(&mut backend, &[0u8; 15], &NONCE, b"x", &[])
        .expect_err("short key was accepted");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    let err = encrypt_aes_128_gcm(&mut backend, &[0u8; 32], &NONCE, b"x", &[])
        .expect_err("long key was accepted");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    let err = encrypt_aes_128_gcm(&mut backend, &KEY, &[0u8; 16], b"x", &[])
        .expect_err("long nonce was accepted");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    let err = decrypt_aes_128_gcm(&mut backend, &KEY, &[0u8; 27], &[])
        .expect_err("truncated blob was accepted");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    let err = decrypt_aes_128_gcm(&mut backend, &[0u8; 8], &[0u8; 28], &[])
        .expect_err("short key was accepted");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[rstest]
#[cfg_attr(feature = "openssl", case::openssl(openssl_ctx()))]
#[cfg_attr(rustcrypto_aead_base, case::rustcrypto(rustcrypto_ctx()))]
fn backend_rejects_input_shorter_than_tag<B: AeadCryptoBackend>(
    #[case] mut backend: B,
    #[values(0, 1, 15)] length: usize,
) {
    let err = backend
        .decrypt_aes_128_gcm(&KEY, &NONCE, &vec![0u8; length], &[])
        .expect_err("input shorter than the tag was accepted");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}
