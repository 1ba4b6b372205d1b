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
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use rand::{CryptoRng, RngCore};

use crate::aead::AeadCryptoBackend;
use crate::common::constants::aead::AES_GCM_TAG_SIZE;
use crate::error::SupportError;

use super::RustCryptoContext;

impl<RNG: RngCore + CryptoRng> AeadCryptoBackend for RustCryptoContext<RNG> {
    fn encrypt_aes_128_gcm(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        // Key and nonce lengths are checked by the caller, from_slice would panic otherwise.
        let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key));
        let payload = Payload {
            msg: plaintext,
            aad,
        };
        cipher
            .encrypt(Nonce::from_slice(nonce), payload)
            .map_err(SupportError::from)
    }

    fn decrypt_aes_128_gcm(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        ciphertext_with_tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        if ciphertext_with_tag.len() < AES_GCM_TAG_SIZE {
            return Err(SupportError::malformed(
                "ciphertext is shorter than the AES-GCM tag",
            ));
        }
        let cipher = Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key));
        let payload = Payload {
            msg: ciphertext_with_tag,
            aad,
        };
        cipher
            .decrypt(Nonce::from_slice(nonce), payload)
            .map_err(SupportError::from)
    }
}
