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
use openssl::cipher::Cipher;
use openssl::cipher_ctx::CipherCtx;

use crate::aead::AeadCryptoBackend;
use crate::common::constants::aead::AES_GCM_TAG_SIZE;
use crate::crypto::crypto_impl::openssl::OpensslContext;
use crate::error::SupportError;

impl AeadCryptoBackend for OpensslContext {
    fn encrypt_aes_128_gcm(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let mut ctx = CipherCtx::new()?;
        // Refer to https://wiki.openssl.org/index.php/EVP_Authenticated_Encryption_and_Decryption#Authenticated_Encryption_using_GCM_mode
        // for reference.
        // 1. First, we set the cipher.
        ctx.encrypt_init(Some(Cipher::aes_128_gcm()), None, None)?;
        // 2. The IV length must be set _before_ setting key and IV.
        ctx.set_iv_length(nonce.len())?;
        // 3. Now we can set key and IV.
        ctx.encrypt_init(None, Some(key), Some(nonce))?;
        // 4. The AAD must be provided _before_ the plaintext.
        ctx.cipher_update(aad, None)?;
        let mut ciphertext = Vec::with_capacity(plaintext.len() + AES_GCM_TAG_SIZE);
        ctx.cipher_update_vec(plaintext, &mut ciphertext)?;
        ctx.cipher_final_vec(&mut ciphertext)?;
        let ciphertext_len = ciphertext.len();
        ciphertext.resize(ciphertext_len + AES_GCM_TAG_SIZE, 0u8);
        ctx.tag(&mut ciphertext[ciphertext_len..])?;
        Ok(ciphertext)
    }

    fn decrypt_aes_128_gcm(
        &mut self,
        key: &[u8],
        nonce: &[u8],
        ciphertext_with_tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let Some(ciphertext_len) = ciphertext_with_tag.len().checked_sub(AES_GCM_TAG_SIZE) else {
            return Err(SupportError::malformed(
                "ciphertext is shorter than the AES-GCM tag",
            ));
        };
        let (ciphertext, auth_tag) = ciphertext_with_tag.split_at(ciphertext_len);

        let mut ctx = CipherCtx::new()?;
        // Refer to https://wiki.openssl.org/index.php/EVP_Authenticated_Encryption_and_Decryption#Authenticated_Decryption_using_GCM_mode
        // for reference.
        ctx.decrypt_init(Some(Cipher::aes_128_gcm()), None, None)?;
        ctx.set_iv_length(nonce.len())?;
        ctx.decrypt_init(None, Some(key), Some(nonce))?;
        ctx.cipher_update(aad, None)?;
        let mut plaintext = vec![0; ciphertext.len()];
        let mut plaintext_size = ctx.cipher_update(ciphertext, Some(&mut plaintext))?;
        // The expected tag must be set right before the finalization call.
        ctx.set_tag(auth_tag)?;
        // Finalization is where the tag is checked, any failure here is an authentication failure.
        plaintext_size += ctx
            .cipher_final_vec(&mut plaintext)
            .map_err(|_| SupportError::verification("AES-GCM tag mismatch"))?;
        plaintext.truncate(plaintext_size);

        Ok(plaintext)
    }
}
