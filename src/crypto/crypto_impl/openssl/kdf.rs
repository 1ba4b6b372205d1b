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
use openssl::md::Md;
use openssl::pkey::Id;
use openssl::pkey_ctx::PkeyCtx;

use crate::crypto::crypto_impl::openssl::OpensslContext;
use crate::error::SupportError;
use crate::key_agreement::KdfCryptoBackend;

impl KdfCryptoBackend for OpensslContext {
    fn hkdf_sha256(
        &mut self,
        ikm: &[u8],
        salt: &[u8],
        info: &[u8],
        size: usize,
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let mut ctx = PkeyCtx::new_id(Id::HKDF)?;
        ctx.derive_init()?;
        ctx.set_hkdf_md(Md::sha256())?;
        ctx.set_hkdf_key(ikm)?;
        // An absent salt is treated as a string of zeros by HKDF-Extract.
        if !salt.is_empty() {
            ctx.set_hkdf_salt(salt)?;
        }
        ctx.add_hkdf_info(info)?;
        let mut okm = vec![0u8; size];
        let written = ctx.derive(Some(&mut okm))?;
        okm.truncate(written);
        Ok(okm)
    }
}
