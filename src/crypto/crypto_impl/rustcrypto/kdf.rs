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
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;

use crate::error::SupportError;
use crate::key_agreement::KdfCryptoBackend;

use super::RustCryptoContext;

impl<RNG: RngCore + CryptoRng> KdfCryptoBackend for RustCryptoContext<RNG> {
    fn hkdf_sha256(
        &mut self,
        ikm: &[u8],
        salt: &[u8],
        info: &[u8],
        size: usize,
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        // An absent salt is treated as a zero-filled one (RFC 5869, section 2.2).
        let hkdf = Hkdf::<Sha256>::new((!salt.is_empty()).then_some(salt), ikm);
        let mut okm = vec![0u8; size];
        hkdf.expand(info, &mut okm)
            .map_err(|_| SupportError::malformed(format!("HKDF can't produce {size} bytes")))?;
        Ok(okm)
    }
}
