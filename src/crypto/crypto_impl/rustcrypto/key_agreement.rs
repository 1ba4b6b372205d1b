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
use p256::ecdh::diffie_hellman;
use rand::{CryptoRng, RngCore};

use crate::error::SupportError;
use crate::key_agreement::KeyAgreementCryptoBackend;

use super::{p256_public_key, p256_secret_key, RustCryptoContext};

impl<RNG: RngCore + CryptoRng> KeyAgreementCryptoBackend for RustCryptoContext<RNG> {
    fn ecdh_p256(
        &mut self,
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let peer = p256_public_key(public_key)?;
        let own = p256_secret_key(private_key)?;
        let shared = diffie_hellman(own.to_nonzero_scalar(), peer.as_affine());
        Ok(shared.raw_secret_bytes().to_vec())
    }
}
