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
use openssl::derive::Deriver;
use openssl::pkey::PKey;

use crate::crypto::crypto_impl::openssl::{p256_private_key, p256_public_key, OpensslContext};
use crate::error::SupportError;
use crate::key_agreement::KeyAgreementCryptoBackend;

impl KeyAgreementCryptoBackend for OpensslContext {
    fn ecdh_p256(
        &mut self,
        public_key: &[u8],
        private_key: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let peer = p256_public_key(public_key)?;
        let own = PKey::from_ec_key(p256_private_key(private_key)?)?;
        let mut deriver = Deriver::new(&own)?;
        deriver.set_peer(&peer)?;
        Ok(deriver.derive_to_vec()?)
    }
}
