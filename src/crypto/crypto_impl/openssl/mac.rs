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
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::sign::Signer;

use crate::cose::MacCryptoBackend;
use crate::crypto::crypto_impl::openssl::OpensslContext;
use crate::error::SupportError;

impl MacCryptoBackend for OpensslContext {
    fn hmac_sha256(
        &mut self,
        key: &[u8],
        data: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let hmac_key = PKey::hmac(key)?;
        let mut signer = Signer::new(MessageDigest::sha256(), &hmac_key)?;
        Ok(signer.sign_oneshot_to_vec(data)?)
    }
}
