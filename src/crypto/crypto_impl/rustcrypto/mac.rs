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
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha2::Sha256;

use crate::cose::MacCryptoBackend;
use crate::error::SupportError;

use super::RustCryptoContext;

impl<RNG: RngCore + CryptoRng> MacCryptoBackend for RustCryptoContext<RNG> {
    fn hmac_sha256(
        &mut self,
        key: &[u8],
        data: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let mut hmac = <Hmac<Sha256> as Mac>::new_from_slice(key)?;
        hmac.update(data);
        Ok(hmac.finalize().into_bytes().to_vec())
    }
}
