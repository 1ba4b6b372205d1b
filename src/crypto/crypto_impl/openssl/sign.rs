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
use log::{debug, error};
use openssl::bn::BigNum;
use openssl::ec::EcKey;
use openssl::ecdsa::EcdsaSig;
use openssl::pkey::PKey;
use openssl::pkey_ctx::PkeyCtx;

use crate::common::constants::ec::P256_COORDINATE_SIZE;
use crate::crypto::crypto_impl::openssl::{
    p256_encode_point, p256_group, p256_key_pair, p256_private_key, p256_public_key,
    OpensslBackendError, OpensslContext,
};
use crate::ec::SignCryptoBackend;
use crate::error::SupportError;

// Possible truncation is fine, the coordinate size is a small constant.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const PAD_SIZE: i32 = P256_COORDINATE_SIZE as i32;

impl SignCryptoBackend for OpensslContext {
    fn generate_ec_key_pair(&mut self) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let group = p256_group()?;
        let ec_key = EcKey::generate(&group)?;
        Ok(PKey::from_ec_key(ec_key)?.private_key_to_pkcs8()?)
    }

    fn ec_key_pair_public_key(
        &mut self,
        key_pair: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let ec_key = p256_key_pair(key_pair)?;
        p256_encode_point(&ec_key)
    }

    fn ec_key_pair_private_key(
        &mut self,
        key_pair: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let ec_key = p256_key_pair(key_pair)?;
        Ok(ec_key.private_key().to_vec_padded(PAD_SIZE)?)
    }

    fn ec_private_key_to_key_pair(
        &mut self,
        private_key: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let ec_key = p256_private_key(private_key)?;
        Ok(PKey::from_ec_key(ec_key)?.private_key_to_pkcs8()?)
    }

    fn sign_ecdsa_digest(
        &mut self,
        key_pair: &[u8],
        digest: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let pkey = PKey::from_ec_key(p256_key_pair(key_pair)?)?;
        // Without a message digest set on the context, the input is signed as a precomputed hash.
        let mut ctx = PkeyCtx::new(&pkey)?;
        ctx.sign_init()?;
        let mut signature = Vec::new();
        ctx.sign_to_vec(digest, &mut signature)?;
        Ok(signature)
    }

    fn verify_ecdsa_digest(
        &mut self,
        public_key: &[u8],
        digest: &[u8],
        der_signature: &[u8],
    ) -> Result<bool, SupportError<Self::Error>> {
        let pkey = p256_public_key(public_key)?;
        if let Err(e) = EcdsaSig::from_der(der_signature) {
            error!("ECDSA signature is not valid DER: {e}");
            return Ok(false);
        }
        let mut ctx = PkeyCtx::new(&pkey)?;
        ctx.verify_init()?;
        match ctx.verify(digest, der_signature) {
            Ok(valid) => Ok(valid),
            Err(e) => {
                debug!("ECDSA verification rejected the signature: {e}");
                Ok(false)
            }
        }
    }

    fn ecdsa_der_to_cose(
        &mut self,
        der_signature: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let signature = EcdsaSig::from_der(der_signature)
            .map_err(|e| SupportError::malformed(format!("invalid DER ECDSA signature: {e}")))?;
        // d2i stops after the first element, so trailing or non-canonical bytes only show up
        // when re-encoding.
        if signature.to_der()? != der_signature {
            return Err(SupportError::malformed(
                "DER ECDSA signature is not canonically encoded",
            ));
        }
        // See RFC 8152, section 8.1
        let mut cose_signature = pad_integer(signature.r())?;
        cose_signature.append(&mut pad_integer(signature.s())?);
        Ok(cose_signature)
    }

    fn ecdsa_cose_to_der(
        &mut self,
        cose_signature: &[u8],
    ) -> Result<Vec<u8>, SupportError<Self::Error>> {
        let (r, s) = cose_signature.split_at(P256_COORDINATE_SIZE);
        let r = BigNum::from_slice(r)?;
        let s = BigNum::from_slice(s)?;
        // Note: EcdsaSig has its own "verify" method, but it is deprecated since OpenSSL
        // 3.0, which is why it's only used to build the DER encoding here.
        Ok(EcdsaSig::from_private_components(r, s)?.to_der()?)
    }
}

fn pad_integer(
    value: &openssl::bn::BigNumRef,
) -> Result<Vec<u8>, SupportError<OpensslBackendError>> {
    if value.num_bytes() > PAD_SIZE {
        return Err(SupportError::malformed(format!(
            "ECDSA signature integer of {} bytes does not fit into {P256_COORDINATE_SIZE} bytes",
            value.num_bytes()
        )));
    }
    Ok(value.to_vec_padded(PAD_SIZE)?)
}
