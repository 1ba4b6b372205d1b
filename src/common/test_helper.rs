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

//! Contains a few helper functions intended purely for tests.
//! Not intended to be used outside of this crate.

#[cfg(rustcrypto_base)]
use rand::rngs::ThreadRng;
use rstest::fixture;

#[cfg(feature = "openssl")]
use crate::crypto::crypto_impl::openssl::OpensslContext;
#[cfg(rustcrypto_base)]
use crate::crypto::crypto_impl::rustcrypto::RustCryptoContext;

/// Routes `log` output of the code under test to the test harness.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(feature = "openssl")]
#[fixture]
pub(crate) fn openssl_ctx() -> OpensslContext {
    init_logger();
    OpensslContext::new()
}

#[cfg(rustcrypto_base)]
#[fixture]
pub(crate) fn rustcrypto_ctx() -> RustCryptoContext<ThreadRng> {
    init_logger();
    RustCryptoContext::new(rand::thread_rng())
}

/// Flips the lowest bit of the byte at `index`.
pub(crate) fn flip_bit(data: &[u8], index: usize) -> Vec<u8> {
    let mut data = data.to_vec();
    data[index] ^= 0x01;
    data
}

/// DER encoded P-256 certificates for CN=Leaf, CN=Intermediate and CN=Root, in chain order.
///
/// Each one is signed with ECDSA and SHA-256 by the key of its successor, the root is self-signed.
const CHAIN_CERTIFICATES: [&str; 3] = [
    "308201113081b9a003020102020101300a06082a8648ce3d0403023017311530130603550403\
     0c0c496e7465726d656469617465301e170d3233313131343232313332305a170d3330303331\
     373137343634305a300f310d300b06035504030c044c6561663059301306072a8648ce3d0201\
     06082a8648ce3d030107034200040dcc7648c78a3118f2612866fe83ef19f40304f623399e12\
     11a10f2b3d1c05cf30e8027677bcb912943e99ff71140ea9bc24713be1b75c31ff4054724c4f\
     9d00300a06082a8648ce3d040302034700304402202a0971f065a944265854cea4c84d9928f3\
     ee6ce414b9a2eb21dcfc953207bc950220267928f2a8908b756220cc857d3f1ba7fd4289226a\
     b97ffdb8e7de02d38bbaba",
    "308201133081b9a003020102020102300a06082a8648ce3d040302300f310d300b0603550403\
     0c04526f6f74301e170d3233313131343232313332305a170d3330303331373137343634305a\
     30173115301306035504030c0c496e7465726d6564696174653059301306072a8648ce3d0201\
     06082a8648ce3d03010703420004a62f048f367359809c2d46c2049d7d7bf268c3c073c47275\
     3cb18a24a8ad20b1caccf8104b666795c7f35dac9dc444b3c2c61978198c49859955b99956da\
     5edb300a06082a8648ce3d0403020349003046022100e8ac159895b36271dffe3e56415a403d\
     8e93d4307df36e2f2d7aaebb249327ee022100b555b27f66d3b2ea0d75122f900c7d6c4b476f\
     4cd92ab3f0efbf183fc4674622",
    "3082010a3081b1a003020102020103300a06082a8648ce3d040302300f310d300b0603550403\
     0c04526f6f74301e170d3233313131343232313332305a170d3330303331373137343634305a\
     300f310d300b06035504030c04526f6f743059301306072a8648ce3d020106082a8648ce3d03\
     0107034200048570e95d85825286db92c78317679bdd8ffe3c90d0af84291bf64132b66fcc99\
     c926f087212d75b1f4dbc5d4999b4c5605adf66db801a4de371cdad39ebc55e5300a06082a86\
     48ce3d04030203480030450221009efc4bdc08a61aabce5cdbd797156d8af38b1f752cc3b3d9\
     42f9af151e57e1f0022050f26e791adf3158af5d26d956476a4ce8c96bafb82f283922ece8b8\
     1374bac6",
];

/// Returns the first `count` certificates of a valid leaf to root chain.
pub(crate) fn chain_certificates(count: usize) -> Vec<Vec<u8>> {
    CHAIN_CERTIFICATES[..count]
        .iter()
        .map(|certificate| hex::decode(certificate).expect("invalid certificate fixture"))
        .collect()
}
