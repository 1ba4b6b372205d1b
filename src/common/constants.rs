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

//! Constants shared by the modules of this crate.

/// Integer labels and algorithm identifiers used in COSE structures.
pub mod cose {
    /// Header label for the algorithm, see section 3.1 of
    /// [RFC 8152](https://www.rfc-editor.org/rfc/rfc8152.html).
    pub const LABEL_ALG: i64 = 1;

    /// Header label for an X.509 certificate chain, see section 2 of
    /// [RFC 9360](https://www.rfc-editor.org/rfc/rfc9360.html).
    pub const LABEL_X5CHAIN: i64 = 33;

    /// ECDSA using P-256 and SHA-256 ("ES256").
    pub const ALG_ECDSA_256: i64 = -7;

    /// HMAC using SHA-256 with a 256 bit tag ("HMAC 256/256").
    pub const ALG_HMAC_256_256: i64 = 5;

    /// Context string of the `Sig_structure` for COSE_Sign1.
    pub const SIGNATURE1_CONTEXT: &str = "Signature1";

    /// Context string of the `MAC_structure` for COSE_Mac0.
    pub const MAC0_CONTEXT: &str = "MAC0";

    /// Size of an ECDSA P-256 signature in COSE (`r || s`) form.
    pub const ECDSA_SIGNATURE_SIZE: usize = 64;
}

/// Sizes used by the AES-128-GCM engine.
pub mod aead {
    /// Size of an AES-128 key.
    pub const AES_128_KEY_SIZE: usize = 16;

    /// Size of the nonce prefixed to every authenticated ciphertext.
    pub const AES_GCM_NONCE_SIZE: usize = 12;

    /// Size of the authentication tag appended to every authenticated ciphertext.
    pub const AES_GCM_TAG_SIZE: usize = 16;

    /// Smallest possible authenticated ciphertext (empty plaintext).
    pub const MIN_CIPHERTEXT_SIZE: usize = AES_GCM_NONCE_SIZE + AES_GCM_TAG_SIZE;
}

/// Sizes of P-256 key material.
pub mod ec {
    /// Size of a single P-256 coordinate or private scalar.
    pub const P256_COORDINATE_SIZE: usize = 32;

    /// Size of an uncompressed P-256 point (`0x04 || X || Y`).
    pub const P256_UNCOMPRESSED_POINT_SIZE: usize = 1 + 2 * P256_COORDINATE_SIZE;

    /// Leading byte of an uncompressed SEC1 point.
    pub const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

    /// Size of a SHA-256 digest.
    pub const SHA256_DIGEST_SIZE: usize = 32;
}

/// CBOR semantic tag for embedded, encoded CBOR data items (RFC 8949, section 3.4.5.1).
pub const SEMANTIC_TAG_ENCODED_CBOR: u64 = 24;

/// Symmetric key used by software implementations in place of a hardware-bound key.
///
/// Never use this for anything except testing and emulation.
pub const TEST_HARDWARE_BOUND_KEY: [u8; 16] = [0u8; 16];
