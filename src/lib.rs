/*
 * Copyright (c) 2022 The NAMIB Project Developers.
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! Cryptographic support primitives for identity credentials (mobile driving licences and other
//! ISO/IEC 18013-5 style documents).
//!
//! This crate contains the envelope and codec logic that identity credential implementations need
//! to package data for signing, MACing and encryption:
//! - [AES-128-GCM](aead) with a self-contained `nonce || ciphertext || tag` layout,
//! - [P-256 keys and ECDSA](ec), including conversion between DER and COSE signatures,
//! - [X.509 certificates and chains](x509) (creation, splitting, structural validation),
//! - [COSE_Sign1 and COSE_Mac0](cose) envelopes as used by mdoc issuer and device
//!   authentication, including derivation of the device MAC key,
//! - [integrity tags for access control profiles](access_control),
//! - [ECDH and HKDF](key_agreement),
//! - and a few helpers for hex, chunking and [pretty-printing CBOR](common::cbor_print).
//!
//! Key storage policy, IPC framing and attestation records are *out of scope* for this crate.
//!
//! # Usage
//! ```toml
//! [dependencies]
//! idcred = { version = "^0.1.0" }
//! ```
//! The actual cryptographic primitives are provided by a backend (see [`crypto`]). By default,
//! the OpenSSL backend ([`OpensslContext`]) is enabled. Alternatively, the RustCrypto backend can
//! be used by enabling the `rustcrypto` feature (or one of the more specific `rustcrypto-*`
//! features):
//! ```toml
//! [dependencies]
//! idcred = { version = "^0.1.0", default-features = false, features = ["rustcrypto"] }
//! ```
//! Note that X.509 certificate creation and verification is only available with OpenSSL.
//!
//! # Example
//! Every operation takes the backend as its first argument. Checks return `Ok(false)` if the
//! checked data is not authentic, errors are reserved for malformed input and backend failures.
//! ```
//! # #[cfg(feature = "openssl")] {
//! use idcred::cose::{cose_check_ecdsa_signature, cose_sign_ecdsa, cose_sign_get_x5chain};
//! use idcred::ec::{create_ec_key_pair, ec_key_pair_get_private_key, ec_key_pair_get_public_key};
//! use idcred::x509::{ec_public_key_generate_certificate, CertificateParams};
//! use idcred::OpensslContext;
//!
//! let mut backend = OpensslContext::new();
//! let key_pair = create_ec_key_pair(&mut backend)?;
//! let public_key = ec_key_pair_get_public_key(&mut backend, &key_pair)?;
//! let private_key = ec_key_pair_get_private_key(&mut backend, &key_pair)?;
//!
//! let params = CertificateParams::builder()
//!     .serial_decimal("1")
//!     .issuer("Issuer")
//!     .subject("Issuer")
//!     .not_before(1_700_000_000)
//!     .not_after(1_900_000_000)
//!     .build()?;
//! let certificate =
//!     ec_public_key_generate_certificate(&mut backend, &public_key, &private_key, &params)?;
//!
//! let sign1 = cose_sign_ecdsa(&mut backend, &key_pair, b"MSO", &[], &certificate)?;
//! assert!(cose_check_ecdsa_signature(&mut backend, &sign1, &[], &public_key)?);
//! assert_eq!(cose_sign_get_x5chain(&sign1)?, certificate);
//! # }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(rustdoc::broken_intra_doc_links, clippy::pedantic)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]
// These ones are a little too eager
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

#[doc(inline)]
pub use common::constants;
#[doc(inline)]
pub use common::{chunk_vector, decode_hex, encode_hex, hex_dump};
#[cfg(feature = "openssl")]
#[doc(inline)]
pub use crypto::crypto_impl::openssl::{OpensslBackendError, OpensslContext};
#[cfg(rustcrypto_base)]
#[doc(inline)]
pub use crypto::crypto_impl::rustcrypto::{RustCryptoBackendError, RustCryptoContext};
#[doc(inline)]
pub use crypto::CryptoBackend;
#[doc(inline)]
pub use error::{ErrorKind, SupportError};

pub mod access_control;
pub mod aead;
pub mod common;
pub mod cose;
pub mod crypto;
pub mod ec;
pub mod error;
pub mod key_agreement;
pub mod x509;
