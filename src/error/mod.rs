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

//! This module contains the error types used across this crate.
//!
//! Every fallible operation returns a [`SupportError`], which is generic over the error type of
//! the cryptographic backend in use (see [`CryptoBackend`](crate::crypto::CryptoBackend)).
//! Outcomes like "the signature does not verify" are *not* errors: checking functions return
//! `Ok(false)` for those.

use core::convert::Infallible;
use core::fmt::{Debug, Display, Formatter};

use coset::CoseError;
use strum_macros::Display;


/// Coarse classification of a [`SupportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input was structurally invalid (wrong length, bad encoding, wrong CBOR type, ...).
    MalformedInput,
    /// A primitive operation failed or authentication did not pass.
    CryptographicFailure,
    /// The input was well-formed, but the combination of inputs is not allowed.
    PolicyViolation,
}

/// Error returned by the operations of this crate.
///
/// `T` is the error type of the cryptographic backend that was used for the operation.
#[derive(Debug)]
#[non_exhaustive]
pub enum SupportError<T> {
    /// Input could not be parsed or does not have the required shape.
    MalformedInput(String),
    /// Authenticated decryption or another cryptographic check rejected the input.
    VerificationFailure(String),
    /// Inputs violate a usage rule, e.g. payload and detached content are both non-empty.
    PolicyViolation(String),
    /// The cryptographic backend reported an error.
    Backend(T),
}

impl<T> SupportError<T> {
    /// Creates a [`SupportError::MalformedInput`] with the given `message`.
    pub fn malformed<S: Into<String>>(message: S) -> SupportError<T> {
        SupportError::MalformedInput(message.into())
    }

    /// Creates a [`SupportError::VerificationFailure`] with the given `message`.
    pub fn verification<S: Into<String>>(message: S) -> SupportError<T> {
        SupportError::VerificationFailure(message.into())
    }

    /// Creates a [`SupportError::PolicyViolation`] with the given `message`.
    pub fn policy<S: Into<String>>(message: S) -> SupportError<T> {
        SupportError::PolicyViolation(message.into())
    }

    /// Returns the [`ErrorKind`] this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SupportError::MalformedInput(_) => ErrorKind::MalformedInput,
            SupportError::VerificationFailure(_) | SupportError::Backend(_) => {
                ErrorKind::CryptographicFailure
            }
            SupportError::PolicyViolation(_) => ErrorKind::PolicyViolation,
        }
    }

    /// Converts the backend error type of this error using the given function `f`.
    ///
    /// Errors that don't originate from the backend are carried over unchanged.
    pub fn map_backend<U, F: FnOnce(T) -> U>(self, f: F) -> SupportError<U> {
        match self {
            SupportError::MalformedInput(m) => SupportError::MalformedInput(m),
            SupportError::VerificationFailure(m) => SupportError::VerificationFailure(m),
            SupportError::PolicyViolation(m) => SupportError::PolicyViolation(m),
            SupportError::Backend(e) => SupportError::Backend(f(e)),
        }
    }
}

impl SupportError<Infallible> {
    /// Converts an error of a backend-independent operation into one for any backend.
    pub fn widen<T>(self) -> SupportError<T> {
        self.map_backend(|never| match never {})
    }
}

impl<T: Display> Display for SupportError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            SupportError::MalformedInput(m) => write!(f, "malformed input: {m}"),
            SupportError::VerificationFailure(m) => write!(f, "verification failed: {m}"),
            SupportError::PolicyViolation(m) => write!(f, "policy violation: {m}"),
            SupportError::Backend(e) => write!(f, "cryptographic backend error: {e}"),
        }
    }
}

impl<T: Debug + Display> std::error::Error for SupportError<T> {}

impl<T> From<CoseError> for SupportError<T> {
    fn from(value: CoseError) -> Self {
        SupportError::MalformedInput(format!("invalid COSE structure: {value}"))
    }
}

impl<T> From<der::Error> for SupportError<T> {
    fn from(value: der::Error) -> Self {
        SupportError::MalformedInput(format!("invalid DER: {value}"))
    }
}

impl<T> From<hex::FromHexError> for SupportError<T> {
    fn from(value: hex::FromHexError) -> Self {
        SupportError::MalformedInput(format!("invalid hex string: {value}"))
    }
}

impl<T> From<ciborium::de::Error<std::io::Error>> for SupportError<T> {
    fn from(value: ciborium::de::Error<std::io::Error>) -> Self {
        SupportError::MalformedInput(format!("invalid CBOR: {value}"))
    }
}

impl<T> From<ciborium::ser::Error<std::io::Error>> for SupportError<T> {
    fn from(value: ciborium::ser::Error<std::io::Error>) -> Self {
        // Serializing into a Vec cannot fail for I/O reasons, only for unsupported values.
        SupportError::MalformedInput(format!("unable to encode CBOR: {value}"))
    }
}
