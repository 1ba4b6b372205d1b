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
use core::convert::Infallible;

use ciborium::value::Value;

use crate::error::SupportError;

/// Decodes exactly one CBOR data item from `encoded`, rejecting trailing data.
pub(crate) fn decode_single(encoded: &[u8]) -> Result<Value, SupportError<Infallible>> {
    let mut reader = encoded;
    let item: Value = ciborium::from_reader(&mut reader)?;
    if reader.is_empty() {
        Ok(item)
    } else {
        Err(SupportError::malformed(format!(
            "{} trailing bytes after CBOR data item",
            reader.len()
        )))
    }
}

/// Encodes `value` into a new buffer.
pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, SupportError<Infallible>> {
    let mut encoded = Vec::new();
    ciborium::into_writer(value, &mut encoded)?;
    Ok(encoded)
}
