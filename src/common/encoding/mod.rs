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

//! Hexadecimal encoding and decoding of byte buffers.

use core::convert::Infallible;
use core::fmt::Write;

use log::error;

use crate::error::SupportError;

#[cfg(test)]
mod tests;

/// Number of bytes shown per line by [`hex_dump`].
const HEX_DUMP_WIDTH: usize = 16;

/// Encodes `data` as a lower-case hexadecimal string.
#[must_use]
pub fn encode_hex<T: AsRef<[u8]>>(data: T) -> String {
    hex::encode(data)
}

/// Decodes the hexadecimal string `hex_encoded` (upper or lower case digits) into bytes.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if the string has an odd length or contains a
/// character that isn't a hexadecimal digit.
pub fn decode_hex(hex_encoded: &str) -> Result<Vec<u8>, SupportError<Infallible>> {
    hex::decode(hex_encoded).map_err(|e| {
        error!("Unable to decode hex string: {e}");
        SupportError::from(e)
    })
}

/// Renders `data` as a classic hex dump with offsets, hex bytes and printable ASCII.
///
/// The first line names the buffer and its size, each following line covers 16 bytes.
#[must_use]
pub fn hex_dump(name: &str, data: &[u8]) -> String {
    let mut out = format!("{name}: dumping {} bytes\n", data.len());
    for (line, chunk) in data.chunks(HEX_DUMP_WIDTH).enumerate() {
        // Writing into a String can't fail.
        let _ = write!(out, "{:04x}  ", line * HEX_DUMP_WIDTH);
        for byte in chunk {
            let _ = write!(out, "{byte:02x} ");
        }
        out.push_str(&"   ".repeat(HEX_DUMP_WIDTH - chunk.len()));
        out.push(' ');
        out.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                char::from(b)
            } else {
                '.'
            }
        }));
        out.push('\n');
    }
    out
}
