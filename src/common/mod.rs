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

//! Backend-independent helpers: hex conversion, chunking, CBOR pretty-printing and constants.

pub use bytes::chunk_vector;
pub use encoding::{decode_hex, encode_hex, hex_dump};

mod bytes;
pub(crate) mod cbor;
pub mod cbor_print;
pub mod constants;
mod encoding;

#[cfg(test)]
pub(crate) mod test_helper;
