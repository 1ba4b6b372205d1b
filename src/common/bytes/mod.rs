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

use log::error;

use crate::error::SupportError;


/// Splits `content` into chunks of at most `max_chunk_size` bytes.
///
/// Content that already fits is returned as a single chunk, even if it is empty, so the result
/// is never an empty vector.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `max_chunk_size` is zero.
pub fn chunk_vector(
    content: &[u8],
    max_chunk_size: usize,
) -> Result<Vec<Vec<u8>>, SupportError<Infallible>> {
    if max_chunk_size == 0 {
        error!("Maximum chunk size must not be zero");
        return Err(SupportError::malformed("maximum chunk size must not be zero"));
    }
    if content.len() <= max_chunk_size {
        return Ok(vec![content.to_vec()]);
    }
    Ok(content
        .chunks(max_chunk_size)
        .map(<[u8]>::to_vec)
        .collect())
}
