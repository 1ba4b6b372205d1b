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

//! Human-readable rendering of CBOR data for debugging and test output.
//!
//! Large byte strings are summarized by their SHA-1 digest and selected map entries can be
//! hidden, which makes the output usable for comparing structures that embed certificates or
//! key material.
//!
//! # Example
//! ```
//! use idcred::common::cbor_print::{cbor_pretty_print, PrettyPrintOptions};
//!
//! // {"a": [1, -2], "b": h'0102'}
//! let encoded = hex::decode("a261618201216162420102")?;
//! let printed = cbor_pretty_print(&encoded, &PrettyPrintOptions::default())?;
//! assert_eq!(printed, "{\n  'a' : [1, -2, ],\n  'b' : {0x01, 0x02},\n}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use core::convert::Infallible;
use core::fmt::Write;

use ciborium::value::Value;
use ciborium_io::Read;
use ciborium_ll::{simple, Decoder, Header};
use derive_builder::Builder;
use log::error;
use sha1::{Digest, Sha1};

use crate::common::cbor::decode_single;
use crate::error::SupportError;

#[cfg(test)]
mod tests;

/// Byte strings longer than this are summarized unless configured otherwise.
pub const DEFAULT_MAX_BSTR_SIZE: usize = 32;

/// Options for [`cbor_pretty_print`].
#[derive(Debug, PartialEq, Eq, Clone, Builder)]
#[builder(setter(into), derive(Debug, PartialEq))]
pub struct PrettyPrintOptions {
    /// Byte strings longer than this are printed as `<bstr size=N sha1=...>`.
    #[builder(default = "DEFAULT_MAX_BSTR_SIZE")]
    pub max_bstr_size: usize,

    /// Values of map entries whose key is one of these text strings are printed as
    /// `<not printed>`.
    #[builder(default)]
    pub map_keys_to_not_print: Vec<String>,
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        PrettyPrintOptions {
            max_bstr_size: DEFAULT_MAX_BSTR_SIZE,
            map_keys_to_not_print: Vec::new(),
        }
    }
}

impl PrettyPrintOptions {
    /// Returns a new builder for [`PrettyPrintOptions`].
    #[must_use]
    pub fn builder() -> PrettyPrintOptionsBuilder {
        PrettyPrintOptionsBuilder::default()
    }

    fn hides_key(&self, key: &Value) -> bool {
        match key {
            Value::Text(text) => self.map_keys_to_not_print.iter().any(|k| k == text),
            _ => false,
        }
    }
}

/// Parses the single CBOR data item in `encoded` and renders it as indented text.
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `encoded` is not valid CBOR, contains trailing
/// data after the first item, or contains a value that can't be represented. Of the simple
/// values only `true`, `false` and `null` can be represented.
pub fn cbor_pretty_print(
    encoded: &[u8],
    options: &PrettyPrintOptions,
) -> Result<String, SupportError<Infallible>> {
    let item = decode_single(encoded).map_err(|e| {
        error!("Data to pretty print is not a single CBOR data item: {e}");
        e
    })?;
    reject_undefined(encoded)?;
    let mut out = String::new();
    print_value(&item, &mut out, 0, options)?;
    Ok(out)
}

/// Renders an already parsed CBOR `value`, see [`cbor_pretty_print`].
///
/// # Errors
/// Returns [`SupportError::MalformedInput`] if `value` contains a kind of item that can't be
/// represented.
pub fn cbor_pretty_print_value(
    value: &Value,
    options: &PrettyPrintOptions,
) -> Result<String, SupportError<Infallible>> {
    let mut out = String::new();
    print_value(value, &mut out, 0, options)?;
    Ok(out)
}

/// Fails if `encoded` contains the simple value `undefined`, which [`Value`] decodes as `null`.
fn reject_undefined(encoded: &[u8]) -> Result<(), SupportError<Infallible>> {
    let mut decoder = Decoder::from(encoded);
    while decoder.offset() < encoded.len() {
        match decoder.pull() {
            Ok(Header::Simple(simple::UNDEFINED)) => {
                error!("Only boolean and null simple values can be pretty printed");
                return Err(SupportError::malformed("unsupported simple value undefined"));
            }
            // Skip the content of strings (and of the chunks of indefinite length ones).
            Ok(Header::Bytes(Some(len)) | Header::Text(Some(len))) => {
                if len > encoded.len() {
                    return Err(SupportError::malformed("truncated CBOR string"));
                }
                let mut content = vec![0u8; len];
                decoder
                    .read_exact(&mut content)
                    .map_err(|_| SupportError::malformed("truncated CBOR string"))?;
            }
            Ok(_) => {}
            Err(e) => return Err(SupportError::malformed(format!("invalid CBOR: {e:?}"))),
        }
    }
    Ok(())
}

fn is_compound(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Map(_))
}

fn print_bytes(bytes: &[u8], out: &mut String, max_bstr_size: usize) {
    if bytes.len() > max_bstr_size {
        let digest = Sha1::digest(bytes);
        let _ = write!(
            out,
            "<bstr size={} sha1={}>",
            bytes.len(),
            hex::encode(digest)
        );
    } else {
        out.push('{');
        for (n, byte) in bytes.iter().enumerate() {
            if n > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "0x{byte:02x}");
        }
        out.push('}');
    }
}

fn print_value(
    value: &Value,
    out: &mut String,
    indent: usize,
    options: &PrettyPrintOptions,
) -> Result<(), SupportError<Infallible>> {
    let indent_string = " ".repeat(indent);
    match value {
        Value::Integer(i) => {
            let _ = write!(out, "{}", i128::from(*i));
        }
        Value::Bytes(bytes) => print_bytes(bytes, out, options.max_bstr_size),
        Value::Text(text) => {
            out.push('\'');
            out.push_str(text);
            out.push('\'');
        }
        Value::Float(f) => {
            let _ = write!(out, "{f}");
        }
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => out.push_str("null"),
        Value::Tag(tag, child) => {
            let _ = write!(out, "tag {tag} ");
            print_value(child, out, indent, options)?;
        }
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) if !items.iter().any(is_compound) => {
            out.push('[');
            for item in items {
                print_value(item, out, indent + 2, options)?;
                out.push_str(", ");
            }
            out.push(']');
        }
        Value::Array(items) => {
            out.push_str("[\n");
            out.push_str(&indent_string);
            for item in items {
                out.push_str("  ");
                print_value(item, out, indent + 2, options)?;
                out.push_str(",\n");
                out.push_str(&indent_string);
            }
            out.push(']');
        }
        Value::Map(entries) if entries.is_empty() => out.push_str("{}"),
        Value::Map(entries) => {
            out.push_str("{\n");
            out.push_str(&indent_string);
            for (key, entry_value) in entries {
                out.push_str("  ");
                print_value(key, out, indent + 2, options)?;
                out.push_str(" : ");
                if options.hides_key(key) {
                    out.push_str("<not printed>");
                } else {
                    print_value(entry_value, out, indent + 2, options)?;
                }
                out.push_str(",\n");
                out.push_str(&indent_string);
            }
            out.push('}');
        }
        other => {
            error!("Unsupported CBOR item in pretty printer: {other:?}");
            return Err(SupportError::malformed("unsupported CBOR item"));
        }
    }
    Ok(())
}
