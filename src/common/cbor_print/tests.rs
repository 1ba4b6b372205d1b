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
use ciborium::value::Value;
use rstest::rstest;

use super::{cbor_pretty_print, cbor_pretty_print_value, PrettyPrintOptions};
use crate::error::ErrorKind;

fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    ciborium::into_writer(value, &mut out).expect("encoding failed");
    out
}

fn print_default(value: &Value) -> String {
    cbor_pretty_print(&encode(value), &PrettyPrintOptions::default()).expect("printing failed")
}

#[rstest]
#[case::uint(Value::Integer(42.into()), "42")]
#[case::nint(Value::Integer((-17).into()), "-17")]
#[case::text(Value::Text("hello".into()), "'hello'")]
#[case::empty_bstr(Value::Bytes(vec![]), "{}")]
#[case::short_bstr(Value::Bytes(vec![0x01, 0xab]), "{0x01, 0xab}")]
#[case::bool_true(Value::Bool(true), "true")]
#[case::bool_false(Value::Bool(false), "false")]
#[case::null(Value::Null, "null")]
#[case::empty_array(Value::Array(vec![]), "[]")]
#[case::empty_map(Value::Map(vec![]), "{}")]
#[case::tag(Value::Tag(24, Box::new(Value::Bytes(vec![0xa0]))), "tag 24 {0xa0}")]
fn simple_items(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(print_default(&value), expected);
}

#[test]
fn flat_array_is_printed_inline() {
    let value = Value::Array(vec![
        Value::Integer(1.into()),
        Value::Text("two".into()),
        Value::Bool(false),
    ]);
    assert_eq!(print_default(&value), "[1, 'two', false, ]");
}

#[test]
fn nested_array_is_printed_multiline() {
    let value = Value::Array(vec![
        Value::Integer(1.into()),
        Value::Array(vec![Value::Integer(2.into())]),
    ]);
    assert_eq!(print_default(&value), "[\n  1,\n  [2, ],\n]");
}

#[test]
fn nested_map_is_indented() {
    let value = Value::Map(vec![(
        Value::Text("outer".into()),
        Value::Map(vec![(Value::Integer(1.into()), Value::Null)]),
    )]);
    assert_eq!(
        print_default(&value),
        "{\n  'outer' : {\n    1 : null,\n  },\n}"
    );
}

#[test]
fn large_bstr_is_summarized_with_sha1() {
    let value = Value::Bytes(b"abc".to_vec());
    let options = PrettyPrintOptions::builder()
        .max_bstr_size(2usize)
        .build()
        .expect("invalid options");
    let printed = cbor_pretty_print(&encode(&value), &options).expect("printing failed");
    assert_eq!(
        printed,
        "<bstr size=3 sha1=a9993e364706816aba3e25717850c26c9cd0d89d>"
    );
}

#[test]
fn default_threshold_is_32_bytes() {
    assert_eq!(PrettyPrintOptions::default().max_bstr_size, 32);
    let exactly = print_default(&Value::Bytes(vec![0u8; 32]));
    assert!(exactly.starts_with("{0x00, "));
    let above = print_default(&Value::Bytes(vec![0u8; 33]));
    assert!(above.starts_with("<bstr size=33 sha1="));
}

#[test]
fn redacted_keys_are_not_printed() {
    let value = Value::Map(vec![
        (Value::Text("id".into()), Value::Integer(3.into())),
        (
            Value::Text("readerCertificate".into()),
            Value::Bytes(vec![0x30, 0x82]),
        ),
    ]);
    let options = PrettyPrintOptions::builder()
        .map_keys_to_not_print(vec!["readerCertificate".to_string()])
        .build()
        .expect("invalid options");
    let printed = cbor_pretty_print_value(&value, &options).expect("printing failed");
    assert_eq!(
        printed,
        "{\n  'id' : 3,\n  'readerCertificate' : <not printed>,\n}"
    );
}

#[rstest]
#[case::truncated(vec![0x82, 0x01])]
#[case::trailing_data(vec![0x01, 0x02])]
#[case::empty(vec![])]
fn invalid_cbor_is_rejected(#[case] encoded: Vec<u8>) {
    let err = cbor_pretty_print(&encoded, &PrettyPrintOptions::default())
        .expect_err("invalid CBOR was printed");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[rstest]
#[case::top_level(vec![0xf7])]
#[case::in_array(vec![0x82, 0x01, 0xf7])]
#[case::map_value(vec![0xa1, 0x61, 0x61, 0xf7])]
#[case::tagged(vec![0xc1, 0xf7])]
fn undefined_is_rejected(#[case] encoded: Vec<u8>) {
    let err = cbor_pretty_print(&encoded, &PrettyPrintOptions::default())
        .expect_err("undefined was printed");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[rstest]
#[case::bstr(vec![0x41, 0xf7], "{0xf7}")]
#[case::chunked_bstr(vec![0x5f, 0x41, 0xf7, 0x41, 0xf6, 0xff], "{0xf7, 0xf6}")]
#[case::bstr_then_null(vec![0x82, 0x41, 0xf7, 0xf6], "[{0xf7}, null, ]")]
fn string_content_is_not_mistaken_for_undefined(
    #[case] encoded: Vec<u8>,
    #[case] expected: &str,
) {
    assert_eq!(
        cbor_pretty_print(&encoded, &PrettyPrintOptions::default()).expect("printing failed"),
        expected
    );
}
