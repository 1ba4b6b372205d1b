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
use rstest::rstest;

use super::{decode_hex, encode_hex, hex_dump};
use crate::error::ErrorKind;

#[rstest]
#[case(&[], "")]
#[case(&[0x00], "00")]
#[case(&[0xde, 0xad, 0xbe, 0xef], "deadbeef")]
#[case(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef], "0123456789abcdef")]
fn encode_lower_case(#[case] data: &[u8], #[case] expected: &str) {
    assert_eq!(encode_hex(data), expected);
}

#[rstest]
#[case("DEADBEEF", vec![0xde, 0xad, 0xbe, 0xef])]
#[case("DeAdBeEf", vec![0xde, 0xad, 0xbe, 0xef])]
#[case("", vec![])]
fn decode_mixed_case(#[case] text: &str, #[case] expected: Vec<u8>) {
    assert_eq!(decode_hex(text).expect("valid hex"), expected);
}

#[rstest]
#[case::odd_length("abc")]
#[case::invalid_digit("0g")]
#[case::whitespace("00 11")]
fn decode_rejects_invalid(#[case] text: &str) {
    let err = decode_hex(text).expect_err("invalid hex was accepted");
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
}

#[test]
fn hex_dump_layout() {
    let data: Vec<u8> = (0x41..0x41 + 18).collect();
    let dump = hex_dump("letters", &data);
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "letters: dumping 18 bytes");
    assert_eq!(
        lines[1],
        "0000  41 42 43 44 45 46 47 48 49 4a 4b 4c 4d 4e 4f 50  ABCDEFGHIJKLMNOP"
    );
    assert_eq!(lines[2], format!("0010  51 52 {} QR", "   ".repeat(14)));
}

#[test]
fn hex_dump_replaces_unprintable() {
    let dump = hex_dump("x", &[0x00, 0x7f, b'a']);
    assert!(dump.ends_with(" ..a\n"));
}
