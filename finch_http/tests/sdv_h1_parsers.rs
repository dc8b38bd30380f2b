// Copyright (c) 2024 Finch Project Authors.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use finch_http::body::ChunkHeaderParser;
use finch_http::h1::{HeadersEndScanner, ResponseDecoder};
use proptest::prelude::*;

/// SDV test cases for `ResponseDecoder::decode` over a drip-fed stream.
///
/// # Brief
/// 1. Feeds a response head one byte at a time.
/// 2. Checks that the decoded part matches the all-at-once result.
#[test]
fn sdv_response_decoder_byte_by_byte() {
    let message: &[u8] = b"HTTP/1.1 200 OK\r\n\
        Content-Length: 4\r\n\
        Connection: keep-alive\r\n\
        \r\ngood";

    let mut decoder = ResponseDecoder::new();
    let mut decoded = None;
    for (n, byte) in message.iter().enumerate() {
        match decoder.decode(core::slice::from_ref(byte)).unwrap() {
            Some((part, rest)) => {
                assert!(rest.is_empty());
                decoded = Some((part, n));
                break;
            }
            None => continue,
        }
    }
    let (part, consumed_at) = decoded.expect("head never completed");
    assert_eq!(part.status.as_u16(), 200);
    assert_eq!(part.reason, "OK");
    assert_eq!(
        part.headers.get("content-length").unwrap().to_str().unwrap(),
        "4"
    );
    // Everything after the terminator is body.
    assert_eq!(&message[consumed_at + 1..], b"good");
}

/// SDV test cases for `ChunkHeaderParser` across a whole chunked body.
///
/// # Brief
/// 1. Walks a two-chunk body with trailing zero chunk by alternating
///    header parsing and manual data skipping.
/// 2. Checks every parsed length.
#[test]
fn sdv_chunk_header_walk() {
    let body: &[u8] = b"4\r\ngood\r\nb; note=padded\r\nmore bytes!\r\n0\r\n";
    let mut parser = ChunkHeaderParser::new();
    let mut at = 0;

    at += parser.feed(&body[at..]).unwrap();
    assert_eq!(parser.chunk_len(), 4);
    at += 4;

    parser.next_header();
    at += parser.feed(&body[at..]).unwrap();
    assert_eq!(parser.chunk_len(), 0xb);
    at += 0xb;

    parser.next_header();
    at += parser.feed(&body[at..]).unwrap();
    assert_eq!(parser.chunk_len(), 0);
    assert_eq!(at, body.len());
}

proptest! {
    /// Feeding the scanner any partition of a byte sequence consumes the
    /// same total count as feeding it whole, and finishes iff the whole
    /// feed finishes.
    #[test]
    fn sdv_headers_end_scan_partition_invariant(
        lines in prop::collection::vec("[a-zA-Z0-9 :/,.-]{1,30}", 1..8),
        mut cuts in prop::collection::vec(0usize..512, 0..6),
    ) {
        let mut block = Vec::new();
        for line in &lines {
            block.extend_from_slice(line.as_bytes());
            block.extend_from_slice(b"\r\n");
        }
        block.extend_from_slice(b"\r\n");

        let mut reference = HeadersEndScanner::new();
        let expected = reference.feed(&block);
        prop_assert!(reference.is_finished());

        cuts.iter_mut().for_each(|c| *c = (*c).min(block.len()));
        cuts.sort_unstable();
        let mut scanner = HeadersEndScanner::new();
        let mut total = 0;
        let mut prev = 0;
        for cut in cuts.iter().chain(core::iter::once(&block.len())) {
            total += scanner.feed(&block[prev..*cut]);
            prev = *cut;
        }
        prop_assert!(scanner.is_finished());
        prop_assert_eq!(total, expected);
    }

    /// Parsing `hex(n) CRLF` yields `n` back for every representable
    /// chunk length, at any split point of the input.
    #[test]
    fn sdv_chunk_size_round_trip(n in 0..u64::MAX, split in 0usize..32) {
        let line = format!("{n:x}\r\n");
        let split = split.min(line.len());

        let mut parser = ChunkHeaderParser::new();
        let mut total = parser.feed(&line.as_bytes()[..split]).unwrap();
        total += parser.feed(&line.as_bytes()[split..]).unwrap();
        prop_assert!(parser.is_finished());
        prop_assert_eq!(total, line.len());
        prop_assert_eq!(parser.chunk_len(), n);
    }
}
