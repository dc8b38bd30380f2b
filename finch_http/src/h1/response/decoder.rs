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

//! HTTP/1 response decoder, which supports decoding multi-segment byte
//! streams into a [`ResponsePart`].
//!
//! Decoding is two-tier: a [`HeadersEndScanner`] locates the end of the
//! header block across segments while the raw bytes accumulate in a
//! bounded buffer, then the block is tokenized in one pass. The message
//! components are:
//!
//! ```text
//! HTTP-version SP status-code SP [ reason-phrase ] CRLF   ; status-line
//! *( field-name ":" OWS field-value OWS CRLF )            ; field-line
//! CRLF
//! [ message-body ]
//! ```
//!
//! [`ResponsePart`]: crate::response::ResponsePart
//! [`HeadersEndScanner`]: crate::h1::HeadersEndScanner

use crate::error::{ErrorKind, HttpError};
use crate::h1::HeadersEndScanner;
use crate::headers::{HeaderName, HeaderValue, Headers};
use crate::response::status::StatusCode;
use crate::response::ResponsePart;
use crate::util::header_bytes::{HEADER_NAME_BYTES, HEADER_VALUE_BYTES};
use crate::version::Version;

// Tolerated without a dynamic buffer by every deployment we know of.
const DEFAULT_HEADERS_LIMIT: usize = 8 * 1024;

/// `HTTP/1` response decoder.
///
/// # Examples
///
/// ```
/// use finch_http::h1::ResponseDecoder;
///
/// // The complete message is:
/// // "HTTP/1.1 200 OK\r\nContent-Length:4\r\n\r\ngood"
/// let segments = ["HTTP/1.1 200 OK\r\nCon", "tent-Length:", "4\r\n\r\ngood"];
///
/// let mut decoder = ResponseDecoder::new();
///
/// // The first segments are correct but incomplete.
/// assert!(decoder.decode(segments[0].as_bytes()).unwrap().is_none());
/// assert!(decoder.decode(segments[1].as_bytes()).unwrap().is_none());
/// // The third segment completes the head; body bytes are returned.
/// let (part, body) = decoder.decode(segments[2].as_bytes()).unwrap().unwrap();
///
/// assert_eq!(part.version.as_str(), "HTTP/1.1");
/// assert_eq!(part.status.as_u16(), 200);
/// assert_eq!(part.reason, "OK");
/// assert_eq!(
///     part.headers.get("content-length").unwrap().to_str().unwrap(),
///     "4"
/// );
/// assert_eq!(body, b"good");
/// ```
pub struct ResponseDecoder {
    scanner: HeadersEndScanner,
    block: Vec<u8>,
    limit: usize,
}

impl ResponseDecoder {
    /// Creates a new `ResponseDecoder` with the default 8 KiB header cap.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HEADERS_LIMIT)
    }

    /// Creates a new `ResponseDecoder` with a caller-chosen header cap.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            scanner: HeadersEndScanner::new(),
            block: Vec::new(),
            limit,
        }
    }

    /// Decodes some bytes towards a complete `ResponsePart`. This method
    /// can be invoked repeatedly until a complete part is returned.
    ///
    /// Returns `Ok(None)` if the decoder needs more bytes.
    ///
    /// Returns the `ResponsePart` and the unconsumed remainder of `buf`
    /// once the head is complete.
    ///
    /// Returns `Err` if the accumulated block exceeds the configured cap
    /// (`HeadersExceededLimit`) or the head is not syntactically valid
    /// (`HeadersInvalid`).
    pub fn decode<'a>(
        &mut self,
        buf: &'a [u8],
    ) -> Result<Option<(ResponsePart, &'a [u8])>, HttpError> {
        let consumed = self.scanner.feed(buf);
        if self.block.len() + consumed > self.limit {
            return Err(ErrorKind::HeadersExceededLimit.into());
        }
        self.block.extend_from_slice(&buf[..consumed]);
        if !self.scanner.is_finished() {
            return Ok(None);
        }
        let part = parse_head(&self.block)?;
        Ok(Some((part, &buf[consumed..])))
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// Splits the next line off `bytes`. The returned line excludes its CRLF
// or bare-LF terminator.
fn split_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let lf = bytes.iter().position(|&b| b == b'\n')?;
    let line = if lf > 0 && bytes[lf - 1] == b'\r' {
        &bytes[..lf - 1]
    } else {
        &bytes[..lf]
    };
    Some((line, &bytes[lf + 1..]))
}

fn trim_ows(mut bytes: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = bytes {
        bytes = rest;
    }
    bytes
}

fn parse_head(block: &[u8]) -> Result<ResponsePart, HttpError> {
    let (status_line, rest) =
        split_line(block).ok_or_else(|| HttpError::from(ErrorKind::HeadersInvalid))?;
    let (version, status, reason) = parse_status_line(status_line)?;
    let mut headers = Headers::new();
    parse_field_block(rest, &mut headers)?;
    Ok(ResponsePart {
        version,
        status,
        reason,
        headers,
    })
}

fn parse_status_line(line: &[u8]) -> Result<(Version, StatusCode, String), HttpError> {
    let sp = line
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| HttpError::from(ErrorKind::HeadersInvalid))?;
    if &line[..sp] != b"HTTP/1.1" {
        return Err(ErrorKind::HeadersInvalid.into());
    }
    let rest = &line[sp + 1..];
    if rest.len() < 3 {
        return Err(ErrorKind::HeadersInvalid.into());
    }
    let status = StatusCode::from_bytes(&rest[..3])
        .map_err(|_| HttpError::from(ErrorKind::HeadersInvalid))?;
    let reason = match rest.len() {
        3 => &rest[3..],
        _ if rest[3] == b' ' => &rest[4..],
        _ => return Err(ErrorKind::HeadersInvalid.into()),
    };
    let reason = trim_ows(reason);
    if !reason.iter().all(|&b| HEADER_VALUE_BYTES[b as usize]) {
        return Err(ErrorKind::HeadersInvalid.into());
    }
    Ok((
        Version::HTTP1_1,
        status,
        String::from_utf8_lossy(reason).into_owned(),
    ))
}

/// Parses a block of `field-name ":" OWS field-value OWS` lines into
/// `headers`, stopping at the blank line that ends the block (or at the
/// end of input). Duplicate names are appended as separate entries.
///
/// Obsolete line folding (a field line starting with whitespace) is
/// rejected as `HeadersInvalid`.
///
/// This parser is shared between response heads and chunked-body trailer
/// sections.
pub fn parse_field_block(mut block: &[u8], headers: &mut Headers) -> Result<(), HttpError> {
    while let Some((line, rest)) = split_line(block) {
        block = rest;
        if line.is_empty() {
            break;
        }
        if line[0] == b' ' || line[0] == b'\t' {
            return Err(ErrorKind::HeadersInvalid.into());
        }
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or_else(|| HttpError::from(ErrorKind::HeadersInvalid))?;
        let name = &line[..colon];
        if name.is_empty() || !name.iter().all(|&b| HEADER_NAME_BYTES[b as usize]) {
            return Err(ErrorKind::HeadersInvalid.into());
        }
        let value = trim_ows(&line[colon + 1..]);
        if !value.iter().all(|&b| HEADER_VALUE_BYTES[b as usize]) {
            return Err(ErrorKind::HeadersInvalid.into());
        }
        let name =
            HeaderName::from_bytes(name).map_err(|_| HttpError::from(ErrorKind::HeadersInvalid))?;
        let value = HeaderValue::from_bytes(value)
            .map_err(|_| HttpError::from(ErrorKind::HeadersInvalid))?;
        headers.push(crate::headers::Header::from_raw_parts(name, value));
    }
    Ok(())
}

#[cfg(test)]
mod ut_decoder {
    use super::ResponseDecoder;
    use crate::error::ErrorKind;

    macro_rules! assert_head {
        ($part:expr, $status:expr, $reason:expr, $headers:expr) => {{
            assert_eq!($part.version.as_str(), "HTTP/1.1");
            assert_eq!($part.status.as_u16(), $status);
            assert_eq!($part.reason, $reason);
            assert_eq!($part.headers.len(), $headers.len());
            for (name, value) in $headers {
                assert_eq!(
                    $part.headers.get(name).unwrap().to_str().unwrap(),
                    value,
                    "header {name}"
                );
            }
        }};
    }

    /// UT test cases for `ResponseDecoder::decode` with complete input.
    ///
    /// # Brief
    /// 1. Decodes complete responses separated by CRLF and by LF.
    /// 2. Checks status line, headers, OWS trimming and the returned
    ///    body remainder.
    #[test]
    fn ut_response_decoder_decode_complete() {
        let mut decoder = ResponseDecoder::new();
        let (part, body) = decoder
            .decode(b"HTTP/1.1 304 Not Modified\r\nAge: \t 270646 \t \r\nEtag:\"3147526947\"\r\n\r\nbody part")
            .unwrap()
            .unwrap();
        assert_head!(
            part,
            304,
            "Not Modified",
            [("age", "270646"), ("etag", "\"3147526947\"")]
        );
        assert_eq!(body, b"body part");

        // Bare-LF separators.
        let mut decoder = ResponseDecoder::new();
        let (part, body) = decoder
            .decode(b"HTTP/1.1 200 OK\nAge:1\n\nrest")
            .unwrap()
            .unwrap();
        assert_head!(part, 200, "OK", [("age", "1")]);
        assert_eq!(body, b"rest");

        // Empty reason phrase, no headers.
        let mut decoder = ResponseDecoder::new();
        let (part, body) = decoder.decode(b"HTTP/1.1 304 \r\n\r\n").unwrap().unwrap();
        assert_head!(part, 304, "", [] as [(&str, &str); 0]);
        assert!(body.is_empty());

        // Header with an empty value.
        let mut decoder = ResponseDecoder::new();
        let (part, _) = decoder
            .decode(b"HTTP/1.1 304 \r\nempty-header: \r\n\r\n")
            .unwrap()
            .unwrap();
        assert_head!(part, 304, "", [("empty-header", "")]);
    }

    /// UT test cases for duplicate header names.
    ///
    /// # Brief
    /// 1. Decodes a response carrying two `Set-Cookie` lines.
    /// 2. Checks that both entries survive in arrival order.
    #[test]
    fn ut_response_decoder_decode_duplicates() {
        let mut decoder = ResponseDecoder::new();
        let (part, _) = decoder
            .decode(b"HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n")
            .unwrap()
            .unwrap();
        let values = part.headers.get_all("set-cookie").unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].to_str().unwrap(), "a=1");
        assert_eq!(values[1].to_str().unwrap(), "b=2");
    }

    /// UT test cases for `ResponseDecoder::decode` with segmented input.
    ///
    /// # Brief
    /// 1. Splits a response head at every byte position.
    /// 2. Checks that decoding across the split yields the same result.
    #[test]
    fn ut_response_decoder_decode_segmented() {
        let message: &[u8] =
            b"HTTP/1.1 304 OK\r\nAge: \t 270646 \t \r\nDate: Mon, 19 Dec 2022 01:46:59 GMT\r\n\r\nbody";
        for split in 0..message.len() {
            let mut decoder = ResponseDecoder::new();
            let first = decoder.decode(&message[..split]).unwrap();
            let (part, body) = match first {
                Some((part, rest)) => {
                    // The head completed inside the first segment; the
                    // rest of that segment plus the remainder is body.
                    let mut body = rest.to_vec();
                    body.extend_from_slice(&message[split..]);
                    (part, body)
                }
                None => {
                    let (part, rest) = decoder.decode(&message[split..]).unwrap().unwrap();
                    (part, rest.to_vec())
                }
            };
            assert_head!(
                part,
                304,
                "OK",
                [("age", "270646"), ("date", "Mon, 19 Dec 2022 01:46:59 GMT")]
            );
            assert_eq!(body, b"body", "split at {split}");
        }
    }

    /// UT test cases for invalid response heads.
    ///
    /// # Brief
    /// 1. Decodes malformed heads.
    /// 2. Checks that each is rejected as `HeadersInvalid`.
    #[test]
    fn ut_response_decoder_decode_invalid() {
        let cases: &[&[u8]] = &[
            b"invalid str\r\n\r\n",
            b"HTTP/1.0 200 OK\r\n\r\n",
            b"HTTP/2.0 200 OK\r\n\r\n",
            b"HTTP/1.1 2O0 OK\r\n\r\n",
            b"HTTP/1.1 20 OK\r\n\r\n",
            b"HTTP/1.1 200 OK\r\nno-colon-line\r\n\r\n",
            b"HTTP/1.1 200 OK\r\nbad name: x\r\n\r\n",
            // Obsolete line folding.
            b"HTTP/1.1 200 OK\r\nfold: a\r\n b\r\n\r\n",
        ];
        for case in cases {
            let mut decoder = ResponseDecoder::new();
            let result = decoder.decode(case);
            assert_eq!(
                result.unwrap_err().kind(),
                ErrorKind::HeadersInvalid,
                "case {:?}",
                String::from_utf8_lossy(case)
            );
        }
    }

    /// UT test cases for the header size cap.
    ///
    /// # Brief
    /// 1. Decodes a head that exceeds a small configured cap.
    /// 2. Checks that `HeadersExceededLimit` is returned.
    #[test]
    fn ut_response_decoder_limit() {
        let mut decoder = ResponseDecoder::with_limit(16);
        assert!(decoder.decode(b"HTTP/1.1 200 OK\r").unwrap().is_none());
        let err = decoder.decode(b"\nX-Long: value\r\n\r\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HeadersExceededLimit);
    }
}
