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

//! Chunked transfer-coding support.
//!
//! The elements of a chunk header are as follows:
//! |========================================================================
//! |   chunk          = chunk-size [ chunk-ext ] CRLF                      |
//! |                    chunk-data CRLF                                    |
//! |   chunk-size     = 1*HEXDIG                                           |
//! |   last-chunk     = 1*("0") [ chunk-ext ] CRLF                         |
//! |                                                                       |
//! |   chunk-ext      = *( BWS ";" BWS chunk-ext-name                      |
//! |                       [ BWS "=" BWS chunk-ext-val ] )                 |
//! |========================================================================
//!
//! [`ChunkHeaderParser`] consumes one `chunk-size [chunk-ext] CRLF` record
//! incrementally, optionally preceded by the CRLF that terminates the
//! previous chunk's data.

use crate::error::{ErrorKind, HttpError};

// Parsing phase of one chunk header. `Invalid` is sticky.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    // CRLF that terminates the previous chunk's data.
    Suffix,
    // CR of the data-terminating CRLF seen.
    SuffixCr,
    // Hexadecimal chunk-size digits.
    Size,
    // Chunk extension, skipped verbatim.
    Extension,
    // CR of the size line seen.
    SizeCr,
    // Size line complete.
    Finished,
    // Malformed input; every further call fails.
    Invalid,
}

/// Incremental parser for one chunk header.
///
/// The parser accepts `CRLF` and bare-`LF` line endings, skips chunk
/// extensions without interpreting them, and detects chunk-size overflow
/// at the first digit that would no longer fit in a `u64`.
///
/// # Examples
///
/// ```
/// use finch_http::body::ChunkHeaderParser;
///
/// let mut parser = ChunkHeaderParser::new();
/// // The consumed count includes the terminating line feed.
/// assert_eq!(parser.feed(b"4\r\ngood").unwrap(), 3);
/// assert!(parser.is_finished());
/// assert_eq!(parser.chunk_len(), 4);
///
/// // After the chunk data, the next header is preceded by a CRLF suffix.
/// parser.next_header();
/// assert_eq!(parser.feed(b"\r\n0\r\n").unwrap(), 5);
/// assert_eq!(parser.chunk_len(), 0);
/// ```
pub struct ChunkHeaderParser {
    state: State,
    chunk_len: u64,
    seen_digit: bool,
}

impl ChunkHeaderParser {
    /// Creates a parser positioned at the first chunk header of a body.
    pub fn new() -> Self {
        Self {
            state: State::Size,
            chunk_len: 0,
            seen_digit: false,
        }
    }

    /// Rearms the parser for the next chunk header, expecting the CRLF
    /// that terminates the previous chunk's data first.
    pub fn next_header(&mut self) {
        self.state = State::Suffix;
        self.chunk_len = 0;
        self.seen_digit = false;
    }

    /// Consumes bytes from `buf` up to and including the line feed that
    /// ends the size line.
    ///
    /// Returns the number of bytes consumed. Once finished, further calls
    /// consume nothing until [`next_header`] rearms the parser. Malformed
    /// input fails with [`InvalidChunkedEncoding`] and the failure is
    /// sticky.
    ///
    /// [`next_header`]: ChunkHeaderParser::next_header
    /// [`InvalidChunkedEncoding`]: crate::error::ErrorKind::InvalidChunkedEncoding
    pub fn feed(&mut self, buf: &[u8]) -> Result<usize, HttpError> {
        if self.state == State::Invalid {
            return Err(ErrorKind::InvalidChunkedEncoding.into());
        }
        let mut idx = 0;
        while idx < buf.len() && self.state != State::Finished {
            let b = buf[idx];
            self.state = match (self.state, b) {
                (State::Suffix, b'\r') => State::SuffixCr,
                (State::Suffix, b'\n') => State::Size,
                (State::SuffixCr, b'\n') => State::Size,
                (State::Size, b'0'..=b'9') => self.push_digit(b - b'0')?,
                (State::Size, b'a'..=b'f') => self.push_digit(b - b'a' + 10)?,
                (State::Size, b'A'..=b'F') => self.push_digit(b - b'A' + 10)?,
                (State::Size, b';' | b' ' | b'\t') if self.seen_digit => State::Extension,
                (State::Size, b'\r') if self.seen_digit => State::SizeCr,
                (State::Size, b'\n') if self.seen_digit => State::Finished,
                (State::Extension, b'\r') => State::SizeCr,
                (State::Extension, b'\n') => State::Finished,
                (State::Extension, _) => State::Extension,
                (State::SizeCr, b'\n') => State::Finished,
                _ => return self.invalid(),
            };
            idx += 1;
        }
        Ok(idx)
    }

    /// Returns `true` once a complete size line has been consumed.
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Gets the parsed chunk length. Only meaningful after
    /// [`is_finished`] reports `true`.
    ///
    /// [`is_finished`]: ChunkHeaderParser::is_finished
    pub fn chunk_len(&self) -> u64 {
        self.chunk_len
    }

    fn push_digit(&mut self, digit: u8) -> Result<State, HttpError> {
        match self
            .chunk_len
            .checked_mul(16)
            .and_then(|len| len.checked_add(u64::from(digit)))
        {
            Some(len) => {
                self.chunk_len = len;
                self.seen_digit = true;
                Ok(State::Size)
            }
            None => self.invalid(),
        }
    }

    fn invalid<T>(&mut self) -> Result<T, HttpError> {
        self.state = State::Invalid;
        Err(ErrorKind::InvalidChunkedEncoding.into())
    }
}

impl Default for ChunkHeaderParser {
    fn default() -> Self {
        Self::new()
    }
}
