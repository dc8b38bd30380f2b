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

//! Body framing adapters.
//!
//! [`BodyWriter`] frames outgoing body bytes (counted, chunked or
//! forbidden) and [`BodyReader`] unframes incoming ones (empty, counted,
//! chunked with trailers, or delimited by connection close). Both operate
//! directly on the transaction's [`Channel`] and hold no I/O of their
//! own.
//!
//! [`Channel`]: crate::transport::Channel

use std::io::{Read, Write};

use finch_http::body::ChunkHeaderParser;
use finch_http::h1::{parse_field_block, HeadersEndScanner};
use finch_http::headers::Headers;

use crate::error::{ErrorKind, HttpClientError};
use crate::transport::Channel;

// Write-side framing state.
pub(crate) enum BodyWriter {
    Forbidden,
    Fixed { remaining: u64 },
    Chunked,
}

impl BodyWriter {
    pub(crate) fn write<S: Read + Write>(
        &mut self,
        channel: &mut Channel<S>,
        bytes: &[u8],
    ) -> Result<usize, HttpClientError> {
        match self {
            Self::Forbidden => err_from_msg!(NotWritable, "request has no body framing"),
            Self::Fixed { remaining } => {
                if bytes.len() as u64 > *remaining {
                    return err_from_msg!(MessageTooLong, "write exceeds declared content-length");
                }
                channel
                    .write_all(bytes)
                    .map_err(|e| HttpClientError::from_io_error(ErrorKind::BodyTransfer, e))?;
                *remaining -= bytes.len() as u64;
                Ok(bytes.len())
            }
            Self::Chunked => {
                // A zero-length chunk would terminate the body early.
                if bytes.is_empty() {
                    return Ok(0);
                }
                write_chunk(channel, bytes)?;
                Ok(bytes.len())
            }
        }
    }

    pub(crate) fn finish<S: Read + Write>(
        &mut self,
        channel: &mut Channel<S>,
    ) -> Result<(), HttpClientError> {
        match self {
            Self::Forbidden => Ok(()),
            Self::Fixed { remaining } => {
                if *remaining > 0 {
                    return err_from_msg!(
                        MessageNotComplete,
                        "declared content-length was not reached"
                    );
                }
                Ok(())
            }
            Self::Chunked => channel
                .write_all(b"0\r\n\r\n")
                .map_err(|e| HttpClientError::from_io_error(ErrorKind::BodyTransfer, e)),
        }
    }
}

// Emits one chunk: hex length, CRLF, payload, CRLF.
pub(crate) fn write_chunk<S: Read + Write>(
    channel: &mut Channel<S>,
    bytes: &[u8],
) -> Result<(), HttpClientError> {
    let head = format!("{:x}\r\n", bytes.len());
    channel
        .write_all(head.as_bytes())
        .and_then(|_| channel.write_all(bytes))
        .and_then(|_| channel.write_all(b"\r\n"))
        .map_err(|e| HttpClientError::from_io_error(ErrorKind::BodyTransfer, e))
}

// Read-side framing state.
pub(crate) enum BodyReader {
    Empty,
    UntilClose,
    Fixed { remaining: u64 },
    Chunked(ChunkReader),
}

impl BodyReader {
    pub(crate) fn chunked(trailer_limit: usize) -> Self {
        Self::Chunked(ChunkReader {
            parser: ChunkHeaderParser::new(),
            phase: ChunkPhase::Header,
            remaining: 0,
            scanner: HeadersEndScanner::at_line_boundary(),
            trailer_block: Vec::new(),
            trailer_limit,
            trailers: None,
        })
    }

    pub(crate) fn read<S: Read + Write>(
        &mut self,
        channel: &mut Channel<S>,
        dest: &mut [u8],
    ) -> Result<usize, HttpClientError> {
        if dest.is_empty() {
            return Ok(0);
        }
        match self {
            Self::Empty => Ok(0),
            Self::UntilClose => channel
                .read(dest)
                .map_err(|e| HttpClientError::from_io_error(ErrorKind::BodyTransfer, e)),
            Self::Fixed { remaining } => {
                if *remaining == 0 {
                    return Ok(0);
                }
                let cap = (*remaining).min(dest.len() as u64) as usize;
                let n = channel
                    .read(&mut dest[..cap])
                    .map_err(|e| HttpClientError::from_io_error(ErrorKind::BodyTransfer, e))?;
                if n == 0 {
                    return err_from_msg!(UnexpectedEof, "transport ended mid-body");
                }
                *remaining -= n as u64;
                Ok(n)
            }
            Self::Chunked(reader) => reader.read(channel, dest),
        }
    }

    pub(crate) fn trailers(&self) -> Option<&Headers> {
        match self {
            Self::Chunked(reader) => reader.trailers.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn take_trailers(&mut self) -> Option<Headers> {
        match self {
            Self::Chunked(reader) => reader.trailers.take(),
            _ => None,
        }
    }
}

// Where the chunked reader stands between calls.
enum ChunkPhase {
    Header,
    Data,
    Trailer,
    Done,
}

pub(crate) struct ChunkReader {
    parser: ChunkHeaderParser,
    phase: ChunkPhase,
    remaining: u64,
    scanner: HeadersEndScanner,
    trailer_block: Vec<u8>,
    trailer_limit: usize,
    trailers: Option<Headers>,
}

impl ChunkReader {
    fn read<S: Read + Write>(
        &mut self,
        channel: &mut Channel<S>,
        dest: &mut [u8],
    ) -> Result<usize, HttpClientError> {
        loop {
            match self.phase {
                ChunkPhase::Header => {
                    if self.fill(channel)? == 0 {
                        return err_from_msg!(UnexpectedEof, "transport ended mid-chunk-header");
                    }
                    let window = channel.peek();
                    let consumed = self
                        .parser
                        .feed(window)
                        .map_err(HttpClientError::from_parse_error)?;
                    channel.consume(consumed);
                    if self.parser.is_finished() {
                        match self.parser.chunk_len() {
                            0 => self.phase = ChunkPhase::Trailer,
                            len => {
                                self.remaining = len;
                                self.phase = ChunkPhase::Data;
                            }
                        }
                    }
                }
                ChunkPhase::Data => {
                    let cap = self.remaining.min(dest.len() as u64) as usize;
                    let n = channel
                        .read(&mut dest[..cap])
                        .map_err(|e| HttpClientError::from_io_error(ErrorKind::BodyTransfer, e))?;
                    if n == 0 {
                        return err_from_msg!(UnexpectedEof, "transport ended mid-chunk");
                    }
                    self.remaining -= n as u64;
                    if self.remaining == 0 {
                        self.parser.next_header();
                        self.phase = ChunkPhase::Header;
                    }
                    return Ok(n);
                }
                ChunkPhase::Trailer => {
                    if self.fill(channel)? == 0 {
                        return err_from_msg!(UnexpectedEof, "transport ended mid-trailer");
                    }
                    let window = channel.peek();
                    let consumed = self.scanner.feed(window);
                    if self.trailer_block.len() + consumed > self.trailer_limit {
                        return err_from_msg!(
                            HeadersExceededLimit,
                            "trailer block exceeds the header cap"
                        );
                    }
                    self.trailer_block.extend_from_slice(&window[..consumed]);
                    channel.consume(consumed);
                    if self.scanner.is_finished() {
                        let mut headers = Headers::new();
                        parse_field_block(&self.trailer_block, &mut headers)
                            .map_err(HttpClientError::from_parse_error)?;
                        if !headers.is_empty() {
                            self.trailers = Some(headers);
                        }
                        self.phase = ChunkPhase::Done;
                        return Ok(0);
                    }
                }
                ChunkPhase::Done => return Ok(0),
            }
        }
    }

    fn fill<S: Read + Write>(&self, channel: &mut Channel<S>) -> Result<usize, HttpClientError> {
        match channel.fill() {
            Ok(n) => Ok(n),
            Err(e) => err_from_io!(BodyTransfer, e),
        }
    }
}
