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

//! Content-coding adapter contract.
//!
//! Codec implementations are external collaborators: the caller installs
//! factories in a [`CodingRegistry`] and the message layer routes body
//! bytes through them. Only [`Identity`] ships with this crate.
//!
//! On the write side an [`Encode`] emits compressed bytes into a scratch
//! buffer that the chunked framer wraps; on the read side a [`Decode`]
//! transforms bytes pulled from the framing reader before they reach the
//! caller.

use std::sync::Arc;

use crate::error::HttpClientError;

/// End-to-end payload codings this crate understands in framing headers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentCoding {
    /// No transformation.
    Identity,
    /// RFC1951 deflate.
    Deflate,
    /// RFC1952 gzip.
    Gzip,
    /// Zstandard.
    Zstd,
}

impl ContentCoding {
    /// Matches a coding token case-insensitively. Surrounding whitespace
    /// must already be trimmed.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.eq_ignore_ascii_case(b"identity") {
            Some(Self::Identity)
        } else if bytes.eq_ignore_ascii_case(b"deflate") {
            Some(Self::Deflate)
        } else if bytes.eq_ignore_ascii_case(b"gzip") {
            Some(Self::Gzip)
        } else if bytes.eq_ignore_ascii_case(b"zstd") {
            Some(Self::Zstd)
        } else {
            None
        }
    }

    /// Gets the token of this coding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Deflate => "deflate",
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
        }
    }
}

/// Streaming compressor contract for the request body.
pub trait Encode {
    /// Consumes all of `src`, appending any output to `dst`. Returns the
    /// number of source bytes accepted.
    fn encode(&mut self, src: &[u8], dst: &mut Vec<u8>) -> Result<usize, HttpClientError>;

    /// Flushes remaining state, appending the final output (for deflate,
    /// the final block) to `dst`.
    fn finish(&mut self, dst: &mut Vec<u8>) -> Result<(), HttpClientError>;
}

/// Streaming decompressor contract for the response body.
pub trait Decode {
    /// Decodes from `src` into `dst`, returning `(consumed, produced)`.
    /// A decoder must make progress whenever `src` is non-empty.
    fn decode(&mut self, src: &[u8], dst: &mut [u8]) -> Result<(usize, usize), HttpClientError>;
}

/// The identity coding: bytes pass through unchanged.
pub struct Identity;

impl Encode for Identity {
    fn encode(&mut self, src: &[u8], dst: &mut Vec<u8>) -> Result<usize, HttpClientError> {
        dst.extend_from_slice(src);
        Ok(src.len())
    }

    fn finish(&mut self, _dst: &mut Vec<u8>) -> Result<(), HttpClientError> {
        Ok(())
    }
}

impl Decode for Identity {
    fn decode(&mut self, src: &[u8], dst: &mut [u8]) -> Result<(usize, usize), HttpClientError> {
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        Ok((n, n))
    }
}

type EncoderFactory = Arc<dyn Fn() -> Box<dyn Encode + Send> + Send + Sync>;
type DecoderFactory = Arc<dyn Fn() -> Box<dyn Decode + Send> + Send + Sync>;

/// Installed codec factories, shared by every transaction of a client.
///
/// A fresh registry knows only the identity coding; asking for anything
/// else fails at the message layer until the caller installs a factory.
///
/// # Examples
///
/// ```
/// use finch_http_client::coding::{CodingRegistry, ContentCoding, Identity};
///
/// let mut registry = CodingRegistry::new();
/// // A caller with a real deflate implementation would construct it here.
/// registry.set_decoder(ContentCoding::Deflate, || Box::new(Identity));
/// assert!(registry.decoder(ContentCoding::Deflate).is_some());
/// assert!(registry.decoder(ContentCoding::Gzip).is_none());
/// ```
#[derive(Clone, Default)]
pub struct CodingRegistry {
    deflate_enc: Option<EncoderFactory>,
    deflate_dec: Option<DecoderFactory>,
    gzip_dec: Option<DecoderFactory>,
    zstd_dec: Option<DecoderFactory>,
}

impl CodingRegistry {
    /// Creates a registry with no installed codecs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a decoder factory for `coding`. Installing one for
    /// `Identity` has no effect; identity is always available.
    pub fn set_decoder<F>(&mut self, coding: ContentCoding, factory: F)
    where
        F: Fn() -> Box<dyn Decode + Send> + Send + Sync + 'static,
    {
        let factory: DecoderFactory = Arc::new(factory);
        match coding {
            ContentCoding::Identity => {}
            ContentCoding::Deflate => self.deflate_dec = Some(factory),
            ContentCoding::Gzip => self.gzip_dec = Some(factory),
            ContentCoding::Zstd => self.zstd_dec = Some(factory),
        }
    }

    /// Installs the deflate encoder factory for the request side. The
    /// write side supports identity and deflate only.
    pub fn set_deflate_encoder<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Encode + Send> + Send + Sync + 'static,
    {
        self.deflate_enc = Some(Arc::new(factory));
    }

    /// Builds a decoder for `coding`, `None` if no factory is installed.
    pub fn decoder(&self, coding: ContentCoding) -> Option<Box<dyn Decode + Send>> {
        match coding {
            ContentCoding::Identity => Some(Box::new(Identity)),
            ContentCoding::Deflate => self.deflate_dec.as_ref().map(|f| f()),
            ContentCoding::Gzip => self.gzip_dec.as_ref().map(|f| f()),
            ContentCoding::Zstd => self.zstd_dec.as_ref().map(|f| f()),
        }
    }

    /// Builds an encoder for `coding`, `None` if unsupported on the write
    /// side or no factory is installed.
    pub fn encoder(&self, coding: ContentCoding) -> Option<Box<dyn Encode + Send>> {
        match coding {
            ContentCoding::Identity => Some(Box::new(Identity)),
            ContentCoding::Deflate => self.deflate_enc.as_ref().map(|f| f()),
            ContentCoding::Gzip | ContentCoding::Zstd => None,
        }
    }
}
