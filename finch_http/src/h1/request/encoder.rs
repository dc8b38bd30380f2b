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

//! HTTP/1 request encoder implementation.
//!
//! The encoder serializes a request head into caller-provided buffers in
//! wire format:
//!
//! ```text
//! method SP request-target SP HTTP-version CRLF
//! *( field-name ": " field-value CRLF )
//! CRLF
//! ```
//!
//! # Examples
//!
//! ```
//! use finch_http::h1::RequestEncoder;
//! use finch_http::headers::Headers;
//! use finch_http::request::method::Method;
//! use finch_http::request::RequestPart;
//! use finch_http::version::Version;
//!
//! let mut headers = Headers::new();
//! headers.append("host", "example.com").unwrap();
//!
//! let part = RequestPart {
//!     method: Method::GET,
//!     target: String::from("/"),
//!     version: Version::HTTP1_1,
//!     headers,
//! };
//!
//! let mut encoder = RequestEncoder::new(part);
//! let mut buf = [0u8; 10];
//! let mut message = Vec::new();
//! loop {
//!     let size = encoder.encode(&mut buf).unwrap();
//!     message.extend_from_slice(&buf[..size]);
//!     if size < buf.len() {
//!         break;
//!     }
//! }
//! assert_eq!(message, b"GET / HTTP/1.1\r\nhost: example.com\r\n\r\n");
//! ```

use crate::error::{ErrorKind, HttpError};
use crate::headers::Header;
use crate::request::RequestPart;

/// An encoder that serializes a request head in `HTTP/1` format.
///
/// The encoder supports encoding into buffers of arbitrary size: if a
/// buffer fills up mid-component, the position is saved and the next call
/// resumes where the previous one stopped.
///
/// # Return value of [`encode`]
///
/// - `Ok(size)` with `size == buf.len()`: the buffer has been completely
///   filled, but the head may not be fully output yet. Call `encode`
///   again for the rest.
/// - `Ok(size)` with `size < buf.len()`: the head has been fully output.
/// - `Err(e)`: an error occurred during encoding.
///
/// [`encode`]: RequestEncoder::encode
pub struct RequestEncoder {
    stage: EncodeStage,
    method: Vec<u8>,
    target: Vec<u8>,
    version: Vec<u8>,
    headers: std::vec::IntoIter<Header>,
    line: Vec<u8>,
    loaded: bool,
    src_idx: usize,
}

// Encoding phase, one per request-line component plus the header block
// and the blank line that ends the head.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum EncodeStage {
    Method,
    MethodSp,
    Target,
    TargetSp,
    Version,
    VersionCrlf,
    Header,
    FinalCrlf,
    Finished,
}

// Component encoding status.
enum TokenStatus {
    // The current component is completely encoded.
    Complete(usize),
    // The current component is partially encoded.
    Partial(usize),
}

impl RequestEncoder {
    /// Creates a new `RequestEncoder` from a `RequestPart`.
    pub fn new(part: RequestPart) -> Self {
        Self {
            stage: EncodeStage::Method,
            method: part.method.as_str().as_bytes().to_vec(),
            target: part.target.into_bytes(),
            version: part.version.as_str().as_bytes().to_vec(),
            headers: part.headers.into_iter(),
            line: Vec::new(),
            loaded: false,
            src_idx: 0,
        }
    }

    /// Encodes the request head into `dst`, returning the number of bytes
    /// written. See the type-level documentation for the contract.
    pub fn encode(&mut self, dst: &mut [u8]) -> Result<usize, HttpError> {
        if dst.is_empty() {
            return Err(ErrorKind::InvalidInput.into());
        }
        let mut count = 0;
        while count != dst.len() && self.stage != EncodeStage::Finished {
            count += match self.stage {
                EncodeStage::Method => self.copy_part(&mut dst[count..], EncodeStage::MethodSp),
                EncodeStage::MethodSp => self.copy_part(&mut dst[count..], EncodeStage::Target),
                EncodeStage::Target => self.copy_part(&mut dst[count..], EncodeStage::TargetSp),
                EncodeStage::TargetSp => self.copy_part(&mut dst[count..], EncodeStage::Version),
                EncodeStage::Version => self.copy_part(&mut dst[count..], EncodeStage::VersionCrlf),
                EncodeStage::VersionCrlf => self.copy_part(&mut dst[count..], EncodeStage::Header),
                EncodeStage::Header => self.copy_part(&mut dst[count..], EncodeStage::FinalCrlf),
                EncodeStage::FinalCrlf => self.copy_part(&mut dst[count..], EncodeStage::Finished),
                EncodeStage::Finished => 0,
            };
        }
        Ok(count)
    }

    // Copies the current component into `dst`; advances to `next` when
    // the component is exhausted.
    fn copy_part(&mut self, dst: &mut [u8], next: EncodeStage) -> usize {
        if !self.loaded {
            self.line = self.current_bytes();
            self.loaded = true;
        }
        match self.write_line(dst) {
            TokenStatus::Complete(written) => {
                // Header entries chain within the same stage.
                if self.stage == EncodeStage::Header && self.next_header_line() {
                    return written;
                }
                self.loaded = false;
                self.stage = next;
                written
            }
            TokenStatus::Partial(written) => written,
        }
    }

    fn current_bytes(&mut self) -> Vec<u8> {
        match self.stage {
            EncodeStage::Method => std::mem::take(&mut self.method),
            EncodeStage::MethodSp | EncodeStage::TargetSp => b" ".to_vec(),
            EncodeStage::Target => std::mem::take(&mut self.target),
            EncodeStage::Version => std::mem::take(&mut self.version),
            EncodeStage::VersionCrlf | EncodeStage::FinalCrlf => b"\r\n".to_vec(),
            EncodeStage::Header => self.take_header_lines(),
            EncodeStage::Finished => Vec::new(),
        }
    }

    // Serializes the next header entry with a non-empty value as
    // `name: value CRLF`. Returns an empty line when no entry remains,
    // which makes the Header stage a no-op for header-less requests.
    fn take_header_lines(&mut self) -> Vec<u8> {
        for header in self.headers.by_ref() {
            if header.value().is_empty() {
                continue;
            }
            let (name, value) = (header.name().as_bytes(), header.value().as_bytes());
            let mut line = Vec::with_capacity(name.len() + value.len() + 4);
            line.extend_from_slice(name);
            line.extend_from_slice(b": ");
            line.extend_from_slice(value);
            line.extend_from_slice(b"\r\n");
            return line;
        }
        Vec::new()
    }

    // Loads the next header line, if any, keeping the stage unchanged.
    fn next_header_line(&mut self) -> bool {
        self.line = self.take_header_lines();
        self.src_idx = 0;
        !self.line.is_empty()
    }

    fn write_line(&mut self, dst: &mut [u8]) -> TokenStatus {
        let rest = &self.line[self.src_idx..];
        let num = rest.len().min(dst.len());
        dst[..num].copy_from_slice(&rest[..num]);
        if num == rest.len() {
            self.src_idx = 0;
            TokenStatus::Complete(num)
        } else {
            self.src_idx += num;
            TokenStatus::Partial(num)
        }
    }
}
