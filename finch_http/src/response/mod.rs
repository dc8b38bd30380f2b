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

//! HTTP `Response` head.
//!
//! A server responds to a client's request by sending one or more HTTP
//! response messages. This module only models the head of a response; the
//! body is delivered separately by whatever framing layer consumed the
//! head.

pub mod status;

use crate::headers::Headers;
use crate::response::status::StatusCode;
use crate::version::Version;

/// The head part of a response: status line components and header fields.
///
/// # Examples
///
/// ```
/// use finch_http::h1::ResponseDecoder;
///
/// let mut decoder = ResponseDecoder::new();
/// let (part, body) = decoder
///     .decode(b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\ngood")
///     .unwrap()
///     .unwrap();
/// assert_eq!(part.status.as_u16(), 200);
/// assert_eq!(part.reason, "OK");
/// assert_eq!(body, b"good");
/// ```
#[derive(Debug)]
pub struct ResponsePart {
    /// HTTP version of the response.
    pub version: Version,
    /// Status code of the response.
    pub status: StatusCode,
    /// Reason phrase of the status line. May be empty.
    pub reason: String,
    /// Header fields of the response, in arrival order.
    pub headers: Headers,
}
