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

//! HTTP `Request` head.
//!
//! This module models the head of a client request: the request line
//! components and the header fields. Bodies are framed by the caller on
//! top of [`RequestEncoder`] output.
//!
//! [`RequestEncoder`]: crate::h1::RequestEncoder

pub mod method;

use crate::headers::Headers;
use crate::request::method::Method;
use crate::version::Version;

/// The head part of a request: request line components and header fields.
///
/// The request target is carried as an opaque string; URI parsing and
/// normalization happen outside this crate. `CONNECT` requests use
/// authority form, everything else origin form (or absolute form when the
/// request goes through a proxy).
///
/// # Examples
///
/// ```
/// use finch_http::headers::Headers;
/// use finch_http::request::method::Method;
/// use finch_http::request::RequestPart;
/// use finch_http::version::Version;
///
/// let part = RequestPart {
///     method: Method::GET,
///     target: String::from("/index.html"),
///     version: Version::HTTP1_1,
///     headers: Headers::new(),
/// };
/// assert_eq!(part.method.as_str(), "GET");
/// ```
#[derive(Debug)]
pub struct RequestPart {
    /// Method of the request.
    pub method: Method,
    /// Request target as it appears on the wire.
    pub target: String,
    /// HTTP version of the request.
    pub version: Version,
    /// Header fields of the request, in insertion order.
    pub headers: Headers,
}
