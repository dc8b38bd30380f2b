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

//! HTTP [`Status Code`].
//!
//! The status code of a response is a three-digit integer code that
//! describes the result of the request and the semantics of the response.
//!
//! [`Status Code`]: https://httpwg.org/specs/rfc9110.html#status.codes

use crate::error::{ErrorKind, HttpError};

/// HTTP response `Status Code` implementation.
///
/// # Examples
///
/// ```
/// use finch_http::response::status::StatusCode;
///
/// let status = StatusCode::from_bytes(b"200").unwrap();
/// assert_eq!(status.as_u16(), 200);
/// assert!(status.is_successful());
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusCode(u16);

impl StatusCode {
    /// Converts a `u16` to a `StatusCode`. The code must be in `[100, 999]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::response::status::StatusCode;
    ///
    /// let status = StatusCode::from_u16(200).unwrap();
    /// assert!(StatusCode::from_u16(99).is_err());
    /// ```
    pub fn from_u16(code: u16) -> Result<StatusCode, HttpError> {
        if !(100..1000).contains(&code) {
            return Err(ErrorKind::InvalidInput.into());
        }
        Ok(StatusCode(code))
    }

    /// Converts a byte slice to a `StatusCode`. The input must be exactly
    /// three ASCII digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::response::status::StatusCode;
    ///
    /// let status = StatusCode::from_bytes(b"404").unwrap();
    /// assert_eq!(status.as_u16(), 404);
    /// assert!(StatusCode::from_bytes(b"2000").is_err());
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        if bytes.len() != 3 {
            return Err(ErrorKind::InvalidInput.into());
        }
        let mut code = 0u16;
        for b in bytes.iter() {
            if !b.is_ascii_digit() {
                return Err(ErrorKind::InvalidInput.into());
            }
            code = code * 10 + u16::from(b - b'0');
        }
        Self::from_u16(code)
    }

    /// Gets the `u16` value of this `StatusCode`.
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns `true` if the status code is `1xx`.
    pub fn is_informational(&self) -> bool {
        (100..200).contains(&self.0)
    }

    /// Returns `true` if the status code is `2xx`.
    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// Returns `true` if the status code is `3xx`.
    pub fn is_redirection(&self) -> bool {
        (300..400).contains(&self.0)
    }

    /// Returns `true` if the status code is `4xx`.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// Returns `true` if the status code is `5xx`.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    /// Returns `true` if a response with this status never carries a body,
    /// regardless of its framing headers.
    pub fn forbids_body(&self) -> bool {
        self.is_informational() || self.0 == 204 || self.0 == 304
    }
}
