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

//! HTTP [`Version`].
//!
//! HTTP's version number consists of two decimal digits separated by a "."
//! (period or decimal point). This crate only speaks `HTTP/1.1` on the
//! wire; `HTTP/1.0` exists as a value so callers can label legacy peers.
//!
//! [`Version`]: https://httpwg.org/specs/rfc9110.html#protocol.version

use core::convert::TryFrom;

use crate::error::{ErrorKind, HttpError};

/// HTTP [`Version`] implementation.
///
/// [`Version`]: https://httpwg.org/specs/rfc9110.html#protocol.version
///
/// # Examples
///
/// ```
/// use finch_http::version::Version;
///
/// assert_eq!(Version::HTTP1_1.as_str(), "HTTP/1.1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Version(Inner);

impl Version {
    /// HTTP/1.0
    pub const HTTP1_0: Self = Self(Inner::Http10);
    /// HTTP/1.1
    pub const HTTP1_1: Self = Self(Inner::Http11);

    /// Converts a `Version` to a `&str`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::version::Version;
    ///
    /// assert_eq!(Version::HTTP1_1.as_str(), "HTTP/1.1");
    /// ```
    pub fn as_str(&self) -> &str {
        match self.0 {
            Inner::Http10 => "HTTP/1.0",
            Inner::Http11 => "HTTP/1.1",
        }
    }
}

impl<'a> TryFrom<&'a str> for Version {
    type Error = HttpError;

    fn try_from(str: &'a str) -> Result<Self, Self::Error> {
        match str {
            "HTTP/1.0" => Ok(Version::HTTP1_0),
            "HTTP/1.1" => Ok(Version::HTTP1_1),
            _ => Err(ErrorKind::InvalidInput.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Inner {
    Http10,
    Http11,
}
