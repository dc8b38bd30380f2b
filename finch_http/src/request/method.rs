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

//! HTTP [`Method`].
//!
//! The request method token is the primary source of request semantics;
//! it indicates the purpose for which the client has made this request and
//! what is expected by the client as a successful result.
//!
//! [`Method`]: https://httpwg.org/specs/rfc9110.html#methods
//!
//! # Examples
//!
//! ```
//! use finch_http::request::method::Method;
//!
//! assert_eq!(Method::GET.as_str(), "GET");
//! ```

use crate::error::{ErrorKind, HttpError};

/// HTTP `Method` implementation.
///
/// # Examples
///
/// ```
/// use finch_http::request::method::Method;
///
/// assert_eq!(Method::GET.as_str(), "GET");
/// assert!(!Method::GET.permits_request_body());
/// assert!(Method::POST.permits_request_body());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Method(Inner);

impl Method {
    /// Transfer a current representation of the target resource.
    pub const GET: Self = Self(Inner::Get);

    /// Same as `GET`, but do not transfer the response content.
    pub const HEAD: Self = Self(Inner::Head);

    /// Perform resource-specific processing on the request content.
    pub const POST: Self = Self(Inner::Post);

    /// Replace all current representations of the target resource with the
    /// request content.
    pub const PUT: Self = Self(Inner::Put);

    /// Remove all current representations of the target resource.
    pub const DELETE: Self = Self(Inner::Delete);

    /// Establish a tunnel to the server identified by the target resource.
    pub const CONNECT: Self = Self(Inner::Connect);

    /// Describe the communication options for the target resource.
    pub const OPTIONS: Self = Self(Inner::Options);

    /// Perform a message loop-back test along the path to the target
    /// resource.
    pub const TRACE: Self = Self(Inner::Trace);

    /// Apply partial modifications to a resource.
    pub const PATCH: Self = Self(Inner::Patch);

    /// Tries converting `&[u8]` to `Method`. Only uppercase letters are
    /// supported.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::request::method::Method;
    ///
    /// let method = Method::from_bytes(b"GET").unwrap();
    /// assert_eq!(method.as_str(), "GET");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Method, HttpError> {
        if bytes.len() < 3 || bytes.len() > 7 {
            return Err(ErrorKind::InvalidInput.into());
        }
        match bytes[0] {
            b'G' if b"ET" == &bytes[1..] => Ok(Method::GET),
            b'P' => match bytes[1] {
                b'U' if b"T" == &bytes[2..] => Ok(Method::PUT),
                b'O' if b"ST" == &bytes[2..] => Ok(Method::POST),
                b'A' if b"TCH" == &bytes[2..] => Ok(Method::PATCH),
                _ => Err(ErrorKind::InvalidInput.into()),
            },
            b'H' if b"EAD" == &bytes[1..] => Ok(Method::HEAD),
            b'T' if b"RACE" == &bytes[1..] => Ok(Method::TRACE),
            b'D' if b"ELETE" == &bytes[1..] => Ok(Method::DELETE),
            b'O' if b"PTIONS" == &bytes[1..] => Ok(Method::OPTIONS),
            b'C' if b"ONNECT" == &bytes[1..] => Ok(Method::CONNECT),
            _ => Err(ErrorKind::InvalidInput.into()),
        }
    }

    /// Converts `Method` to `&str` in uppercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::request::method::Method;
    ///
    /// assert_eq!(Method::GET.as_str(), "GET");
    /// ```
    pub fn as_str(&self) -> &str {
        match self.0 {
            Inner::Get => "GET",
            Inner::Head => "HEAD",
            Inner::Post => "POST",
            Inner::Put => "PUT",
            Inner::Delete => "DELETE",
            Inner::Options => "OPTIONS",
            Inner::Trace => "TRACE",
            Inner::Connect => "CONNECT",
            Inner::Patch => "PATCH",
        }
    }

    /// Returns `true` if a request with this method may carry a body.
    ///
    /// `GET`, `HEAD`, `TRACE` and `CONNECT` requests have no defined body
    /// semantics, so the encoder refuses to frame one.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::request::method::Method;
    ///
    /// assert!(Method::PUT.permits_request_body());
    /// assert!(!Method::TRACE.permits_request_body());
    /// ```
    pub fn permits_request_body(&self) -> bool {
        !matches!(
            self.0,
            Inner::Get | Inner::Head | Inner::Trace | Inner::Connect
        )
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Inner {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

#[cfg(test)]
mod ut_method {
    use super::Method;

    /// UT test cases for `Method::from_bytes`.
    ///
    /// # Brief
    /// 1. Converts every supported token by calling `Method::from_bytes`.
    /// 2. Checks if the test results are correct.
    #[test]
    fn ut_method_from_bytes() {
        assert_eq!(Method::from_bytes(b"GET").unwrap(), Method::GET);
        assert_eq!(Method::from_bytes(b"HEAD").unwrap(), Method::HEAD);
        assert_eq!(Method::from_bytes(b"POST").unwrap(), Method::POST);
        assert_eq!(Method::from_bytes(b"PUT").unwrap(), Method::PUT);
        assert_eq!(Method::from_bytes(b"DELETE").unwrap(), Method::DELETE);
        assert_eq!(Method::from_bytes(b"CONNECT").unwrap(), Method::CONNECT);
        assert_eq!(Method::from_bytes(b"OPTIONS").unwrap(), Method::OPTIONS);
        assert_eq!(Method::from_bytes(b"TRACE").unwrap(), Method::TRACE);
        assert_eq!(Method::from_bytes(b"PATCH").unwrap(), Method::PATCH);
        assert!(Method::from_bytes(b"get").is_err());
        assert!(Method::from_bytes(b"").is_err());
    }

    /// UT test cases for `Method::permits_request_body`.
    ///
    /// # Brief
    /// 1. Checks the body permission of each method.
    #[test]
    fn ut_method_permits_request_body() {
        assert!(!Method::GET.permits_request_body());
        assert!(!Method::HEAD.permits_request_body());
        assert!(!Method::TRACE.permits_request_body());
        assert!(!Method::CONNECT.permits_request_body());
        assert!(Method::POST.permits_request_body());
        assert!(Method::PUT.permits_request_body());
        assert!(Method::DELETE.permits_request_body());
        assert!(Method::OPTIONS.permits_request_body());
        assert!(Method::PATCH.permits_request_body());
    }
}
