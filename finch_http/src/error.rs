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

//! Errors that may occur in this crate.
//!
//! [`HttpError`] encapsulates every error the protocol components can
//! produce: header table construction errors, header-block parsing errors
//! and chunked-framing errors.
//!
//! [`HttpError`]: HttpError

use core::fmt::{Debug, Display, Formatter};
use std::error::Error;

/// Errors that may occur when using this crate.
///
/// # Examples
///
/// ```
/// use finch_http::error::{ErrorKind, HttpError};
///
/// let error = HttpError::from(ErrorKind::HeadersInvalid);
/// assert_eq!(error.kind(), ErrorKind::HeadersInvalid);
/// ```
#[derive(Debug, Eq, PartialEq)]
pub struct HttpError {
    kind: ErrorKind,
}

impl HttpError {
    /// Gets the [`ErrorKind`] of this error.
    ///
    /// [`ErrorKind`]: ErrorKind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for HttpError {
    fn from(kind: ErrorKind) -> Self {
        HttpError { kind }
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.kind.as_str())
    }
}

impl Error for HttpError {}

/// Kinds of errors produced by the protocol components.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// An invalid input parameter was passed to a method of this crate.
    InvalidInput,

    /// A header block did not finish within the configured size cap.
    HeadersExceededLimit,

    /// Malformed status line or field line, unsupported version string,
    /// non-integer status code or obsolete line folding.
    HeadersInvalid,

    /// Non-hexadecimal chunk-size digit, chunk-size overflow or a missing
    /// CRLF chunk suffix.
    InvalidChunkedEncoding,
}

impl ErrorKind {
    /// Gets the string representation of this `ErrorKind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid input",
            Self::HeadersExceededLimit => "headers exceeded size limit",
            Self::HeadersInvalid => "invalid headers",
            Self::InvalidChunkedEncoding => "invalid chunked encoding",
        }
    }
}
