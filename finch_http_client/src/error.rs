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

//! Definition of `HttpClientError`, which includes every error that may
//! occur in this crate.

use core::fmt::{Debug, Display, Formatter};
use std::{error, io};

use finch_http::error::HttpError;

macro_rules! err_from_msg {
    ($kind:ident, $msg:literal) => {
        Err($crate::error::HttpClientError::from_str(
            $crate::error::ErrorKind::$kind,
            $msg,
        ))
    };
}

macro_rules! err_from_io {
    ($kind:ident, $err:expr) => {
        Err($crate::error::HttpClientError::from_io_error(
            $crate::error::ErrorKind::$kind,
            $err,
        ))
    };
}

/// The structure encapsulates errors that can be encountered when working
/// with the HTTP client.
///
/// # Examples
///
/// ```
/// use finch_http_client::{ErrorKind, HttpClientError};
///
/// let error = HttpClientError::from_str(ErrorKind::NotWritable, "no request body");
/// assert_eq!(error.error_kind(), ErrorKind::NotWritable);
/// ```
pub struct HttpClientError {
    kind: ErrorKind,
    cause: Cause,
}

impl HttpClientError {
    /// Gets the `ErrorKind` of this `HttpClientError`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http_client::{ErrorKind, HttpClientError};
    ///
    /// let error = HttpClientError::from_str(ErrorKind::UnexpectedEof, "early eof");
    /// assert_eq!(error.error_kind(), ErrorKind::UnexpectedEof);
    /// ```
    pub fn error_kind(&self) -> ErrorKind {
        self.kind
    }

    /// Gets the `io::Error` if this `HttpClientError` comes from an
    /// `io::Error`, `None` otherwise.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self.cause {
            Cause::Io(ref io) => Some(io),
            _ => None,
        }
    }

    /// Creates an error from a kind and a static message.
    pub fn from_str(kind: ErrorKind, msg: &'static str) -> Self {
        Self {
            kind,
            cause: Cause::Msg(msg),
        }
    }

    pub(crate) fn from_error<T>(kind: ErrorKind, err: T) -> Self
    where
        T: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self {
            kind,
            cause: Cause::Other(err.into()),
        }
    }

    pub(crate) fn from_io_error(kind: ErrorKind, err: io::Error) -> Self {
        Self {
            kind,
            cause: Cause::Io(err),
        }
    }

    // Parse-layer errors keep their kind; the original error is retained
    // as the cause.
    pub(crate) fn from_parse_error(err: HttpError) -> Self {
        use finch_http::error::ErrorKind as Parse;

        let kind = match err.kind() {
            Parse::HeadersExceededLimit => ErrorKind::HeadersExceededLimit,
            Parse::HeadersInvalid => ErrorKind::HeadersInvalid,
            Parse::InvalidChunkedEncoding => ErrorKind::InvalidChunkedEncoding,
            Parse::InvalidInput => ErrorKind::Request,
        };
        Self::from_error(kind, err)
    }
}

impl Debug for HttpClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpClientError")
            .field("ErrorKind", &self.kind)
            .field("Cause", &self.cause)
            .finish()
    }
}

impl Display for HttpClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.kind.as_str())?;
        write!(f, ": {}", self.cause)
    }
}

impl error::Error for HttpClientError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.cause {
            Cause::Io(ref io) => Some(io),
            Cause::Other(ref other) => Some(other.as_ref()),
            _ => None,
        }
    }
}

enum Cause {
    Msg(&'static str),
    Io(io::Error),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl Debug for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Msg(msg) => f.write_str(msg),
            Self::Io(io) => Debug::fmt(io, f),
            Self::Other(other) => Debug::fmt(other, f),
        }
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Msg(msg) => f.write_str(msg),
            Self::Io(io) => Display::fmt(io, f),
            Self::Other(other) => Display::fmt(other, f),
        }
    }
}

/// Error kinds which can indicate the type of an `HttpClientError`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Errors during connection establishment.
    Connect,

    /// Errors while emitting the request or taking the message state
    /// machine through an illegal transition.
    Request,

    /// The response header block exceeded the configured cap.
    HeadersExceededLimit,

    /// Malformed status line or field line, unsupported version string or
    /// a non-integer status code.
    HeadersInvalid,

    /// Unknown transfer coding, `chunked` not listed last, caller-supplied
    /// framing headers, or framing incompatible with the request method.
    UnsupportedTransferEncoding,

    /// Malformed chunk-size line or chunk-size overflow.
    InvalidChunkedEncoding,

    /// A body write exceeded the declared `Content-Length`.
    MessageTooLong,

    /// `finish` was called before the declared `Content-Length` was
    /// reached.
    MessageNotComplete,

    /// A body write was attempted on a request without body framing.
    NotWritable,

    /// No decoder is installed for the response's content coding, or the
    /// installed decoder failed.
    DecompressionFailed,

    /// The transport ended mid-message.
    UnexpectedEof,

    /// Errors while transferring body bytes.
    BodyTransfer,

    /// Errors surfaced by a TLS transport.
    Tls,

    /// Other errors.
    Other,
}

impl ErrorKind {
    /// Gets the string representation of this `ErrorKind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "Connect Error",
            Self::Request => "Request Error",
            Self::HeadersExceededLimit => "Headers Exceeded Size Limit",
            Self::HeadersInvalid => "Headers Invalid",
            Self::UnsupportedTransferEncoding => "Unsupported Transfer Encoding",
            Self::InvalidChunkedEncoding => "Invalid Chunked Encoding",
            Self::MessageTooLong => "Message Too Long",
            Self::MessageNotComplete => "Message Not Complete",
            Self::NotWritable => "Not Writable",
            Self::DecompressionFailed => "Decompression Failed",
            Self::UnexpectedEof => "Unexpected Eof",
            Self::BodyTransfer => "Body Transfer Error",
            Self::Tls => "Tls Error",
            Self::Other => "Other Error",
        }
    }
}
