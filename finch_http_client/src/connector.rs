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

//! Transport establishment seam.

use std::io::{Read, Write};
use std::net::TcpStream;

use crate::pool::PoolKey;

/// `Connector` trait used by the pool to open transports. TLS initiators
/// and test harnesses provide their own implementations.
pub trait Connector {
    /// The byte stream established by [`connect`].
    ///
    /// [`connect`]: Connector::connect
    type Stream: Read + Write;

    /// Possible errors during connection establishment.
    type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

    /// Attempts to establish a connection for `key`.
    fn connect(&self, key: &PoolKey) -> Result<Self::Stream, Self::Error>;
}

/// Connector for plain TCP connections.
///
/// Keys carrying the tls flag are refused; wrapping a stream in TLS is an
/// external collaborator's job.
#[derive(Default)]
pub struct HttpConnector;

impl HttpConnector {
    /// Creates a new `HttpConnector`.
    pub fn new() -> Self {
        Self
    }
}

impl Connector for HttpConnector {
    type Stream = TcpStream;
    type Error = std::io::Error;

    fn connect(&self, key: &PoolKey) -> Result<Self::Stream, Self::Error> {
        if key.is_tls() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "tls transports require an external connector",
            ));
        }
        TcpStream::connect((key.host(), key.port()))
    }
}
