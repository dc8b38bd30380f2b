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

//! `finch_http_client` provides a synchronous HTTP/1.1 client core based
//! on the `finch_http` crate: a transaction state machine over pooled,
//! buffered transports.
//!
//! The byte-level transport, TLS and compression codecs are collaborator
//! seams: plug them in through [`Connector`] and [`coding::CodingRegistry`].

// finch_http crate re-export.
pub use finch_http::headers::{Header, HeaderName, HeaderValue, Headers};
pub use finch_http::request::method::Method;
pub use finch_http::response::status::StatusCode;
pub use finch_http::response::ResponsePart;
pub use finch_http::version::Version;

#[macro_use]
mod error;

pub mod client;
pub mod coding;
pub mod connector;
pub mod message;
pub mod pool;
pub mod transport;

pub(crate) mod body;

pub use client::{Client, ClientBuilder, Response};
pub use connector::{Connector, HttpConnector};
pub use error::{ErrorKind, HttpClientError};
pub use message::{Framing, Message, MessageState, RequestOptions};
pub use pool::{ConnPool, PoolKey, PoolNode};
