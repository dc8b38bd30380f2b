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

//! Synchronous HTTP client tying the pool and the message lifecycle
//! together.
//!
//! [`Client::request`] is the convenience surface: it leases a
//! connection, runs one full transaction, collects the body and parks or
//! closes the connection per keep-alive. Callers that stream bodies use
//! [`Client::lease`] and drive a [`Message`] themselves.
//!
//! [`Message`]: crate::message::Message

use std::io::{Read, Write};

use finch_http::headers::Headers;
use finch_http::response::ResponsePart;

use crate::coding::CodingRegistry;
use crate::connector::{Connector, HttpConnector};
use crate::error::HttpClientError;
use crate::message::{Framing, Message, RequestOptions};
use crate::pool::{ConnPool, PoolKey, PoolNode};

/// HTTP synchronous client. `Client` depends on a [`Connector`] that can
/// be customized by the caller.
///
/// # Examples
///
/// ```no_run
/// use finch_http_client::{Client, Method, RequestOptions};
///
/// let client = Client::new();
/// let response = client
///     .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
///     .unwrap();
/// assert_eq!(response.part.status.as_u16(), 200);
/// ```
pub struct Client<C: Connector> {
    pool: ConnPool<C>,
    header_limit: usize,
    registry: CodingRegistry,
    user_agent: Option<String>,
}

impl Client<HttpConnector> {
    /// Creates a client over plain TCP with default settings.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /// Creates a new, default [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl Default for Client<HttpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> Client<C> {
    /// Creates a client with a custom connector and default settings.
    pub fn with_connector(connector: C) -> Self {
        Self {
            pool: ConnPool::new(connector),
            header_limit: 8 * 1024,
            registry: CodingRegistry::new(),
            user_agent: None,
        }
    }

    /// Leases a pooled connection for streaming use. The lease must come
    /// back through [`release`].
    ///
    /// [`release`]: Client::release
    pub fn lease(
        &self,
        host: &str,
        port: u16,
        tls: bool,
    ) -> Result<Box<PoolNode<C::Stream>>, HttpClientError> {
        self.pool.connect(&PoolKey::new(host, port, tls))
    }

    /// Returns a leased connection to the pool.
    pub fn release(&self, node: Box<PoolNode<C::Stream>>) {
        self.pool.release(node);
    }

    /// Starts a transaction over a leased connection, applying this
    /// client's header cap and codec registry.
    pub fn message<'a>(&self, node: &'a mut PoolNode<C::Stream>) -> Message<'a, C::Stream>
    where
        C::Stream: Read + Write,
    {
        let mut message = Message::new(node.conn_mut());
        message.set_header_limit(self.header_limit);
        message.set_codings(self.registry.clone());
        if let Some(agent) = &self.user_agent {
            message.set_user_agent(agent);
        }
        message
    }

    /// Sends one request and collects the whole response.
    ///
    /// When `body` is given and `opts.framing` is `None`, the framing is
    /// promoted to `Fixed(body.len())`. On any error the connection is
    /// closed rather than parked.
    pub fn request(
        &self,
        opts: &RequestOptions,
        body: Option<&[u8]>,
    ) -> Result<Response, HttpClientError>
    where
        C::Stream: Read + Write,
    {
        let mut node = self.lease(&opts.host, opts.port, opts.tls)?;
        let result = self.transact(&mut node, opts, body);
        if result.is_err() {
            node.conn_mut().set_keep_alive(false);
        }
        self.pool.release(node);
        result
    }

    /// Closes every parked connection and refuses further leases.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    fn transact(
        &self,
        node: &mut PoolNode<C::Stream>,
        opts: &RequestOptions,
        body: Option<&[u8]>,
    ) -> Result<Response, HttpClientError>
    where
        C::Stream: Read + Write,
    {
        let promoted;
        let opts = match (body, opts.framing) {
            (Some(bytes), Framing::None) => {
                // Promote to counted framing for the convenience path.
                let mut copy = opts.clone();
                copy.framing = Framing::Fixed(bytes.len() as u64);
                promoted = copy;
                &promoted
            }
            _ => opts,
        };
        let mut message = self.message(node);
        message.send(opts)?;
        if let Some(bytes) = body {
            let mut rest = bytes;
            while !rest.is_empty() {
                let n = message.write(rest)?;
                rest = &rest[n..];
            }
        }
        message.finish()?;
        let part = message.wait()?;

        let mut body = Vec::new();
        let mut buf = [0u8; 16 * 1024];
        loop {
            let n = message.read(&mut buf)?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&buf[..n]);
        }
        let trailers = message.take_trailers();
        message.close();
        Ok(Response {
            part,
            body,
            trailers,
        })
    }
}

/// A fully collected response: head, body bytes and trailer headers.
#[derive(Debug)]
pub struct Response {
    /// Status line components and headers.
    pub part: ResponsePart,
    /// The decoded body.
    pub body: Vec<u8>,
    /// Trailer headers observed after a chunked body.
    pub trailers: Option<Headers>,
}

/// Builder of [`Client`] instances over plain TCP.
pub struct ClientBuilder {
    free_max: usize,
    header_limit: usize,
    registry: CodingRegistry,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Creates a builder with the default settings: 32 parked
    /// connections, 8 KiB header cap, identity-only codings and the
    /// library's `User-Agent` identifier.
    pub fn new() -> Self {
        Self {
            free_max: 32,
            header_limit: 8 * 1024,
            registry: CodingRegistry::new(),
            user_agent: None,
        }
    }

    /// Bounds the pool's free list.
    pub fn free_max(mut self, free_max: usize) -> Self {
        self.free_max = free_max;
        self
    }

    /// Caps response header and trailer blocks.
    pub fn header_limit(mut self, limit: usize) -> Self {
        self.header_limit = limit;
        self
    }

    /// Installs codec factories.
    pub fn codings(mut self, registry: CodingRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Overrides the `User-Agent` value emitted for requests whose
    /// caller headers do not carry one.
    pub fn user_agent(mut self, agent: &str) -> Self {
        self.user_agent = Some(agent.to_string());
        self
    }

    /// Builds the client over plain TCP.
    pub fn build(self) -> Client<HttpConnector> {
        self.build_with_connector(HttpConnector::new())
    }

    /// Builds the client over a custom connector.
    pub fn build_with_connector<C: Connector>(self, connector: C) -> Client<C> {
        Client {
            pool: ConnPool::with_free_max(connector, self.free_max),
            header_limit: self.header_limit,
            registry: self.registry,
            user_agent: self.user_agent,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
