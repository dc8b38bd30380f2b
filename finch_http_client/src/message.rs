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

//! The duplex message lifecycle.
//!
//! A [`Message`] borrows a pooled connection for one transaction and
//! walks it through request emission and response ingestion:
//!
//! ```text
//! Idle --send()--> RequestBody --write()*--> --finish()--> RequestDone
//! RequestDone --wait()--> ResponseBody --read()*--> --close()--> Closed
//! ```
//!
//! The lifecycle owns all framing decisions. Callers choose a [`Framing`]
//! for the request; the response's framing is derived from its headers
//! and the HTTP rules for HEAD, 1xx, 204, 304 and CONNECT.

use std::io::{Read, Write};

use finch_http::h1::{RequestEncoder, ResponseDecoder};
use finch_http::headers::Headers;
use finch_http::request::method::Method;
use finch_http::request::RequestPart;
use finch_http::response::ResponsePart;
use finch_http::version::Version;

use crate::body::{write_chunk, BodyReader, BodyWriter};
use crate::coding::{CodingRegistry, ContentCoding, Decode, Encode};
use crate::error::{ErrorKind, HttpClientError};
use crate::transport::Connection;

const DEFAULT_HEADER_LIMIT: usize = 8 * 1024;
const USER_AGENT: &str = concat!("finch-http/", env!("CARGO_PKG_VERSION"));

/// Body delimitation of one message direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Framing {
    /// No body.
    None,
    /// A body of exactly the given length.
    Fixed(u64),
    /// A chunked body.
    Chunked,
}

/// Lifecycle position of a [`Message`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageState {
    /// Nothing sent yet.
    Idle,
    /// The request head is being emitted.
    RequestHead,
    /// The request head is out; body writes are legal.
    RequestBody,
    /// The request is complete.
    RequestDone,
    /// The response head is being ingested.
    ResponseHead,
    /// The response head is in; body reads are legal.
    ResponseBody,
    /// The transaction is over.
    Closed,
}

/// What to send: the request line components, caller headers and body
/// framing. Host, port and path stand in for a parsed URI; URI handling
/// is outside the core.
#[derive(Clone)]
pub struct RequestOptions {
    /// Request method.
    pub method: Method,
    /// Server host name.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Whether the transport is TLS-wrapped (affects the default `Host`
    /// header and the pool key).
    pub tls: bool,
    /// Origin-form request target. Ignored for CONNECT, which uses
    /// authority form.
    pub path: String,
    /// Emit an absolute-form target, for requests through a proxy.
    pub via_proxy: bool,
    /// Request body framing.
    pub framing: Framing,
    /// Request body coding. Only identity and deflate are legal, and any
    /// non-identity coding requires chunked framing.
    pub coding: ContentCoding,
    /// Caller headers, emitted after the defaults in insertion order.
    pub headers: Headers,
}

impl RequestOptions {
    /// Creates options for a body-less request to `host:port`.
    pub fn new(method: Method, host: &str, port: u16) -> Self {
        Self {
            method,
            host: host.to_string(),
            port,
            tls: false,
            path: String::from("/"),
            via_proxy: false,
            framing: Framing::None,
            coding: ContentCoding::Identity,
            headers: Headers::new(),
        }
    }
}

/// One HTTP/1.1 transaction over a borrowed connection.
///
/// # Examples
///
/// ```no_run
/// use finch_http_client::message::{Message, RequestOptions};
/// use finch_http_client::Method;
/// # fn run(conn: &mut finch_http_client::transport::Connection<std::net::TcpStream>)
/// #     -> Result<(), finch_http_client::HttpClientError> {
///
/// let mut message = Message::new(conn);
/// message.send(&RequestOptions::new(Method::GET, "example.com", 80))?;
/// message.finish()?;
/// let part = message.wait()?;
/// assert_eq!(part.status.as_u16(), 200);
///
/// let mut body = Vec::new();
/// let mut buf = [0u8; 4096];
/// loop {
///     let n = message.read(&mut buf)?;
///     if n == 0 {
///         break;
///     }
///     body.extend_from_slice(&buf[..n]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Message<'a, S> {
    conn: &'a mut Connection<S>,
    state: MessageState,
    method: Method,
    writer: BodyWriter,
    encoder: Option<Box<dyn Encode + Send>>,
    scratch: Vec<u8>,
    reader: BodyReader,
    decoder: Option<Box<dyn Decode + Send>>,
    raw: Vec<u8>,
    raw_pos: usize,
    raw_len: usize,
    header_limit: usize,
    registry: CodingRegistry,
    user_agent: Option<String>,
    tunnel: bool,
}

impl<'a, S: Read + Write> Message<'a, S> {
    /// Starts a transaction over `conn`.
    pub fn new(conn: &'a mut Connection<S>) -> Self {
        Self {
            conn,
            state: MessageState::Idle,
            method: Method::GET,
            writer: BodyWriter::Forbidden,
            encoder: None,
            scratch: Vec::new(),
            reader: BodyReader::Empty,
            decoder: None,
            raw: Vec::new(),
            raw_pos: 0,
            raw_len: 0,
            header_limit: DEFAULT_HEADER_LIMIT,
            registry: CodingRegistry::new(),
            user_agent: None,
            tunnel: false,
        }
    }

    /// Caps the response header block (and trailer block). Default 8 KiB.
    pub fn set_header_limit(&mut self, limit: usize) {
        self.header_limit = limit;
    }

    /// Installs the codec registry used for request encoding and
    /// response decoding.
    pub fn set_codings(&mut self, registry: CodingRegistry) {
        self.registry = registry;
    }

    /// Overrides the `User-Agent` value emitted when the caller does not
    /// supply one. Defaults to the library identifier.
    pub fn set_user_agent(&mut self, agent: &str) {
        self.user_agent = Some(agent.to_string());
    }

    /// Gets the current lifecycle position.
    pub fn state(&self) -> MessageState {
        self.state
    }

    /// Returns `true` after a CONNECT request was answered with 2xx: the
    /// connection now passes opaque bytes and the core steps aside.
    pub fn is_tunnel(&self) -> bool {
        self.tunnel
    }

    /// Emits the request line and header block, then opens the body.
    ///
    /// Standard headers the caller did not supply are defaulted; the
    /// framing header is derived from `opts.framing` and `opts.coding`
    /// and may not be supplied by the caller.
    pub fn send(&mut self, opts: &RequestOptions) -> Result<(), HttpClientError> {
        if self.state != MessageState::Idle {
            return err_from_msg!(Request, "message already started");
        }
        if opts.headers.contains("transfer-encoding") || opts.headers.contains("content-length") {
            return err_from_msg!(
                UnsupportedTransferEncoding,
                "framing headers are chosen by the core"
            );
        }
        if opts.framing != Framing::None && !opts.method.permits_request_body() {
            return err_from_msg!(
                UnsupportedTransferEncoding,
                "method does not permit a request body"
            );
        }
        let encoder = match opts.coding {
            ContentCoding::Identity => None,
            coding => {
                if opts.framing != Framing::Chunked {
                    return err_from_msg!(
                        UnsupportedTransferEncoding,
                        "request codings require chunked framing"
                    );
                }
                match self.registry.encoder(coding) {
                    Some(encoder) => Some(encoder),
                    None => {
                        return err_from_msg!(
                            UnsupportedTransferEncoding,
                            "no encoder installed for the request coding"
                        )
                    }
                }
            }
        };

        self.state = MessageState::RequestHead;
        if connection_close(&opts.headers) {
            self.conn.set_keep_alive(false);
        }
        let part = RequestPart {
            method: opts.method.clone(),
            target: request_target(opts),
            version: Version::HTTP1_1,
            headers: build_headers(opts, self.user_agent.as_deref().unwrap_or(USER_AGENT))?,
        };
        let mut head = RequestEncoder::new(part);
        let mut buf = [0u8; 1024];
        loop {
            let size = head
                .encode(&mut buf)
                .map_err(HttpClientError::from_parse_error)?;
            self.conn
                .channel()
                .write_all(&buf[..size])
                .map_err(|e| HttpClientError::from_io_error(ErrorKind::Request, e))?;
            if size < buf.len() {
                break;
            }
        }
        self.conn
            .channel()
            .flush()
            .map_err(|e| HttpClientError::from_io_error(ErrorKind::Request, e))?;

        self.method = opts.method.clone();
        self.writer = match opts.framing {
            Framing::None => BodyWriter::Forbidden,
            Framing::Fixed(n) => BodyWriter::Fixed { remaining: n },
            Framing::Chunked => BodyWriter::Chunked,
        };
        self.encoder = encoder;
        self.state = MessageState::RequestBody;
        Ok(())
    }

    /// Writes request body bytes through the installed coding and the
    /// chosen framing. Returns the number of caller bytes accepted.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize, HttpClientError> {
        if self.state != MessageState::RequestBody {
            return err_from_msg!(Request, "request body is not writable in this state");
        }
        match &mut self.encoder {
            None => self.writer.write(self.conn.channel(), bytes),
            Some(encoder) => {
                self.scratch.clear();
                let accepted = encoder.encode(bytes, &mut self.scratch)?;
                if !self.scratch.is_empty() {
                    write_chunk(self.conn.channel(), &self.scratch)?;
                }
                Ok(accepted)
            }
        }
    }

    /// Completes the request body: flushes the coding, emits the final
    /// chunk for chunked framing, verifies counted framing, flushes.
    pub fn finish(&mut self) -> Result<(), HttpClientError> {
        if self.state != MessageState::RequestBody {
            return err_from_msg!(Request, "request cannot finish in this state");
        }
        if let Some(encoder) = &mut self.encoder {
            self.scratch.clear();
            encoder.finish(&mut self.scratch)?;
            if !self.scratch.is_empty() {
                write_chunk(self.conn.channel(), &self.scratch)?;
            }
        }
        self.writer.finish(self.conn.channel())?;
        self.conn
            .channel()
            .flush()
            .map_err(|e| HttpClientError::from_io_error(ErrorKind::Request, e))?;
        self.state = MessageState::RequestDone;
        Ok(())
    }

    /// Ingests the response head and derives the response body framing.
    pub fn wait(&mut self) -> Result<ResponsePart, HttpClientError> {
        if self.state != MessageState::RequestDone {
            return err_from_msg!(Request, "no request is awaiting a response");
        }
        self.state = MessageState::ResponseHead;
        let mut decoder = ResponseDecoder::with_limit(self.header_limit);
        let part = loop {
            let filled = self
                .conn
                .channel()
                .fill()
                .map_err(|e| HttpClientError::from_io_error(ErrorKind::Request, e))?;
            if filled == 0 {
                self.conn.set_keep_alive(false);
                return err_from_msg!(UnexpectedEof, "transport ended before the response head");
            }
            let step = {
                let window = self.conn.channel().peek();
                let len = window.len();
                decoder.decode(window).map(|result| match result {
                    Some((part, rest)) => (Some(part), len - rest.len()),
                    None => (None, len),
                })
            };
            let (part, consumed) = match step {
                Ok(step) => step,
                Err(e) => {
                    self.conn.set_keep_alive(false);
                    return Err(HttpClientError::from_parse_error(e));
                }
            };
            self.conn.channel().consume(consumed);
            if let Some(part) = part {
                break part;
            }
        };
        self.apply_response_framing(&part)?;
        self.state = MessageState::ResponseBody;
        Ok(part)
    }

    /// Reads response body bytes through the framing layer and the
    /// installed decoder. Returns 0 only at the legitimate end of the
    /// body.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize, HttpClientError> {
        if self.state != MessageState::ResponseBody {
            return err_from_msg!(Request, "response body is not readable in this state");
        }
        let result = match self.decoder.take() {
            None => self.reader.read(self.conn.channel(), dest),
            Some(mut decoder) => {
                let result = self.read_through(&mut *decoder, dest);
                self.decoder = Some(decoder);
                result
            }
        };
        if result.is_err() {
            self.conn.set_keep_alive(false);
        }
        result
    }

    /// Trailer headers observed after a chunked body, if any.
    pub fn trailers(&self) -> Option<&Headers> {
        self.reader.trailers()
    }

    /// Takes ownership of the trailer headers, if any.
    pub fn take_trailers(&mut self) -> Option<Headers> {
        self.reader.take_trailers()
    }

    /// Ends the transaction, releasing the borrowed connection. Whether
    /// the transport is parked or closed is the pool's decision at
    /// release time.
    pub fn close(self) {}

    // Routes framed bytes through the content decoder.
    fn read_through(
        &mut self,
        decoder: &mut dyn Decode,
        dest: &mut [u8],
    ) -> Result<usize, HttpClientError> {
        loop {
            if self.raw_pos == self.raw_len {
                let mut raw = std::mem::take(&mut self.raw);
                let filled = self.reader.read(self.conn.channel(), &mut raw);
                self.raw = raw;
                let filled = filled?;
                self.raw_pos = 0;
                self.raw_len = filled;
                if filled == 0 {
                    return Ok(0);
                }
            }
            let (consumed, produced) = decoder.decode(&self.raw[self.raw_pos..self.raw_len], dest)?;
            self.raw_pos += consumed;
            if produced > 0 {
                return Ok(produced);
            }
            if consumed == 0 {
                return err_from_msg!(DecompressionFailed, "content decoder made no progress");
            }
        }
    }

    // Derives reader and decoder from the response head, honoring the
    // HEAD / 1xx / 204 / 304 rules, CONNECT tunneling, framing priority
    // and the connection disposition.
    fn apply_response_framing(&mut self, part: &ResponsePart) -> Result<(), HttpClientError> {
        let headers = &part.headers;

        if self.method == Method::CONNECT && part.status.is_successful() {
            // Tunnel mode: the caller owns the raw byte stream now, so
            // the connection can never be parked for HTTP reuse.
            self.tunnel = true;
            self.reader = BodyReader::Empty;
            self.decoder = None;
            self.conn.set_keep_alive(false);
            return Ok(());
        }

        let mut coding = ContentCoding::Identity;
        let mut transfer_coded = false;
        let framing = if let Some(values) = headers.get_all("transfer-encoding") {
            let mut tokens: Vec<Vec<u8>> = Vec::new();
            for value in values {
                for token in value.as_bytes().split(|&b| b == b',') {
                    let token = trim_token(token);
                    if !token.is_empty() {
                        tokens.push(token.to_vec());
                    }
                }
            }
            let chunked_last = tokens
                .last()
                .map(|t| t.eq_ignore_ascii_case(b"chunked"))
                .unwrap_or(false);
            if !chunked_last {
                self.conn.set_keep_alive(false);
                return err_from_msg!(
                    UnsupportedTransferEncoding,
                    "chunked must be the final transfer coding"
                );
            }
            tokens.pop();
            if tokens.len() > 1 {
                self.conn.set_keep_alive(false);
                return err_from_msg!(
                    UnsupportedTransferEncoding,
                    "at most one transfer coding besides chunked"
                );
            }
            if let Some(token) = tokens.pop() {
                match ContentCoding::from_bytes(&token) {
                    Some(ContentCoding::Identity) => {}
                    Some(c) => {
                        coding = c;
                        transfer_coded = true;
                    }
                    None => {
                        self.conn.set_keep_alive(false);
                        return err_from_msg!(
                            UnsupportedTransferEncoding,
                            "unrecognized transfer coding"
                        );
                    }
                }
            }
            Framing::Chunked
        } else if let Some(value) = headers.get("content-length") {
            let n = parse_content_length(value.as_bytes()).ok_or_else(|| {
                self.conn.set_keep_alive(false);
                HttpClientError::from_str(ErrorKind::HeadersInvalid, "invalid content-length")
            })?;
            Framing::Fixed(n)
        } else {
            Framing::None
        };

        if let Some(value) = headers.get("content-encoding") {
            match ContentCoding::from_bytes(trim_token(value.as_bytes())) {
                Some(ContentCoding::Identity) => {}
                Some(c) => {
                    if transfer_coded {
                        return err_from_msg!(
                            UnsupportedTransferEncoding,
                            "only one content coding may be active"
                        );
                    }
                    coding = c;
                }
                None => {
                    return err_from_msg!(DecompressionFailed, "unrecognized content coding");
                }
            }
        }

        if self.method == Method::HEAD || part.status.forbids_body() {
            // These responses never carry a body, whatever the headers
            // promised.
            self.reader = BodyReader::Empty;
            self.decoder = None;
        } else {
            self.reader = match framing {
                Framing::Chunked => BodyReader::chunked(self.header_limit),
                Framing::Fixed(n) => BodyReader::Fixed { remaining: n },
                Framing::None => {
                    // Delimited by connection close.
                    self.conn.set_keep_alive(false);
                    BodyReader::UntilClose
                }
            };
            self.decoder = match coding {
                ContentCoding::Identity => None,
                c => match self.registry.decoder(c) {
                    Some(decoder) => {
                        self.raw = vec![0; 4096];
                        self.raw_pos = 0;
                        self.raw_len = 0;
                        Some(decoder)
                    }
                    None => {
                        return err_from_msg!(
                            DecompressionFailed,
                            "no decoder installed for the content coding"
                        )
                    }
                },
            };
        }

        if connection_close(headers) {
            self.conn.set_keep_alive(false);
        }
        Ok(())
    }
}

fn trim_token(mut token: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = token {
        token = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = token {
        token = rest;
    }
    token
}

fn parse_content_length(bytes: &[u8]) -> Option<u64> {
    let bytes = trim_token(bytes);
    if bytes.is_empty() || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut n: u64 = 0;
    for b in bytes {
        n = n
            .checked_mul(10)?
            .checked_add(u64::from(b - b'0'))?;
    }
    // 2^64 - 1 is reserved; the framing domain is [0, 2^64 - 2].
    if n == u64::MAX {
        return None;
    }
    Some(n)
}

// Whether a `Connection` header lists the `close` option.
fn connection_close(headers: &Headers) -> bool {
    match headers.get_all("connection") {
        Some(values) => values.iter().any(|value| {
            value
                .as_bytes()
                .split(|&b| b == b',')
                .any(|token| trim_token(token).eq_ignore_ascii_case(b"close"))
        }),
        None => false,
    }
}

fn request_target(opts: &RequestOptions) -> String {
    if opts.method == Method::CONNECT {
        return format!("{}:{}", opts.host, opts.port);
    }
    let path = if opts.path.is_empty() {
        "/"
    } else {
        opts.path.as_str()
    };
    if opts.via_proxy {
        let scheme = if opts.tls { "https" } else { "http" };
        format!("{}://{}:{}{}", scheme, opts.host, opts.port, path)
    } else {
        path.to_string()
    }
}

// Assembles the emitted header block: defaults the caller did not
// supply, then the framing header, then the caller's headers in their
// insertion order.
fn build_headers(opts: &RequestOptions, user_agent: &str) -> Result<Headers, HttpClientError> {
    let mut headers = Headers::new();
    let supplied = &opts.headers;

    if !supplied.contains("host") {
        let default_port = if opts.tls { 443 } else { 80 };
        let host = if opts.port == default_port {
            opts.host.clone()
        } else {
            format!("{}:{}", opts.host, opts.port)
        };
        append(&mut headers, "host", &host)?;
    }
    if !supplied.contains("user-agent") {
        append(&mut headers, "user-agent", user_agent)?;
    }
    if !supplied.contains("connection") {
        append(&mut headers, "connection", "keep-alive")?;
    }
    if !supplied.contains("accept") {
        append(&mut headers, "accept", "*/*")?;
    }
    if !supplied.contains("accept-encoding") {
        append(&mut headers, "accept-encoding", "gzip, deflate, zstd")?;
    }
    if !supplied.contains("te") {
        append(&mut headers, "te", "gzip, deflate")?;
    }

    match (opts.framing, opts.coding) {
        (Framing::Chunked, ContentCoding::Identity) => {
            append(&mut headers, "transfer-encoding", "chunked")?;
        }
        (Framing::Chunked, coding) => {
            let value = format!("{}, chunked", coding.as_str());
            append(&mut headers, "transfer-encoding", &value)?;
        }
        (Framing::Fixed(n), _) => {
            append(&mut headers, "content-length", &n.to_string())?;
        }
        (Framing::None, _) => {}
    }

    for header in supplied.iter() {
        headers.push(header.clone());
    }
    Ok(headers)
}

fn append(headers: &mut Headers, name: &str, value: &str) -> Result<(), HttpClientError> {
    headers
        .append(name, value)
        .map_err(|e| HttpClientError::from_error(ErrorKind::Request, e))
}
