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

use std::io::{self, Cursor, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use finch_http_client::message::{Framing, Message, RequestOptions};
use finch_http_client::pool::PoolKey;
use finch_http_client::transport::Connection;
use finch_http_client::{Client, Connector, ErrorKind, Method};

// A transport whose read side replays scripted server bytes and whose
// write side records everything the client emits.
struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    written: Arc<Mutex<Vec<u8>>>,
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct ScriptedConnector {
    response: Vec<u8>,
    written: Arc<Mutex<Vec<u8>>>,
    connects: AtomicUsize,
}

impl ScriptedConnector {
    fn new(response: &[u8]) -> Self {
        Self {
            response: response.to_vec(),
            written: Arc::new(Mutex::new(Vec::new())),
            connects: AtomicUsize::new(0),
        }
    }
}

impl Connector for &ScriptedConnector {
    type Stream = ScriptedStream;
    type Error = io::Error;

    fn connect(&self, _key: &PoolKey) -> Result<Self::Stream, Self::Error> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedStream {
            input: Cursor::new(self.response.clone()),
            written: self.written.clone(),
        })
    }
}

fn scripted_connection(response: &[u8]) -> (Connection<ScriptedStream>, Arc<Mutex<Vec<u8>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let conn = Connection::new(ScriptedStream {
        input: Cursor::new(response.to_vec()),
        written: written.clone(),
    });
    (conn, written)
}

fn read_body<S: Read + Write>(message: &mut Message<'_, S>) -> Vec<u8> {
    let mut body = Vec::new();
    let mut buf = [0u8; 7];
    loop {
        let n = message.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    body
}

/// SDV test cases for a simple content-length response.
///
/// # Brief
/// 1. Runs a GET against a scripted `Content-Length: 4` response.
/// 2. Checks the emitted request head, the decoded response and that the
///    connection is parked for reuse.
#[test]
fn sdv_client_content_length_response() {
    let connector = ScriptedConnector::new(b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\ngood");
    let client = Client::builder().build_with_connector(&connector);

    let response = client
        .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
        .unwrap();
    assert_eq!(response.part.status.as_u16(), 200);
    assert_eq!(response.part.reason, "OK");
    assert_eq!(
        response
            .part
            .headers
            .get("content-length")
            .unwrap()
            .to_str()
            .unwrap(),
        "4"
    );
    assert_eq!(response.body, b"good");
    assert!(response.trailers.is_none());

    let written = connector.written.lock().unwrap().clone();
    let expected = format!(
        "GET / HTTP/1.1\r\n\
         host: example.com\r\n\
         user-agent: finch-http/{}\r\n\
         connection: keep-alive\r\n\
         accept: */*\r\n\
         accept-encoding: gzip, deflate, zstd\r\n\
         te: gzip, deflate\r\n\r\n",
        env!("CARGO_PKG_VERSION")
    );
    assert_eq!(written, expected.as_bytes());
}

/// SDV test cases for the configured `User-Agent` identifier.
///
/// # Brief
/// 1. Builds a client with an overridden `User-Agent` and runs a GET.
/// 2. Checks the override reaches the wire and a caller-supplied header
///    still takes precedence over it.
#[test]
fn sdv_client_user_agent_override() {
    let connector = ScriptedConnector::new(
        b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n\
          HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n",
    );
    let client = Client::builder()
        .user_agent("probe/2.0")
        .build_with_connector(&connector);

    client
        .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
        .unwrap();
    {
        let written = connector.written.lock().unwrap();
        let text = String::from_utf8(written.clone()).unwrap();
        assert!(text.contains("user-agent: probe/2.0\r\n"));
    }
    connector.written.lock().unwrap().clear();

    let mut opts = RequestOptions::new(Method::GET, "example.com", 80);
    opts.headers.append("User-Agent", "caller/1.0").unwrap();
    client.request(&opts, None).unwrap();
    let written = connector.written.lock().unwrap();
    let text = String::from_utf8(written.clone()).unwrap();
    assert!(text.contains("user-agent: caller/1.0\r\n"));
    assert!(!text.contains("probe/2.0"));
}

/// SDV test cases for connection reuse across transactions.
///
/// # Brief
/// 1. Scripts two responses on one stream and runs two requests.
/// 2. Checks the second transaction reuses the parked connection.
#[test]
fn sdv_client_keep_alive_reuse() {
    let connector = ScriptedConnector::new(
        b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\ngood\
          HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nagain",
    );
    let client = Client::builder().build_with_connector(&connector);
    let opts = RequestOptions::new(Method::GET, "example.com", 80);

    let first = client.request(&opts, None).unwrap();
    assert_eq!(first.body, b"good");
    let second = client.request(&opts, None).unwrap();
    assert_eq!(second.body, b"again");
    assert_eq!(connector.connects.load(Ordering::SeqCst), 1);
}

/// SDV test cases for a chunked response.
///
/// # Brief
/// 1. Runs a GET against a chunked response.
/// 2. Checks the body and clean termination.
#[test]
fn sdv_client_chunked_response() {
    let connector = ScriptedConnector::new(
        b"HTTP/1.1 200 Ok\r\nTransfer-Encoding: chunked\r\n\r\n4\r\ngood\r\n0\r\n\r\n",
    );
    let client = Client::builder().build_with_connector(&connector);

    let response = client
        .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
        .unwrap();
    assert_eq!(response.part.status.as_u16(), 200);
    assert_eq!(response.part.reason, "Ok");
    assert_eq!(response.body, b"good");
    assert!(response.trailers.is_none());
}

/// SDV test cases for a chunked response with trailers.
///
/// # Brief
/// 1. Runs a GET against a chunked response carrying a trailer section.
/// 2. Checks the body and the observed trailer header.
#[test]
fn sdv_client_chunked_trailer() {
    let connector = ScriptedConnector::new(
        b"HTTP/1.1 200 Ok\r\nTrailer: Expires\r\nTransfer-Encoding: chunked\r\n\r\n\
          4\r\ngood\r\n0\r\nExpires: now\r\n\r\n",
    );
    let client = Client::builder().build_with_connector(&connector);

    let response = client
        .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
        .unwrap();
    assert_eq!(response.body, b"good");
    let trailers = response.trailers.unwrap();
    assert_eq!(trailers.get("expires").unwrap().to_str().unwrap(), "now");
}

/// SDV test cases for an overflowing chunk size.
///
/// # Brief
/// 1. Runs a GET against a chunk-size line that overflows a `u64`.
/// 2. Checks the error kind and that the connection is not parked.
#[test]
fn sdv_client_chunk_size_overflow() {
    let connector = ScriptedConnector::new(
        b"HTTP/1.1 200 Ok\r\nTransfer-Encoding: chunked\r\n\r\n\
          ffffffffffffffffffffffffffffffffffffffff\r\n",
    );
    let client = Client::builder().build_with_connector(&connector);

    let err = client
        .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
        .unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::InvalidChunkedEncoding);

    // The poisoned connection must not be reused.
    let connector_after = ScriptedConnector::new(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    let client = Client::builder().build_with_connector(&connector_after);
    client
        .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
        .unwrap();
    assert_eq!(connector_after.connects.load(Ordering::SeqCst), 1);
}

/// SDV test cases for HEAD responses carrying a Content-Length.
///
/// # Brief
/// 1. Sends HEAD; the scripted response declares a 1024-byte body and
///    even carries stray bytes.
/// 2. Checks the body length is forced to zero.
#[test]
fn sdv_client_head_forces_empty_body() {
    let (mut conn, _written) = scripted_connection(b"HTTP/1.1 200 OK\r\nContent-Length: 1024\r\n\r\njunkjunk");
    let mut message = Message::new(&mut conn);
    let mut opts = RequestOptions::new(Method::HEAD, "example.com", 80);
    opts.path = String::from("/res");
    message.send(&opts).unwrap();
    message.finish().unwrap();

    let part = message.wait().unwrap();
    assert_eq!(part.status.as_u16(), 200);
    assert_eq!(
        part.headers.get("content-length").unwrap().to_str().unwrap(),
        "1024"
    );
    // Body reads terminate immediately.
    let mut buf = [0u8; 16];
    assert_eq!(message.read(&mut buf).unwrap(), 0);
    assert_eq!(message.read(&mut buf).unwrap(), 0);
    message.close();
    assert!(conn.is_keep_alive());
}

/// SDV test cases for `Connection: close` with close-delimited framing.
///
/// # Brief
/// 1. Runs a GET whose response has no length and `Connection: close`.
/// 2. Checks the body runs to end of stream and the connection is not
///    parked.
#[test]
fn sdv_client_connection_close() {
    let connector =
        ScriptedConnector::new(b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nuntil the very end");
    let client = Client::builder().build_with_connector(&connector);

    let response = client
        .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
        .unwrap();
    assert_eq!(response.body, b"until the very end");

    // A second request must open a fresh transport.
    let _ = client
        .request(&RequestOptions::new(Method::GET, "example.com", 80), None)
        .unwrap();
    assert_eq!(connector.connects.load(Ordering::SeqCst), 2);
}

/// SDV test cases for 204/304 responses.
///
/// # Brief
/// 1. Runs GETs against 204 and 304 responses that claim a length.
/// 2. Checks the observable body length is zero.
#[test]
fn sdv_client_status_forces_empty_body() {
    for head in [
        b"HTTP/1.1 204 No Content\r\nContent-Length: 10\r\n\r\n".as_slice(),
        b"HTTP/1.1 304 Not Modified\r\nContent-Length: 10\r\n\r\n".as_slice(),
    ] {
        let (mut conn, _written) = scripted_connection(head);
        let mut message = Message::new(&mut conn);
        message
            .send(&RequestOptions::new(Method::GET, "example.com", 80))
            .unwrap();
        message.finish().unwrap();
        let part = message.wait().unwrap();
        assert!(part.status.as_u16() == 204 || part.status.as_u16() == 304);
        assert!(read_body(&mut message).is_empty());
    }
}

/// SDV test cases for a fixed-length request body.
///
/// # Brief
/// 1. Sends a POST with a collected body.
/// 2. Checks the emitted Content-Length header and body bytes.
#[test]
fn sdv_client_fixed_request_body() {
    let connector = ScriptedConnector::new(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    let client = Client::builder().build_with_connector(&connector);

    let mut opts = RequestOptions::new(Method::POST, "example.com", 80);
    opts.path = String::from("/upload");
    client.request(&opts, Some(b"hello world")).unwrap();

    let written = connector.written.lock().unwrap().clone();
    let text = String::from_utf8(written).unwrap();
    assert!(text.starts_with("POST /upload HTTP/1.1\r\n"));
    assert!(text.contains("content-length: 11\r\n"));
    assert!(text.ends_with("\r\n\r\nhello world"));
}

/// SDV test cases for a chunked request body.
///
/// # Brief
/// 1. Streams a request body through chunked framing.
/// 2. Checks the framing header and the chunk framing on the wire.
#[test]
fn sdv_client_chunked_request_body() {
    let (mut conn, written) = scripted_connection(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    {
        let mut message = Message::new(&mut conn);
        let mut opts = RequestOptions::new(Method::PUT, "example.com", 80);
        opts.framing = Framing::Chunked;
        message.send(&opts).unwrap();
        assert_eq!(message.write(b"hello, ").unwrap(), 7);
        assert_eq!(message.write(b"world").unwrap(), 5);
        message.finish().unwrap();
        let part = message.wait().unwrap();
        assert_eq!(part.status.as_u16(), 200);
        message.close();
    }
    let text = String::from_utf8(written.lock().unwrap().clone()).unwrap();
    assert!(text.contains("transfer-encoding: chunked\r\n"));
    assert!(text.ends_with("\r\n\r\n7\r\nhello, \r\n5\r\nworld\r\n0\r\n\r\n"));
}

/// SDV test cases for writes against the state machine.
///
/// # Brief
/// 1. Violates the lifecycle: write without body framing, write after
///    finish, over-long fixed writes.
/// 2. Checks the error kinds.
#[test]
fn sdv_client_lifecycle_errors() {
    let (mut conn, _written) = scripted_connection(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    let mut message = Message::new(&mut conn);
    message
        .send(&RequestOptions::new(Method::GET, "example.com", 80))
        .unwrap();
    let err = message.write(b"x").unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::NotWritable);
    message.finish().unwrap();
    let err = message.write(b"x").unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::Request);

    let (mut conn, _written) = scripted_connection(b"");
    let mut message = Message::new(&mut conn);
    let mut opts = RequestOptions::new(Method::POST, "example.com", 80);
    opts.framing = Framing::Fixed(4);
    message.send(&opts).unwrap();
    let err = message.write(b"too long").unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::MessageTooLong);
    let err = message.finish().unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::MessageNotComplete);
}

/// SDV test cases for caller-supplied framing headers.
///
/// # Brief
/// 1. Supplies `Transfer-Encoding` and `Content-Length` by hand.
/// 2. Checks both are refused.
#[test]
fn sdv_client_caller_framing_headers_refused() {
    for (name, value) in [("Transfer-Encoding", "chunked"), ("Content-Length", "4")] {
        let (mut conn, _written) = scripted_connection(b"");
        let mut message = Message::new(&mut conn);
        let mut opts = RequestOptions::new(Method::GET, "example.com", 80);
        opts.headers.append(name, value).unwrap();
        let err = message.send(&opts).unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::UnsupportedTransferEncoding);
    }
}

/// SDV test cases for rejected transfer-coding lists.
///
/// # Brief
/// 1. Responds with `Transfer-Encoding: chunked, gzip`.
/// 2. Checks the rejection: chunked must be last.
#[test]
fn sdv_client_chunked_not_last() {
    let (mut conn, _written) =
        scripted_connection(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked, gzip\r\n\r\n");
    let mut message = Message::new(&mut conn);
    message
        .send(&RequestOptions::new(Method::GET, "example.com", 80))
        .unwrap();
    message.finish().unwrap();
    let err = message.wait().unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::UnsupportedTransferEncoding);
    assert!(!conn.is_keep_alive());
}

/// SDV test cases for CONNECT tunneling.
///
/// # Brief
/// 1. Sends CONNECT and receives 200.
/// 2. Checks tunnel mode: empty body, connection surrendered.
#[test]
fn sdv_client_connect_tunnel() {
    let (mut conn, _written) = scripted_connection(b"HTTP/1.1 200 Connection Established\r\n\r\n");
    let mut message = Message::new(&mut conn);
    message
        .send(&RequestOptions::new(Method::CONNECT, "example.com", 443))
        .unwrap();
    message.finish().unwrap();
    let part = message.wait().unwrap();
    assert_eq!(part.status.as_u16(), 200);
    assert!(message.is_tunnel());
    let mut buf = [0u8; 8];
    assert_eq!(message.read(&mut buf).unwrap(), 0);
    message.close();
    assert!(!conn.is_keep_alive());
}
