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

//! Buffered duplex byte channel over a caller-provided stream.
//!
//! [`Channel`] owns one fixed-size buffer per direction. The read buffer
//! exposes a `[start, end)` window that parsers can [`peek`] at and
//! [`consume`] from without copying; the write buffer coalesces small
//! writes until [`flush`] drains it into the stream.
//!
//! [`peek`]: Channel::peek
//! [`consume`]: Channel::consume
//! [`flush`]: Channel::flush

use std::io::{self, Read, Write};

const BUF_SIZE: usize = 16 * 1024;

/// A bidirectional buffered byte channel.
///
/// Every suspension point of the protocol core is a `fill`, `write` or
/// `flush` on this type; the channel itself never blocks except through
/// the underlying stream.
pub struct Channel<S> {
    io: S,
    read_buf: Vec<u8>,
    start: usize,
    end: usize,
    write_buf: Vec<u8>,
    wend: usize,
}

impl<S: Read + Write> Channel<S> {
    /// Creates a channel over `io` with 16 KiB buffers per direction.
    pub fn new(io: S) -> Self {
        Self {
            io,
            read_buf: vec![0; BUF_SIZE],
            start: 0,
            end: 0,
            write_buf: vec![0; BUF_SIZE],
            wend: 0,
        }
    }

    /// Makes the readable window non-empty, blocking on the stream if
    /// necessary. Returns the number of readable bytes; `Ok(0)` means the
    /// stream reached end of stream.
    pub fn fill(&mut self) -> io::Result<usize> {
        if self.start < self.end {
            return Ok(self.end - self.start);
        }
        self.start = 0;
        self.end = self.io.read(&mut self.read_buf)?;
        Ok(self.end)
    }

    /// Returns the current readable window. May be empty before the first
    /// [`fill`].
    ///
    /// [`fill`]: Channel::fill
    pub fn peek(&self) -> &[u8] {
        &self.read_buf[self.start..self.end]
    }

    /// Advances the readable window by `n` bytes.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(self.start + n <= self.end);
        self.start += n;
    }

    /// Buffered read. Drains the window first; large destinations bypass
    /// the buffer.
    pub fn read(&mut self, dest: &mut [u8]) -> io::Result<usize> {
        if dest.is_empty() {
            return Ok(0);
        }
        if self.start == self.end {
            if dest.len() >= self.read_buf.len() {
                return self.io.read(dest);
            }
            if self.fill()? == 0 {
                return Ok(0);
            }
        }
        let n = dest.len().min(self.end - self.start);
        dest[..n].copy_from_slice(&self.read_buf[self.start..self.start + n]);
        self.start += n;
        Ok(n)
    }

    /// Buffered write. Large inputs bypass the buffer.
    pub fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if bytes.len() >= self.write_buf.len() {
            self.drain_write_buf()?;
            return self.io.write(bytes);
        }
        if self.wend + bytes.len() > self.write_buf.len() {
            self.drain_write_buf()?;
        }
        self.write_buf[self.wend..self.wend + bytes.len()].copy_from_slice(bytes);
        self.wend += bytes.len();
        Ok(bytes.len())
    }

    /// Writes all of `bytes` through the buffer.
    pub fn write_all(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            let n = self.write(bytes)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "stream accepted no bytes",
                ));
            }
            bytes = &bytes[n..];
        }
        Ok(())
    }

    /// Drains the write buffer, then flushes the underlying stream.
    pub fn flush(&mut self) -> io::Result<()> {
        self.drain_write_buf()?;
        self.io.flush()
    }

    fn drain_write_buf(&mut self) -> io::Result<()> {
        let mut at = 0;
        while at < self.wend {
            let n = self.io.write(&self.write_buf[at..self.wend])?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "stream accepted no bytes",
                ));
            }
            at += n;
        }
        self.wend = 0;
        Ok(())
    }
}

/// A pooled transport: the channel plus the connection disposition.
///
/// `keep_alive` starts `true` and is revoked when either side sends
/// `Connection: close`, when response framing is end-of-stream delimited,
/// or when a protocol error poisons the stream. Dropping the connection
/// closes the underlying transport.
pub struct Connection<S> {
    channel: Channel<S>,
    keep_alive: bool,
}

impl<S: Read + Write> Connection<S> {
    /// Creates a keep-alive connection over `io`.
    pub fn new(io: S) -> Self {
        Self {
            channel: Channel::new(io),
            keep_alive: true,
        }
    }

    /// Returns whether the connection may be parked for reuse.
    pub fn is_keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// Sets the connection disposition.
    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        self.keep_alive = keep_alive;
    }

    pub(crate) fn channel(&mut self) -> &mut Channel<S> {
        &mut self.channel
    }
}
