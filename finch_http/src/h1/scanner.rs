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

//! End-of-headers detection.
//!
//! [`HeadersEndScanner`] finds the blank line that terminates a header
//! block (`CRLF CRLF`, with `LF LF` tolerated for noncompliant servers)
//! across any number of input segments, without requiring the block to be
//! resident in one buffer.

use crate::util::scan;

// The automaton tracks how much of the terminator has been seen. A bare
// CR never terminates a line; a bare LF does.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    // Inside a line.
    Ground,
    // CR seen inside a line.
    SeenCr,
    // A CRLF line ending was just crossed.
    SeenCrLf,
    // CRLF then CR: one LF away from the terminator.
    SeenCrLfCr,
    // A bare-LF line ending was just crossed.
    SeenLf,
    // Terminator consumed.
    Finished,
}

/// Incremental scanner that detects the end-of-headers sentinel.
///
/// Drive it chunk by chunk with [`feed`]; it never backtracks, never
/// rejects and never allocates. Callers that want a header size cap
/// count the consumed bytes themselves.
///
/// [`feed`]: HeadersEndScanner::feed
///
/// # Examples
///
/// ```
/// use finch_http::h1::HeadersEndScanner;
///
/// let mut scanner = HeadersEndScanner::new();
/// assert_eq!(scanner.feed(b"HTTP/1.1 200 OK\r\nAge: 1\r\n"), 25);
/// assert!(!scanner.is_finished());
/// // The terminator is included in the consumed count, the body is not.
/// assert_eq!(scanner.feed(b"\r\nbody"), 2);
/// assert!(scanner.is_finished());
/// ```
pub struct HeadersEndScanner {
    state: State,
}

impl HeadersEndScanner {
    /// Creates a new `HeadersEndScanner` positioned inside the first line.
    pub fn new() -> Self {
        Self {
            state: State::Ground,
        }
    }

    /// Creates a scanner positioned as if a line terminator was just
    /// crossed.
    ///
    /// This is the entry point for trailer sections: after the
    /// zero-length chunk's own line ending, an immediately following
    /// `CRLF` (empty trailer block) already terminates the section.
    pub fn at_line_boundary() -> Self {
        Self {
            state: State::SeenCrLf,
        }
    }

    /// Consumes bytes from `chunk` up to and including the terminator.
    ///
    /// The return value is the number of bytes that belong to the header
    /// block, terminator included. Once [`is_finished`] reports `true`,
    /// further calls consume nothing.
    ///
    /// [`is_finished`]: HeadersEndScanner::is_finished
    pub fn feed(&mut self, chunk: &[u8]) -> usize {
        let mut idx = 0;
        while idx < chunk.len() && self.state != State::Finished {
            if self.state == State::Ground {
                // Hot path: skip the line interior a word at a time.
                match scan::first_cr_or_lf(&chunk[idx..]) {
                    None => return chunk.len(),
                    Some(off) => {
                        idx += off;
                        self.state = if chunk[idx] == b'\r' {
                            State::SeenCr
                        } else {
                            State::SeenLf
                        };
                        idx += 1;
                        continue;
                    }
                }
            }
            self.state = match (self.state, chunk[idx]) {
                (State::SeenCr, b'\n') => State::SeenCrLf,
                (State::SeenCr, b'\r') => State::SeenCr,
                (State::SeenCr, _) => State::Ground,
                (State::SeenCrLf | State::SeenLf, b'\r') => State::SeenCrLfCr,
                (State::SeenCrLf | State::SeenLf, b'\n') => State::Finished,
                (State::SeenCrLf | State::SeenLf, _) => State::Ground,
                (State::SeenCrLfCr, b'\n') => State::Finished,
                (State::SeenCrLfCr, b'\r') => State::SeenCr,
                (State::SeenCrLfCr, _) => State::Ground,
                // Ground and Finished are handled above.
                (state, _) => state,
            };
            idx += 1;
        }
        idx
    }

    /// Returns `true` once the terminator has been consumed.
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }
}

impl Default for HeadersEndScanner {
    fn default() -> Self {
        Self::new()
    }
}
