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

//! HTTP [`Header`][header], which is called `Field` in [`RFC9110`].
//!
//! The module provides [`Header`], [`HeaderName`], [`HeaderValue`] and
//! [`Headers`], an insertion-ordered, case-insensitive multimap of fields.
//! Duplicate names are kept as separate entries in arrival order, the way
//! they appear on the wire.
//!
//! [header]: https://httpwg.org/specs/rfc9110.html#fields
//! [`RFC9110`]: https://httpwg.org/specs/rfc9110.html
//!
//! # Examples
//!
//! ```
//! use finch_http::headers::Headers;
//!
//! let mut headers = Headers::new();
//! headers.append("Accept", "text/html").unwrap();
//! headers.append("Set-Cookie", "a=1").unwrap();
//! headers.append("Set-Cookie", "b=2").unwrap();
//!
//! assert_eq!(headers.get("accept").unwrap().to_str().unwrap(), "text/html");
//! assert_eq!(headers.get_all("SET-COOKIE").unwrap().len(), 2);
//! ```

use core::convert::TryFrom;
use core::fmt;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;

use crate::error::{ErrorKind, HttpError};

/// HTTP `Header`, which consists of [`HeaderName`] and [`HeaderValue`].
///
/// `Header` is called `Field` in RFC9110.
///
/// # Examples
///
/// ```
/// use core::convert::TryFrom;
///
/// use finch_http::headers::Header;
///
/// // This header name string will be normalized to lowercase.
/// let header = Header::try_from(("Example-Field", "Foo")).unwrap();
/// assert_eq!(header.name().as_bytes(), b"example-field");
/// assert_eq!(header.value().to_str().unwrap(), "Foo");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    name: HeaderName,
    value: HeaderValue,
}

impl Header {
    /// Combines a `HeaderName` and a `HeaderValue` into a `Header`.
    pub fn from_raw_parts(name: HeaderName, value: HeaderValue) -> Self {
        Self { name, value }
    }

    /// Gets a reference to the underlying `HeaderName`.
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Gets a reference to the underlying `HeaderValue`.
    pub fn value(&self) -> &HeaderValue {
        &self.value
    }

    /// Consumes this `Header`, gets the underlying `HeaderName` and
    /// `HeaderValue`.
    pub fn into_parts(self) -> (HeaderName, HeaderValue) {
        (self.name, self.value)
    }
}

impl<N, V> TryFrom<(N, V)> for Header
where
    HeaderName: TryFrom<N>,
    <HeaderName as TryFrom<N>>::Error: Into<HttpError>,
    HeaderValue: TryFrom<V>,
    <HeaderValue as TryFrom<V>>::Error: Into<HttpError>,
{
    type Error = HttpError;

    fn try_from(pair: (N, V)) -> Result<Self, Self::Error> {
        Ok(Self::from_raw_parts(
            HeaderName::try_from(pair.0).map_err(Into::into)?,
            HeaderValue::try_from(pair.1).map_err(Into::into)?,
        ))
    }
}

/// HTTP `Header Name`, which is called `Field Name` in RFC9110.
///
/// Since field names are case-insensitive, the canonical storage form is
/// lowercase.
///
/// # Examples
///
/// ```
/// use finch_http::headers::HeaderName;
///
/// let name = HeaderName::from_bytes(b"Example-Field").unwrap();
/// assert_eq!(name.as_bytes(), b"example-field");
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HeaderName {
    name: String,
}

impl HeaderName {
    /// Converts a slice of bytes to a `HeaderName`.
    ///
    /// The input must consist of bytes from the RFC7230 token alphabet;
    /// uppercase letters are converted to lowercase.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        if bytes.is_empty() {
            return Err(ErrorKind::InvalidInput.into());
        }
        Ok(Self {
            name: Self::normalize(bytes)?,
        })
    }

    /// Returns a bytes representation of the `HeaderName`.
    pub fn as_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }

    /// Returns a string representation of the `HeaderName`.
    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    fn normalize(input: &[u8]) -> Result<String, HttpError> {
        let mut dst = Vec::with_capacity(input.len());
        for b in input.iter() {
            // HEADER_CHARS maps all bytes to valid single-byte UTF-8.
            let b = HEADER_CHARS[*b as usize];
            if b == 0 {
                return Err(ErrorKind::InvalidInput.into());
            }
            dst.push(b);
        }
        // Every mapped byte is ASCII.
        Ok(unsafe { String::from_utf8_unchecked(dst) })
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TryFrom<&str> for HeaderName {
    type Error = HttpError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::from_bytes(name.as_bytes())
    }
}

impl TryFrom<&[u8]> for HeaderName {
    type Error = HttpError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

/// HTTP `Header Value`, which is called `Field Value` in RFC9110.
///
/// A value is an opaque byte sequence; control bytes other than HTAB are
/// rejected. Unlike names, values are case-sensitive and kept verbatim.
///
/// # Examples
///
/// ```
/// use finch_http::headers::HeaderValue;
///
/// let value = HeaderValue::from_bytes(b"text/html").unwrap();
/// assert_eq!(value.to_str().unwrap(), "text/html");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderValue {
    value: Vec<u8>,
}

impl HeaderValue {
    /// Attempts to convert a byte slice to a `HeaderValue`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        if !bytes.iter().all(|b| Self::is_valid(*b)) {
            return Err(ErrorKind::InvalidInput.into());
        }
        Ok(HeaderValue {
            value: bytes.to_vec(),
        })
    }

    /// Returns a bytes representation of the `HeaderValue`.
    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_slice()
    }

    /// Returns a `&str` representation if the value is valid UTF-8.
    ///
    /// Values may legally carry `obs-text` (`%x80-FF`) bytes, in which
    /// case `None` is returned.
    pub fn to_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.value).ok()
    }

    /// Returns `true` if the value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    // field-vchar = VCHAR / obs-text, plus SP and HTAB inside a value.
    fn is_valid(b: u8) -> bool {
        crate::util::header_bytes::HEADER_VALUE_BYTES[b as usize]
    }
}

impl TryFrom<&str> for HeaderValue {
    type Error = HttpError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_bytes(value.as_bytes())
    }
}

impl TryFrom<&[u8]> for HeaderValue {
    type Error = HttpError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(value)
    }
}

// Index slot of a name. `Single` is promoted to `Multi` on the second
// occurrence of the same name.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Slot {
    Single(usize),
    Multi(Vec<usize>),
}

/// HTTP `Headers`, which is called `Fields` in RFC9110.
///
/// `Headers` preserves insertion order and keeps duplicate names as
/// separate entries. Lookups by name are case-insensitive and go through
/// an index, so `get`/`contains` cost a single hash.
///
/// # Examples
///
/// ```
/// use finch_http::headers::Headers;
///
/// let mut headers = Headers::new();
/// headers.append("Accept", "text/html").unwrap();
/// headers.append("Content-Length", "3495").unwrap();
///
/// assert_eq!(headers.get("accept").unwrap().to_str().unwrap(), "text/html");
/// assert!(headers.contains("content-length"));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Headers {
    entries: Vec<Header>,
    index: HashMap<String, Slot>,
}

impl Headers {
    /// Creates a new, empty `Headers`.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::headers::Headers;
    ///
    /// let headers = Headers::new();
    /// assert!(headers.is_empty());
    /// ```
    pub fn new() -> Self {
        Headers {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns the number of entries in the `Headers`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the `Headers` contains no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a `Header` to the `Headers`.
    ///
    /// Entries are kept in insertion order; appending a name that is
    /// already present adds a second entry rather than joining values.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::headers::Headers;
    ///
    /// let mut headers = Headers::new();
    /// assert!(headers.append("\0", "illegal header").is_err());
    ///
    /// headers.append("accept", "text/html").unwrap();
    /// headers.append("accept", "text/plain").unwrap();
    /// assert_eq!(headers.len(), 2);
    /// ```
    pub fn append<N, V>(&mut self, name: N, value: V) -> Result<(), HttpError>
    where
        HeaderName: TryFrom<N>,
        <HeaderName as TryFrom<N>>::Error: Into<HttpError>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<HttpError>,
    {
        let name = HeaderName::try_from(name).map_err(Into::into)?;
        let value = HeaderValue::try_from(value).map_err(Into::into)?;
        self.push(Header { name, value });
        Ok(())
    }

    /// Appends an already validated `Header`.
    pub fn push(&mut self, header: Header) {
        let pos = self.entries.len();
        match self.index.entry(header.name.name.clone()) {
            Entry::Occupied(mut o) => match o.get_mut() {
                Slot::Single(first) => {
                    let first = *first;
                    *o.get_mut() = Slot::Multi(vec![first, pos]);
                }
                Slot::Multi(list) => list.push(pos),
            },
            Entry::Vacant(v) => {
                let _ = v.insert(Slot::Single(pos));
            }
        }
        self.entries.push(header);
    }

    /// Returns `true` if an entry with the given name is present.
    ///
    /// The lookup is case-insensitive.
    pub fn contains<T>(&self, name: T) -> bool
    where
        HeaderName: TryFrom<T>,
    {
        HeaderName::try_from(name)
            .ok()
            .map(|name| self.index.contains_key(&name.name))
            .unwrap_or(false)
    }

    /// Returns the earliest appended value for the given name.
    ///
    /// This method returns `None` if the input argument could not be
    /// successfully converted to a `HeaderName` or the name is not
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::headers::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.append("accept", "text/html").unwrap();
    /// headers.append("accept", "text/plain").unwrap();
    ///
    /// assert_eq!(headers.get("ACCEPT").unwrap().to_str().unwrap(), "text/html");
    /// ```
    pub fn get<T>(&self, name: T) -> Option<&HeaderValue>
    where
        HeaderName: TryFrom<T>,
    {
        let name = HeaderName::try_from(name).ok()?;
        match self.index.get(&name.name)? {
            Slot::Single(pos) => Some(&self.entries[*pos].value),
            Slot::Multi(list) => Some(&self.entries[list[0]].value),
        }
    }

    /// Returns every value for the given name, in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::headers::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.append("set-cookie", "a=1").unwrap();
    /// headers.append("set-cookie", "b=2").unwrap();
    ///
    /// let values = headers.get_all("set-cookie").unwrap();
    /// assert_eq!(values[0].to_str().unwrap(), "a=1");
    /// assert_eq!(values[1].to_str().unwrap(), "b=2");
    /// ```
    pub fn get_all<T>(&self, name: T) -> Option<Vec<&HeaderValue>>
    where
        HeaderName: TryFrom<T>,
    {
        let name = HeaderName::try_from(name).ok()?;
        match self.index.get(&name.name)? {
            Slot::Single(pos) => Some(vec![&self.entries[*pos].value]),
            Slot::Multi(list) => {
                Some(list.iter().map(|pos| &self.entries[*pos].value).collect())
            }
        }
    }

    /// Removes every entry with the given name, returning `true` if any
    /// entry was removed. The relative order of the remaining entries is
    /// preserved and the index is rebuilt.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::headers::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.append("accept", "text/html").unwrap();
    /// headers.append("accept", "text/plain").unwrap();
    ///
    /// assert!(headers.remove("accept"));
    /// assert!(!headers.contains("accept"));
    /// assert!(!headers.remove("accept"));
    /// ```
    pub fn remove<T>(&mut self, name: T) -> bool
    where
        HeaderName: TryFrom<T>,
    {
        let name = match HeaderName::try_from(name) {
            Ok(name) => name,
            Err(_) => return false,
        };
        if self.index.remove(&name.name).is_none() {
            return false;
        }
        self.entries.retain(|entry| entry.name != name);
        self.rebuild_index();
        true
    }

    /// Reorders entries lexicographically by their lowercased name. The
    /// sort is stable, so entries sharing a name keep their relative
    /// order, and the index is rebuilt afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::headers::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.append("host", "example.com").unwrap();
    /// headers.append("accept", "*/*").unwrap();
    /// headers.sort_by_name();
    ///
    /// let first = headers.iter().next().unwrap();
    /// assert_eq!(first.name().as_bytes(), b"accept");
    /// ```
    pub fn sort_by_name(&mut self) {
        self.entries.sort_by(|a, b| a.name.name.cmp(&b.name.name));
        self.rebuild_index();
    }

    /// Returns an iterator over the entries in insertion order.
    pub fn iter(&self) -> HeadersIter<'_> {
        HeadersIter {
            iter: self.entries.iter(),
        }
    }

    /// Writes every entry to `dst` as `name: value\r\n`.
    ///
    /// No blank line is appended; terminating the block is the message
    /// layer's responsibility.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::headers::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.append("host", "example.com").unwrap();
    ///
    /// let mut buf = Vec::new();
    /// headers.write_to(&mut buf).unwrap();
    /// assert_eq!(buf, b"host: example.com\r\n");
    /// ```
    pub fn write_to<W: io::Write>(&self, dst: &mut W) -> io::Result<()> {
        for entry in self.entries.iter() {
            dst.write_all(entry.name.as_bytes())?;
            dst.write_all(b": ")?;
            dst.write_all(entry.value.as_bytes())?;
            dst.write_all(b"\r\n")?;
        }
        Ok(())
    }

    /// Writes every value of `name` to `dst` as a single comma-joined
    /// field line, for field names the RFC defines as lists.
    ///
    /// Nothing is written if the name is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use finch_http::headers::Headers;
    ///
    /// let mut headers = Headers::new();
    /// headers.append("accept-encoding", "gzip").unwrap();
    /// headers.append("accept-encoding", "deflate").unwrap();
    ///
    /// let mut buf = Vec::new();
    /// headers.write_comma_joined(&mut buf, "accept-encoding").unwrap();
    /// assert_eq!(buf, b"accept-encoding: gzip, deflate\r\n");
    /// ```
    pub fn write_comma_joined<W: io::Write, T>(&self, dst: &mut W, name: T) -> io::Result<()>
    where
        HeaderName: TryFrom<T>,
    {
        let name = match HeaderName::try_from(name) {
            Ok(name) => name,
            Err(_) => return Ok(()),
        };
        let values = match self.get_all::<&[u8]>(name.as_bytes()) {
            Some(values) => values,
            None => return Ok(()),
        };
        dst.write_all(name.as_bytes())?;
        dst.write_all(b": ")?;
        for (n, value) in values.iter().enumerate() {
            if n != 0 {
                dst.write_all(b", ")?;
            }
            dst.write_all(value.as_bytes())?;
        }
        dst.write_all(b"\r\n")
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (pos, entry) in self.entries.iter().enumerate() {
            match self.index.entry(entry.name.name.clone()) {
                Entry::Occupied(mut o) => match o.get_mut() {
                    Slot::Single(first) => {
                        let first = *first;
                        *o.get_mut() = Slot::Multi(vec![first, pos]);
                    }
                    Slot::Multi(list) => list.push(pos),
                },
                Entry::Vacant(v) => {
                    let _ = v.insert(Slot::Single(pos));
                }
            }
        }
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.iter() {
            writeln!(
                f,
                "{}: {}",
                entry.name(),
                entry.value().to_str().unwrap_or("<non-visible header value>")
            )?;
        }
        Ok(())
    }
}

/// Immutable `Headers` iterator, created by [`Headers::iter`].
///
/// [`Headers::iter`]: Headers::iter
pub struct HeadersIter<'a> {
    iter: core::slice::Iter<'a, Header>,
}

impl<'a> Iterator for HeadersIter<'a> {
    type Item = &'a Header;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = HeadersIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Headers {
    type Item = Header;
    type IntoIter = std::vec::IntoIter<Header>;

    /// Creates a consuming iterator over the entries in insertion order.
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// HEADER_CHARS is used to check whether a byte is a legal token byte and
// to transfer it to lowercase.
#[rustfmt::skip]
const HEADER_CHARS: [u8; 256] = [
//  0       1       2       3       4       5       6       7       8       9
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 0x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 1x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 2x
    0,      0,      0,      b'!',   0,      b'#',   b'$',   b'%',   b'&',   b'\'',  // 3x
    0,      0,      b'*',   b'+',   0,      b'-',   b'.',   0,      b'0',   b'1',   // 4x
    b'2',   b'3',   b'4',   b'5',   b'6',   b'7',   b'8',   b'9',   0,      0,      // 5x
    0,      0,      0,      0,      0,      b'a',   b'b',   b'c',   b'd',   b'e',   // 6x
    b'f',   b'g',   b'h',   b'i',   b'j',   b'k',   b'l',   b'm',   b'n',   b'o',   // 7x
    b'p',   b'q',   b'r',   b's',   b't',   b'u',   b'v',   b'w',   b'x',   b'y',   // 8x
    b'z',   0,      0,      0,      b'^',   b'_',   b'`',   b'a',   b'b',   b'c',   // 9x
    b'd',   b'e',   b'f',   b'g',   b'h',   b'i',   b'j',   b'k',   b'l',   b'm',   // 10x
    b'n',   b'o',   b'p',   b'q',   b'r',   b's',   b't',   b'u',   b'v',   b'w',   // 11x
    b'x',   b'y',   b'z',   0,      b'|',   0,      b'~',   0,      0,      0,      // 12x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 13x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 14x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 15x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 16x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 17x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 18x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 19x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 20x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 21x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 22x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 23x
    0,      0,      0,      0,      0,      0,      0,      0,      0,      0,      // 24x
    0,      0,      0,      0,      0,      0,                                      // 25x
];

#[cfg(test)]
mod ut_headers {
    use core::convert::TryFrom;

    use super::{Header, HeaderName, HeaderValue, Headers};

    /// UT test cases for `HeaderName::from_bytes`.
    ///
    /// # Brief
    /// 1. Creates a `HeaderName` by calling `HeaderName::from_bytes`.
    /// 2. Checks if the test results are correct.
    #[test]
    fn ut_header_name_from_bytes() {
        let name = HeaderName::from_bytes(b"ACCEPT").unwrap();
        assert_eq!(name.as_bytes(), b"accept");
        assert_eq!(name, HeaderName::from_bytes(b"accept").unwrap());
        assert!(HeaderName::from_bytes(b"").is_err());
        assert!(HeaderName::from_bytes(b"bad name").is_err());
        assert!(HeaderName::from_bytes(b"bad:name").is_err());
    }

    /// UT test cases for `HeaderValue::from_bytes`.
    ///
    /// # Brief
    /// 1. Creates a `HeaderValue` by calling `HeaderValue::from_bytes`.
    /// 2. Checks if the test results are correct.
    #[test]
    fn ut_header_value_from_bytes() {
        let value = HeaderValue::from_bytes(b"teXt/hTml").unwrap();
        assert_eq!(value.as_bytes(), b"teXt/hTml");
        assert_eq!(value.to_str().unwrap(), "teXt/hTml");
        assert!(HeaderValue::from_bytes(b"tab\tis fine").is_ok());
        assert!(HeaderValue::from_bytes(b"ctl\x01byte").is_err());
        assert!(HeaderValue::from_bytes(b"del\x7fbyte").is_err());
    }

    /// UT test cases for `Header::try_from`.
    ///
    /// # Brief
    /// 1. Creates a `Header` from a name and value pair.
    /// 2. Checks that the name is normalized and the value kept verbatim.
    #[test]
    fn ut_header_try_from() {
        let header = Header::try_from(("John-Doe", "Foo")).unwrap();
        assert_eq!(header.name().as_bytes(), b"john-doe");
        assert_eq!(header.value().to_str().unwrap(), "Foo");

        let (name, value) = header.into_parts();
        assert_eq!(name.as_bytes(), b"john-doe");
        assert_eq!(value.as_bytes(), b"Foo");
    }

    /// UT test cases for `Headers::append` ordering.
    ///
    /// # Brief
    /// 1. Appends a sequence of headers.
    /// 2. Checks that enumeration yields the same sequence in order and
    ///    that `get` returns the earliest value of a duplicated name.
    #[test]
    fn ut_headers_append_order() {
        let mut headers = Headers::new();
        headers.append("b-field", "1").unwrap();
        headers.append("A-Field", "2").unwrap();
        headers.append("b-field", "3").unwrap();

        let seen: Vec<(String, String)> = headers
            .iter()
            .map(|h| {
                (
                    h.name().as_str().to_string(),
                    h.value().to_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            seen,
            vec![
                ("b-field".to_string(), "1".to_string()),
                ("a-field".to_string(), "2".to_string()),
                ("b-field".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(headers.get("B-FIELD").unwrap().to_str().unwrap(), "1");
        let all = headers.get_all("b-field").unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].to_str().unwrap(), "3");
    }

    /// UT test cases for `Headers::remove`.
    ///
    /// # Brief
    /// 1. Appends headers with duplicate names.
    /// 2. Removes one name and checks that every entry with that name is
    ///    gone while the others keep their relative order.
    #[test]
    fn ut_headers_remove() {
        let mut headers = Headers::new();
        headers.append("accept", "text/html").unwrap();
        headers.append("host", "example.com").unwrap();
        headers.append("accept", "text/plain").unwrap();
        headers.append("te", "gzip").unwrap();

        assert!(headers.remove("ACCEPT"));
        assert!(!headers.contains("accept"));
        assert_eq!(headers.len(), 2);

        let names: Vec<&[u8]> = headers.iter().map(|h| h.name().as_bytes()).collect();
        assert_eq!(names, vec![b"host".as_ref(), b"te".as_ref()]);
        // Index is still consistent after the rebuild.
        assert_eq!(headers.get("te").unwrap().to_str().unwrap(), "gzip");
    }

    /// UT test cases for `Headers::sort_by_name`.
    ///
    /// # Brief
    /// 1. Appends headers out of order with a duplicated name.
    /// 2. Sorts and checks lexicographic order plus stability.
    #[test]
    fn ut_headers_sort_by_name() {
        let mut headers = Headers::new();
        headers.append("zebra", "1").unwrap();
        headers.append("accept", "first").unwrap();
        headers.append("host", "h").unwrap();
        headers.append("accept", "second").unwrap();

        headers.sort_by_name();

        let seen: Vec<(&str, &str)> = headers
            .iter()
            .map(|h| (h.name().as_str(), h.value().to_str().unwrap()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("accept", "first"),
                ("accept", "second"),
                ("host", "h"),
                ("zebra", "1"),
            ]
        );
        assert_eq!(headers.get("accept").unwrap().to_str().unwrap(), "first");
    }

    /// UT test cases for `Headers::write_to`.
    ///
    /// # Brief
    /// 1. Appends headers and serializes them.
    /// 2. Checks the emitted bytes, one `name: value` line per entry.
    #[test]
    fn ut_headers_write_to() {
        let mut headers = Headers::new();
        headers.append("Host", "example.com").unwrap();
        headers.append("Accept", "*/*").unwrap();

        let mut buf = Vec::new();
        headers.write_to(&mut buf).unwrap();
        assert_eq!(buf, b"host: example.com\r\naccept: */*\r\n");
    }

    /// UT test cases for `Headers::write_comma_joined`.
    ///
    /// # Brief
    /// 1. Appends duplicate entries of a list-typed field name.
    /// 2. Checks that a single comma-joined line is emitted.
    #[test]
    fn ut_headers_write_comma_joined() {
        let mut headers = Headers::new();
        headers.append("te", "gzip").unwrap();
        headers.append("te", "deflate").unwrap();

        let mut buf = Vec::new();
        headers.write_comma_joined(&mut buf, "te").unwrap();
        assert_eq!(buf, b"te: gzip, deflate\r\n");

        let mut buf = Vec::new();
        headers.write_comma_joined(&mut buf, "absent").unwrap();
        assert!(buf.is_empty());
    }
}
