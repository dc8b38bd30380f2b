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

//! Connection pool implementation.
//!
//! [`ConnPool`] parks reusable live transports keyed by
//! `(host, port, tls)`. A leased node moves to the used list for the
//! duration of one transaction and comes back through [`release`]; parked
//! nodes wait on the free list, bounded by `free_max` with oldest-first
//! eviction. Nodes are heap-allocated, so a node keeps its identity
//! across park/lease cycles.
//!
//! [`release`]: ConnPool::release

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::connector::Connector;
use crate::error::{ErrorKind, HttpClientError};
use crate::transport::Connection;

const DEFAULT_FREE_MAX: usize = 32;

/// Key of a pooled connection.
///
/// Hosts compare case-insensitively; the stored form is lowercase.
///
/// # Examples
///
/// ```
/// use finch_http_client::pool::PoolKey;
///
/// let a = PoolKey::new("Example.COM", 80, false);
/// let b = PoolKey::new("example.com", 80, false);
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PoolKey {
    host: String,
    port: u16,
    tls: bool,
}

impl PoolKey {
    /// Creates a key. The host is stored lowercased.
    pub fn new(host: &str, port: u16, tls: bool) -> Self {
        Self {
            host: host.to_ascii_lowercase(),
            port,
            tls,
        }
    }

    /// Gets the lowercased host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Gets the port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether the transport must be TLS-wrapped.
    pub fn is_tls(&self) -> bool {
        self.tls
    }
}

/// One pooled transport: its key and the live connection. The node owns
/// its host string through the key.
pub struct PoolNode<S> {
    id: u64,
    key: PoolKey,
    conn: Connection<S>,
}

impl<S> PoolNode<S> {
    /// Gets the key this node is parked under.
    pub fn key(&self) -> &PoolKey {
        &self.key
    }

    /// Gets the connection for the current transaction.
    pub fn conn_mut(&mut self) -> &mut Connection<S> {
        &mut self.conn
    }
}

struct Lists<S> {
    free: VecDeque<Box<PoolNode<S>>>,
    used: Vec<u64>,
    free_max: usize,
    next_id: u64,
    closed: bool,
}

/// Keyed store of reusable connections.
///
/// Every operation acquires the pool mutex for its entire duration. A
/// leased node is borrowed exclusively by the caller that obtained it and
/// must come back through [`release`].
///
/// [`release`]: ConnPool::release
pub struct ConnPool<C: Connector> {
    connector: C,
    lists: Mutex<Lists<C::Stream>>,
}

impl<C: Connector> ConnPool<C> {
    /// Creates a pool with the default free-list bound of 32.
    pub fn new(connector: C) -> Self {
        Self::with_free_max(connector, DEFAULT_FREE_MAX)
    }

    /// Creates a pool with a caller-chosen free-list bound.
    pub fn with_free_max(connector: C, free_max: usize) -> Self {
        Self {
            connector,
            lists: Mutex::new(Lists {
                free: VecDeque::new(),
                used: Vec::new(),
                free_max,
                next_id: 0,
                closed: false,
            }),
        }
    }

    /// Leases a connection for `key`.
    ///
    /// A parked node with a matching key (case-insensitive host, equal
    /// port, equal tls flag) is spliced to the used list and returned;
    /// otherwise a new transport is opened through the connector.
    pub fn connect(&self, key: &PoolKey) -> Result<Box<PoolNode<C::Stream>>, HttpClientError> {
        let mut lists = self.lists.lock().unwrap();
        if lists.closed {
            return err_from_msg!(Connect, "pool is shut down");
        }
        let at = lists.free.iter().position(|node| node.key == *key);
        // VecDeque::remove preserves the order of the survivors.
        if let Some(node) = at.and_then(|at| lists.free.remove(at)) {
            lists.used.push(node.id);
            return Ok(node);
        }
        let stream = self
            .connector
            .connect(key)
            .map_err(|e| HttpClientError::from_error(ErrorKind::Connect, e))?;
        let id = lists.next_id;
        lists.next_id += 1;
        lists.used.push(id);
        Ok(Box::new(PoolNode {
            id,
            key: key.clone(),
            conn: Connection::new(stream),
        }))
    }

    /// Returns a leased node.
    ///
    /// Connections that lost keep-alive, that come back after
    /// [`shutdown`], or that a zero `free_max` leaves no room for are
    /// dropped, which closes the transport. Otherwise the oldest parked
    /// nodes are evicted until the free list has room, and the node is
    /// parked at the tail.
    ///
    /// [`shutdown`]: ConnPool::shutdown
    pub fn release(&self, node: Box<PoolNode<C::Stream>>) {
        let mut lists = self.lists.lock().unwrap();
        lists.used.retain(|&id| id != node.id);
        if lists.closed || lists.free_max == 0 || !node.conn.is_keep_alive() {
            return;
        }
        while lists.free.len() >= lists.free_max {
            let _ = lists.free.pop_front();
        }
        lists.free.push_back(node);
    }

    /// Updates the free-list bound, evicting oldest nodes if the list now
    /// exceeds it.
    pub fn resize(&self, free_max: usize) {
        let mut lists = self.lists.lock().unwrap();
        lists.free_max = free_max;
        while lists.free.len() > lists.free_max {
            let _ = lists.free.pop_front();
        }
    }

    /// Closes every parked connection and refuses further leases. Leased
    /// nodes are closed as they come back through [`release`].
    ///
    /// [`release`]: ConnPool::release
    pub fn shutdown(&self) {
        let mut lists = self.lists.lock().unwrap();
        lists.closed = true;
        lists.free.clear();
    }

    /// Number of parked connections, for observation.
    pub fn idle_count(&self) -> usize {
        self.lists.lock().unwrap().free.len()
    }
}
