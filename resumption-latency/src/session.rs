// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use s2n_tls::{
    callbacks::{SessionTicket, SessionTicketCallback},
    connection::Connection,
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

/// Client-side storage for TLS session tickets, keyed by server name.
///
/// The connector calls `get` before every new TLS connection and offers the
/// returned ticket to the server. `put` is called from the s2n-tls session
/// ticket callback whenever the server issues a ticket.
pub trait SessionCache: Send + Sync {
    fn put(&self, server_name: &str, ticket: Vec<u8>);
    fn get(&self, server_name: &str) -> Option<Vec<u8>>;
}

/// A bounded least-recently-used ticket cache.
///
/// Built with a capacity of 1 for measurement runs, so that every new
/// connection offers the most recently received ticket.
#[derive(Debug)]
pub struct LruSessionCache {
    capacity: usize,
    // Front is least recently used.
    entries: Mutex<VecDeque<(String, Vec<u8>)>>,
}

impl LruSessionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionCache for LruSessionCache {
    fn put(&self, server_name: &str, ticket: Vec<u8>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|(name, _)| name != server_name);
        entries.push_back((server_name.to_owned(), ticket));
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    fn get(&self, server_name: &str) -> Option<Vec<u8>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let position = entries.iter().position(|(name, _)| name == server_name)?;
        let entry = entries.remove(position)?;
        let ticket = entry.1.clone();
        entries.push_back(entry);
        Some(ticket)
    }
}

/// A cache that never remembers anything.
///
/// Used together with disabled session tickets so that no connection is ever
/// resumed, even if the server hands out tickets anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSessionCache;

impl SessionCache for NoSessionCache {
    fn put(&self, _server_name: &str, _ticket: Vec<u8>) {}

    fn get(&self, _server_name: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Stores every session ticket received by a client connection in a `SessionCache`,
/// keyed by the server name the connection was opened with.
#[derive(Clone)]
pub struct SessionTicketHandler {
    cache: Arc<dyn SessionCache>,
}

impl SessionTicketHandler {
    pub fn new(cache: Arc<dyn SessionCache>) -> Self {
        Self { cache }
    }
}

impl SessionTicketCallback for SessionTicketHandler {
    fn on_session_ticket(&self, connection: &mut Connection, session_ticket: &SessionTicket) {
        let Some(server_name) = connection.server_name().map(str::to_owned) else {
            log::debug!("ignoring session ticket for a connection without a server name");
            return;
        };

        let size = match session_ticket.len() {
            Ok(size) => size,
            Err(err) => {
                log::warn!("unable to read session ticket length: {err}");
                return;
            }
        };
        let mut data = vec![0; size];
        if let Err(err) = session_ticket.data(&mut data) {
            log::warn!("unable to read session ticket: {err}");
            return;
        }

        log::debug!("received session ticket for {server_name} ({size} bytes)");
        self.cache.put(&server_name, data);
    }
}
