// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    connector::HttpsConnector,
    driver::ClientFactory,
    error::Error,
    profile::TransportProfile,
    session::{SessionCache, SessionTicketHandler},
};
use bytes::Bytes;
use http::{header::CONNECTION, HeaderValue, Request, Response};
use http_body_util::Empty;
use hyper::body::{Body, Incoming};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use s2n_tls::config::{self, Config};
use std::{future::Future, path::Path, sync::Arc};

/// Sends one request and resolves once the response head has been received.
///
/// Implementations must not follow redirects: a 3xx response is returned to the caller like any
/// other response.
pub trait Transport {
    type ResponseBody: Body<Data = Bytes> + Unpin;

    fn send(
        &self,
        request: Request<Empty<Bytes>>,
    ) -> impl Future<Output = Result<Response<Self::ResponseBody>, Error>>;
}

/// hyper-util client for a single `TransportProfile`.
///
/// The legacy hyper-util client never follows redirects. Keep-alive is disabled by keeping no
/// idle connections in the pool and asking the server to close the connection.
pub struct HttpClient {
    client: Client<HttpsConnector, Empty<Bytes>>,
    keep_alive: bool,
}

impl HttpClient {
    /// Builds a client with its own connector, TLS config and `session_cache`.
    ///
    /// `trust_pem` adds trust anchors on top of the system trust store.
    pub fn new(
        profile: &TransportProfile,
        session_cache: Arc<dyn SessionCache>,
        trust_pem: Option<&[u8]>,
    ) -> Result<Self, Error> {
        let config = tls_config(profile, session_cache.clone(), trust_pem)?;

        let connector = {
            let mut builder = HttpsConnector::builder(config, session_cache);
            builder.with_plaintext_http(true);
            builder.build()
        };

        let mut builder = Client::builder(TokioExecutor::new());
        if !profile.keep_alive {
            builder.pool_max_idle_per_host(0);
        }

        Ok(Self {
            client: builder.build(connector),
            keep_alive: profile.keep_alive,
        })
    }
}

impl Transport for HttpClient {
    type ResponseBody = Incoming;

    fn send(
        &self,
        mut request: Request<Empty<Bytes>>,
    ) -> impl Future<Output = Result<Response<Incoming>, Error>> {
        if !self.keep_alive {
            request
                .headers_mut()
                .insert(CONNECTION, HeaderValue::from_static("close"));
        }
        let response = self.client.request(request);
        async move { response.await.map_err(|e| Error::RequestError(e.into())) }
    }
}

/// Builds the s2n-tls client config for `profile`.
///
/// With session resumption, session tickets are requested and stored in `session_cache`.
/// Without it, tickets are disabled and whatever the cache is handed is discarded by it.
fn tls_config(
    profile: &TransportProfile,
    session_cache: Arc<dyn SessionCache>,
    trust_pem: Option<&[u8]>,
) -> Result<Config, Error> {
    let mut builder = config::Builder::new();
    // A failed handshake ends the process, delaying that only hides the error.
    builder.set_max_blinding_delay(0)?;
    if let Some(pem) = trust_pem {
        builder.trust_pem(pem)?;
    }
    builder.enable_session_tickets(profile.session_resumption)?;
    builder.set_session_ticket_callback(SessionTicketHandler::new(session_cache))?;
    Ok(builder.build()?)
}

/// Produces one `HttpClient` per profile, each starting from an empty session cache.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    trust_pem: Option<Vec<u8>>,
}

impl ClientSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trusts the PEM certificates in `pem` in addition to the system trust store.
    pub fn with_trust_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.trust_pem = Some(pem.into());
        self
    }

    pub fn with_trust_file(self, path: impl AsRef<Path>) -> Result<Self, Error> {
        let pem = std::fs::read(path)?;
        Ok(self.with_trust_pem(pem))
    }
}

impl ClientFactory for ClientSettings {
    type Client = HttpClient;

    fn client(&self, profile: &TransportProfile) -> Result<HttpClient, Error> {
        HttpClient::new(
            profile,
            profile.session_cache(),
            self.trust_pem.as_deref(),
        )
    }
}
