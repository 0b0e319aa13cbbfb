// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{error::Error, session::SessionCache, stream::MaybeHttpsStream};
use http::uri::Uri;
use hyper::rt::{Read, Write};
use hyper_util::{
    client::legacy::connect::{Connection, HttpConnector},
    rt::TokioIo,
};
use s2n_tls::{config::Config, connection};
use s2n_tls_tokio::TlsConnector;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower_service::Service;

/// hyper-compatible connector that negotiates HTTPS with s2n-tls and resumes TLS sessions from
/// a `SessionCache`.
///
/// Every new TLS connection looks up the cache by server name and, if a ticket is present,
/// offers it to the server. Tickets received on the connection are stored by the
/// `SessionTicketHandler` registered on `config`, if any.
#[derive(Clone)]
pub struct HttpsConnector<Http = HttpConnector> {
    http: Http,
    config: Config,
    session_cache: Arc<dyn SessionCache>,
    plaintext_http: bool,
}

impl HttpsConnector<HttpConnector> {
    /// Creates a `Builder` wrapping a new hyper `HttpConnector`.
    pub fn builder(config: Config, session_cache: Arc<dyn SessionCache>) -> Builder<HttpConnector> {
        let mut http = HttpConnector::new();

        // By default, the `HttpConnector` only allows the HTTP URI scheme to be used. To negotiate
        // HTTP over TLS via the HTTPS scheme, `enforce_http` must be disabled.
        http.enforce_http(false);

        HttpsConnector::builder_with_http(http, config, session_cache)
    }
}

impl<Http> HttpsConnector<Http> {
    /// Creates a `Builder` wrapping an existing HTTP connector, which must permit the HTTPS
    /// scheme.
    pub fn builder_with_http(
        http: Http,
        config: Config,
        session_cache: Arc<dyn SessionCache>,
    ) -> Builder<Http> {
        Builder {
            http,
            config,
            session_cache,
            plaintext_http: false,
        }
    }
}

/// Builder used to configure an `HttpsConnector`.
pub struct Builder<Http> {
    http: Http,
    config: Config,
    session_cache: Arc<dyn SessionCache>,
    plaintext_http: bool,
}

impl<Http> Builder<Http> {
    /// If enabled, allows communication with plaintext HTTP endpoints in addition to secure HTTPS
    /// endpoints (default: false).
    pub fn with_plaintext_http(&mut self, enabled: bool) -> &mut Self {
        self.plaintext_http = enabled;
        self
    }

    pub fn build(self) -> HttpsConnector<Http> {
        HttpsConnector {
            http: self.http,
            config: self.config,
            session_cache: self.session_cache,
            plaintext_http: self.plaintext_http,
        }
    }
}

// hyper connectors MUST implement `hyper_util::client::legacy::connect::Connect`, which is an alias
// for `tower_service::Service<Uri>` where the response implements the hyper compatibility traits
// (see `MaybeHttpsStream`).
impl<Http> Service<Uri> for HttpsConnector<Http>
where
    Http: Service<Uri>,
    Http::Response: Read + Write + Connection + Unpin + Send + 'static,
    Http::Future: Send + 'static,
    Http::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = MaybeHttpsStream<Http::Response>;
    type Error = Error;
    type Future =
        Pin<Box<dyn Future<Output = Result<MaybeHttpsStream<Http::Response>, Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        match self.http.poll_ready(cx) {
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Ready(Err(e)) => Poll::Ready(Err(Error::HttpError(e.into()))),
            Poll::Pending => Poll::Pending,
        }
    }

    fn call(&mut self, req: Uri) -> Self::Future {
        match req.scheme() {
            Some(scheme) if scheme == &http::uri::Scheme::HTTPS => (),
            Some(scheme) if scheme == &http::uri::Scheme::HTTP && self.plaintext_http => {
                let call = self.http.call(req);
                return Box::pin(async move {
                    let tcp = call.await.map_err(|e| Error::HttpError(e.into()))?;
                    Ok(MaybeHttpsStream::Http(tcp))
                });
            }
            _ => {
                return Box::pin(async move { Err(Error::InvalidScheme) });
            }
        }

        // IPv6 addresses are enclosed in square brackets within the host of a URI. The brackets
        // aren't part of the server name.
        let mut domain = req.host().unwrap_or("");
        if let Some(trimmed) = domain.strip_prefix('[') {
            if let Some(trimmed) = trimmed.strip_suffix(']') {
                domain = trimmed;
            }
        }
        let domain = domain.to_owned();

        let session_cache = self.session_cache.clone();
        let server_name = domain.clone();
        let builder = connection::ModifiedBuilder::new(self.config.clone(), move |conn| {
            // Only HTTP/1.1 is offered, the client is not built for HTTP/2.
            conn.set_application_protocol_preference([b"http/1.1"])?;
            if let Some(ticket) = session_cache.get(&server_name) {
                log::debug!("offering session ticket for {server_name}");
                conn.set_session_ticket(&ticket)?;
            }
            Ok(conn)
        });

        let call = self.http.call(req);
        Box::pin(async move {
            let tcp = call.await.map_err(|e| Error::HttpError(e.into()))?;
            let tcp = TokioIo::new(tcp);

            let connector = TlsConnector::new(builder);
            let tls = connector
                .connect(&domain, tcp)
                .await
                .map_err(Error::TlsError)?;
            log::debug!("negotiated TLS with {domain}, resumed: {}", tls.as_ref().resumed());

            Ok(MaybeHttpsStream::Https(TokioIo::new(tls)))
        })
    }
}
