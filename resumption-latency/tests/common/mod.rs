// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use bytes::Bytes;
use http::{header::LOCATION, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::{body::Incoming, server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use s2n_tls::{config, error::Error};
use s2n_tls_tokio::TlsAcceptor;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::SystemTime,
};
use tokio::{net::TcpListener, task::JoinHandle};

/// NOTE: these certificates and keys are used for testing purposes only!
pub const CA_PEM: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/certs/ca-cert.pem"));
pub const CERT_PEM: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/certs/cert.pem"));
pub const KEY_PEM: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/certs/key.pem"));

const TICKET_KEY_NAME: &[u8] = b"TestTicketKey";
const TICKET_KEY: [u8; 16] = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7, 9, 3];

pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// s2n-tls server config that issues session tickets.
pub fn server_config() -> Result<config::Config, Error> {
    let mut builder = config::Builder::new();
    builder.load_pem(CERT_PEM, KEY_PEM)?;
    builder.set_max_blinding_delay(0)?;
    builder.enable_session_tickets(true)?;
    // An introduction time of zero makes the key valid immediately.
    builder.add_session_ticket_key(TICKET_KEY_NAME, &TICKET_KEY, SystemTime::UNIX_EPOCH)?;
    builder.build()
}

/// What a loopback server has observed so far.
#[derive(Debug, Default)]
pub struct Observed {
    connections: AtomicUsize,
    requests: AtomicUsize,
    user_agents: Mutex<Vec<String>>,
    resumed: Mutex<Vec<bool>>,
}

impl Observed {
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn user_agents(&self) -> Vec<String> {
        self.user_agents.lock().unwrap().clone()
    }

    /// Whether each TLS connection, in accept order, was resumed.
    pub fn resumed(&self) -> Vec<bool> {
        self.resumed.lock().unwrap().clone()
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub observed: Arc<Observed>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// `localhost:<port>`, matching the test certificate.
    pub fn host(&self) -> String {
        format!("localhost:{}", self.addr.port())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn respond(
    status: StatusCode,
    observed: Arc<Observed>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    observed.requests.fetch_add(1, Ordering::SeqCst);
    if let Some(agent) = req.headers().get(http::header::USER_AGENT) {
        let agent = agent.to_str().unwrap_or_default().to_owned();
        observed.user_agents.lock().unwrap().push(agent);
    }

    let mut response = Response::new(Full::new(Bytes::from_static(b"hello world")));
    *response.status_mut() = status;
    if status.is_redirection() {
        response
            .headers_mut()
            .insert(LOCATION, http::HeaderValue::from_static("/elsewhere"));
    }
    Ok(response)
}

/// Serves plain HTTP on 127.0.0.1, answering every request with `status`.
pub async fn serve_http(status: StatusCode) -> std::io::Result<TestServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let observed = Arc::new(Observed::default());

    let task = tokio::spawn({
        let observed = observed.clone();
        async move {
            while let Ok((tcp, _)) = listener.accept().await {
                observed.connections.fetch_add(1, Ordering::SeqCst);
                let observed = observed.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| respond(status, observed.clone(), req));
                    // The client may close without waiting for the server to finish.
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(tcp), service)
                        .await;
                });
            }
        }
    });

    Ok(TestServer {
        addr,
        observed,
        task,
    })
}

/// Serves HTTPS with s2n-tls on 127.0.0.1, answering every request with 200.
pub async fn serve_https(config: config::Config) -> std::io::Result<TestServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let observed = Arc::new(Observed::default());

    let task = tokio::spawn({
        let observed = observed.clone();
        async move {
            let acceptor = TlsAcceptor::new(config);
            while let Ok((tcp, _)) = listener.accept().await {
                observed.connections.fetch_add(1, Ordering::SeqCst);
                let tls = match acceptor.accept(tcp).await {
                    Ok(tls) => tls,
                    Err(err) => {
                        log::warn!("server handshake failed: {err}");
                        continue;
                    }
                };
                observed.resumed.lock().unwrap().push(tls.as_ref().resumed());

                let observed = observed.clone();
                tokio::spawn(async move {
                    let service =
                        service_fn(move |req| respond(StatusCode::OK, observed.clone(), req));
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(tls), service)
                        .await;
                });
            }
        }
    });

    Ok(TestServer {
        addr,
        observed,
        task,
    })
}
