// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use hyper::rt::{Read, ReadBufCursor, Write};
use hyper_util::{
    client::legacy::connect::{Connected, Connection as HyperConnection},
    rt::TokioIo,
};
use s2n_tls_tokio::TlsStream;
use std::{
    io::Error,
    pin::Pin,
    task::{Context, Poll},
};

/// A hyper TCP stream, `Transport`, that either carries TLS negotiated by s2n-tls (`Https`) or
/// plain HTTP (`Http`).
///
/// The `TlsStream` needs tokio IO traits, so the TCP stream is wrapped in `TokioIo`. hyper in
/// turn needs its own `Read` and `Write` traits, so the `TlsStream` is wrapped in a second
/// `TokioIo`.
pub enum MaybeHttpsStream<Transport>
where
    Transport: Read + Write + Unpin,
{
    Https(TokioIo<TlsStream<TokioIo<Transport>>>),
    Http(Transport),
}

impl<Transport> HyperConnection for MaybeHttpsStream<Transport>
where
    Transport: Read + Write + HyperConnection + Unpin,
{
    fn connected(&self) -> Connected {
        match self {
            Self::Https(stream) => stream.inner().get_ref().connected(),
            Self::Http(stream) => stream.connected(),
        }
    }
}

impl<Transport> Read for MaybeHttpsStream<Transport>
where
    Transport: Read + Write + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: ReadBufCursor<'_>,
    ) -> Poll<Result<(), Error>> {
        match Pin::get_mut(self) {
            Self::Https(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Http(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl<Transport> Write for MaybeHttpsStream<Transport>
where
    Transport: Read + Write + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, Error>> {
        match Pin::get_mut(self) {
            Self::Https(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Http(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        match Pin::get_mut(self) {
            Self::Https(stream) => Pin::new(stream).poll_flush(cx),
            Self::Http(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        match Pin::get_mut(self) {
            Self::Https(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Http(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}
