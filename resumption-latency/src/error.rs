// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

/// Indicates which error occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Indicates that the scheme in the URI provided to the `HttpsConnector` is invalid.
    InvalidScheme,
    /// Indicates that a run was configured with zero requests.
    InvalidRequestCount,
    /// Indicates that `scheme://host/` could not be turned into a request URI.
    InvalidTarget(http::Error),
    /// Indicates that the log level could not be parsed.
    InvalidLogLevel(String),
    /// Indicates that an error occurred in the underlying `HttpConnector`.
    HttpError(Box<dyn std::error::Error + Send + Sync>),
    /// Indicates that an error occurred in s2n-tls.
    TlsError(s2n_tls::error::Error),
    /// Indicates that the HTTP client failed to send a request or receive its response head.
    RequestError(Box<dyn std::error::Error + Send + Sync>),
    /// Indicates that the response body could not be drained.
    BodyError(Box<dyn std::error::Error + Send + Sync>),
    /// Indicates that reading an input file or writing the report failed.
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidScheme => write!(f, "The provided URI contains an invalid scheme."),
            Error::InvalidRequestCount => write!(f, "The request count must be at least 1."),
            Error::InvalidTarget(err) => write!(f, "invalid target: {}", err),
            Error::InvalidLogLevel(level) => {
                write!(f, "can not parse loglevel from flag: {:?}", level)
            }
            Error::HttpError(err) => write!(f, "{}", err),
            Error::TlsError(err) => write!(f, "{}", err),
            Error::RequestError(err) => write!(f, "request failed: {}", err),
            Error::BodyError(err) => write!(f, "failed to drain response body: {}", err),
            Error::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidTarget(err) => Some(err),
            Error::HttpError(err) | Error::RequestError(err) | Error::BodyError(err) => {
                Some(err.as_ref())
            }
            Error::TlsError(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<s2n_tls::error::Error> for Error {
    fn from(err: s2n_tls::error::Error) -> Self {
        Error::TlsError(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
