// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use http::Uri;
use std::{fmt, time::Duration};

/// The URI scheme a matrix is measured over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Scheme::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a single profile run needs to know about the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    host: String,
    scheme: Scheme,
    requests: usize,
    sleep: Duration,
}

impl RunConfig {
    /// `host` may carry a port (`localhost:8443`) but never a scheme.
    pub fn new(
        host: impl Into<String>,
        scheme: Scheme,
        requests: usize,
        sleep: Duration,
    ) -> Result<Self, Error> {
        if requests == 0 {
            return Err(Error::InvalidRequestCount);
        }
        Ok(Self {
            host: host.into(),
            scheme,
            requests,
            sleep,
        })
    }

    /// Returns a copy of this config targeting `scheme`.
    pub fn with_scheme(&self, scheme: Scheme) -> Self {
        Self {
            scheme,
            ..self.clone()
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn sleep(&self) -> Duration {
        self.sleep
    }

    /// `scheme://host/`
    pub fn target(&self) -> Result<Uri, Error> {
        Uri::builder()
            .scheme(self.scheme.as_str())
            .authority(self.host.as_str())
            .path_and_query("/")
            .build()
            .map_err(Error::InvalidTarget)
    }
}
