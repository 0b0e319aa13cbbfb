// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Measures HTTP and HTTPS request latency under different connection reuse and TLS session
//! resumption settings.
//!
//! For every [`profile::TransportProfile`] applicable to a scheme, a fresh hyper client is built
//! on top of an s2n-tls [`connector::HttpsConnector`], a fixed number of sequential `HEAD`
//! requests is timed by [`runner::run`], and the average latency is reported by
//! [`driver::run_profiles`].

pub mod average;
pub mod client;
pub mod config;
pub mod connector;
pub mod driver;
pub mod error;
pub mod profile;
pub mod runner;
pub mod session;

mod stream;
