// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{average::MovingAverage, client::Transport, config::RunConfig, error::Error};
use bytes::Bytes;
use http::{header::USER_AGENT, HeaderMap, HeaderValue, Method, Request, Uri};
use http_body_util::{BodyExt, Empty};
use hyper::body::Body;
use std::time::Duration;
use tokio::time::Instant;

/// The outcome of one profile run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub label: String,
    pub average: Duration,
    /// Per-request latency in request order.
    pub samples: Vec<Duration>,
}

/// The request sent on every iteration of a run.
struct RequestTemplate {
    uri: Uri,
    headers: HeaderMap,
}

impl RequestTemplate {
    fn new(config: &RunConfig, label: &str) -> Result<Self, Error> {
        let user_agent = format!("{}-{label}", env!("CARGO_PKG_NAME"));
        let user_agent = HeaderValue::from_str(&user_agent)
            .map_err(|e| Error::InvalidTarget(e.into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);

        Ok(Self {
            uri: config.target()?,
            headers,
        })
    }

    fn request(&self) -> Request<Empty<Bytes>> {
        let mut request = Request::new(Empty::new());
        *request.method_mut() = Method::HEAD;
        *request.uri_mut() = self.uri.clone();
        *request.headers_mut() = self.headers.clone();
        request
    }
}

/// Sends `config.requests()` sequential HEAD requests through `client` and returns their
/// average latency.
///
/// The latency of a request covers sending it and receiving the response head. The body is
/// drained afterwards, outside of the measurement, so that the connection can be reused.
/// The first error aborts the run.
pub async fn run<T>(client: &T, config: &RunConfig, label: &str) -> Result<RunResult, Error>
where
    T: Transport,
    <T::ResponseBody as Body>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    log::debug!("config: {config:?}");

    let template = RequestTemplate::new(config, label)?;
    let mut samples = Vec::with_capacity(config.requests());

    for count in 0..config.requests() {
        let start = Instant::now();
        let response = client.send(template.request()).await?;
        let duration = start.elapsed();

        let mut body = response.into_body();
        while let Some(frame) = body.frame().await {
            frame.map_err(|e| Error::BodyError(e.into()))?;
        }
        drop(body);

        samples.push(duration);
        log::debug!("count: {count}");
        log::debug!("duration: {duration:?}");

        log::debug!("sleeping for {:?}", config.sleep());
        tokio::time::sleep(config.sleep()).await;
    }

    let mut average = MovingAverage::new(samples.len());
    for sample in &samples {
        average.add(sample.as_nanos() as f64);
    }

    Ok(RunResult {
        label: label.to_owned(),
        average: Duration::from_nanos(average.avg() as u64),
        samples,
    })
}
