// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{
    client::Transport,
    config::RunConfig,
    error::Error,
    profile::{profiles_for, TransportProfile},
    runner::{self, RunResult},
};
use hyper::body::Body;
use std::io::Write;

/// Builds the client a profile is measured with.
///
/// Called once per profile; the returned client must not share connections or session state
/// with clients built for other profiles.
pub trait ClientFactory {
    type Client: Transport;

    fn client(&self, profile: &TransportProfile) -> Result<Self::Client, Error>;
}

/// Measures every profile applicable to `config.scheme()`, in order, writing a report to `out`.
///
/// Stops at the first error; profiles after the failing one are not run.
pub async fn run_profiles<F, W>(
    factory: &F,
    config: &RunConfig,
    out: &mut W,
) -> Result<Vec<RunResult>, Error>
where
    F: ClientFactory,
    <<F::Client as Transport>::ResponseBody as Body>::Error:
        Into<Box<dyn std::error::Error + Send + Sync>>,
    W: Write,
{
    writeln!(out, "{}", config.scheme())?;

    let mut results = Vec::new();
    for profile in profiles_for(config.scheme()) {
        writeln!(out, "{}", profile.title)?;
        log::info!("measuring {} over {}", profile.name, config.scheme());

        let client = factory.client(profile)?;
        let result = runner::run(&client, config, profile.name).await?;

        writeln!(out, "avg duration: {:?}", result.average)?;
        out.flush()?;
        results.push(result);
    }
    Ok(results)
}
