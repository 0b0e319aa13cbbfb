// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use log::LevelFilter;
use resumption_latency::{
    client::ClientSettings,
    config::{RunConfig, Scheme},
    driver,
    error::Error,
};
use std::{path::PathBuf, str::FromStr, time::Duration};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The host to connect to, without a scheme.
    #[clap(long, default_value = "ip.thaller.ws")]
    host: String,
    /// The number of requests to send per profile.
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    requests: u32,
    /// Sleep duration between requests.
    #[clap(long, default_value = "1000ms", value_parser = humantime::parse_duration)]
    sleep: Duration,
    /// The log level for diagnostic output on stderr.
    #[clap(long, default_value = "info")]
    loglevel: String,
    /// PEM file with additional certificates to trust.
    #[clap(long)]
    ca_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = LevelFilter::from_str(&args.loglevel)
        .map_err(|_| Error::InvalidLogLevel(args.loglevel.clone()))?;
    env_logger::builder().filter_level(level).init();

    let settings = match &args.ca_file {
        Some(path) => ClientSettings::new().with_trust_file(path)?,
        None => ClientSettings::new(),
    };

    let config = RunConfig::new(args.host, Scheme::Http, args.requests as usize, args.sleep)?;
    log::debug!("{config:?}");

    let mut stdout = std::io::stdout();
    for scheme in [Scheme::Http, Scheme::Https] {
        driver::run_profiles(&settings, &config.with_scheme(scheme), &mut stdout).await?;
    }

    Ok(())
}
