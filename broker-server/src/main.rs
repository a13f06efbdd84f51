/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

// This program is exported as a binary named `credential-broker`.
// Run it with a job to role mapping file:
// `$ credential-broker --credentials-repository-file ./roles.ini --verbose`
// and query it:
// `$ curl http://localhost:8080/credentials/myjob`

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use aws_smithy_types::error::display::DisplayErrorContext;
use broker_auth::cache::CredentialCache;
use broker_auth::provider::sts::StsAssumeRole;
use broker_auth::role::FileRoleResolver;
use broker_auth::CredentialBroker;
use broker_server::config::{
    DEFAULT_EXPIRY_MARGIN_SECS, DEFAULT_REGION, DEFAULT_SERVER_ADDRESS, DEFAULT_SESSION_DURATION_SECS,
};
use broker_server::{app, serve, setup_tracing, Config, ConfigError};
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Address the HTTP server binds to.
    #[clap(long, default_value = DEFAULT_SERVER_ADDRESS)]
    server_address: String,
    /// File mapping job ids to the roles they assume.
    #[clap(long)]
    credentials_repository_file: PathBuf,
    /// Log at debug level.
    #[clap(short, long)]
    verbose: bool,
    /// Region of the STS endpoint.
    #[clap(long, default_value = DEFAULT_REGION)]
    region: String,
    /// Lifetime of the assumed role sessions, in seconds (900 to 43200).
    #[clap(long, default_value_t = DEFAULT_SESSION_DURATION_SECS)]
    session_duration_secs: u64,
    /// Credentials are refreshed this many seconds before they expire. Must be less than half of
    /// the session duration.
    #[clap(long, default_value_t = DEFAULT_EXPIRY_MARGIN_SECS)]
    expiry_margin_secs: u64,
    /// Emit logs as JSON.
    #[clap(long)]
    log_json: bool,
}

impl Args {
    fn into_config(self) -> Result<Config, ConfigError> {
        Config::builder()
            .server_address(self.server_address)
            .credentials_repository_file(self.credentials_repository_file)
            .verbose(self.verbose)
            .region(self.region)
            .session_duration(Duration::from_secs(self.session_duration_secs))
            .expiry_margin(Duration::from_secs(self.expiry_margin_secs))
            .log_json(self.log_json)
            .build()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) => {
            setup_tracing(false, false);
            tracing::error!(error = %DisplayErrorContext(&err), "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    setup_tracing(config.verbose(), config.log_json());

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %DisplayErrorContext(err.as_ref()), "credential broker failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let resolver = FileRoleResolver::load(config.credentials_repository_file())?;

    let upstream = StsAssumeRole::from_region(config.region().to_string()).await;
    let cache = CredentialCache::builder(upstream)
        .session_duration(config.session_duration())
        .expiry_margin(config.expiry_margin())
        .build();
    let broker = CredentialBroker::new(Arc::new(resolver), cache);

    let listener = TcpListener::bind(config.server_address()).await?;
    serve(listener, app(broker), shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
