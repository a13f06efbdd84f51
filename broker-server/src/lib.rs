/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! HTTP front end of the credential broker.
//!
//! [`app`] builds the tower service answering `GET /credentials/{jobId}` and the
//! `/health-check/` liveness probe; [`serve`] runs it on a TCP listener.

pub mod config;
pub mod credentials;
pub mod health_check;
mod serve;

use bytes::Bytes;
use http_body_util::Full;
use tower::Layer;
use tracing_subscriber::{prelude::*, EnvFilter};

use broker_auth::ProvideJobCredentials;

pub use config::{Config, ConfigError};
pub use credentials::{job_id_from_uri, CredentialsService, MalformedRequest};
pub use health_check::{HealthCheckLayer, HealthCheckService};
pub use serve::serve;

/// Body of every response produced by the broker
pub type ResponseBody = Full<Bytes>;

/// Builds the broker's HTTP service on top of `provider`
pub fn app(provider: impl ProvideJobCredentials + 'static) -> HealthCheckService<CredentialsService> {
    HealthCheckLayer::default().layer(CredentialsService::new(provider))
}

/// Sets up the tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, the broker logs at `debug` when `verbose` is set and
/// at `info` otherwise.
pub fn setup_tracing(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}
