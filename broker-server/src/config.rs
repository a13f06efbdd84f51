/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Process configuration.

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_REGION: &str = "eu-west-1";
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 3600;
pub const DEFAULT_EXPIRY_MARGIN_SECS: u64 = 10;
/// Shortest session STS issues for `AssumeRole`
pub const MIN_SESSION_DURATION_SECS: u64 = 900;
/// Longest session STS issues for `AssumeRole`
pub const MAX_SESSION_DURATION_SECS: u64 = 43200;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("the credentials repository file must be set")]
    MissingRepositoryFile,

    #[error("invalid server address `{address}`")]
    InvalidServerAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error(
        "session duration ({}s) must be between {}s and {}s",
        duration.as_secs(),
        MIN_SESSION_DURATION_SECS,
        MAX_SESSION_DURATION_SECS
    )]
    InvalidSessionDuration { duration: Duration },

    #[error(
        "expiry margin ({}s) must be less than half of the session duration ({}s)",
        margin.as_secs(),
        duration.as_secs()
    )]
    InvalidExpiryMargin { margin: Duration, duration: Duration },
}

/// Validated settings of a broker process
#[derive(Clone, Debug)]
pub struct Config {
    server_address: SocketAddr,
    credentials_repository_file: PathBuf,
    verbose: bool,
    region: String,
    session_duration: Duration,
    expiry_margin: Duration,
    log_json: bool,
}

impl Config {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn server_address(&self) -> SocketAddr {
        self.server_address
    }

    /// Path of the job to role mapping file
    pub fn credentials_repository_file(&self) -> &Path {
        &self.credentials_repository_file
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Region of the STS endpoint
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Lifetime requested for every assumed role session
    pub fn session_duration(&self) -> Duration {
        self.session_duration
    }

    pub fn expiry_margin(&self) -> Duration {
        self.expiry_margin
    }

    pub fn log_json(&self) -> bool {
        self.log_json
    }
}

/// Builder for [`Config`]
#[derive(Debug, Default)]
pub struct Builder {
    server_address: Option<String>,
    credentials_repository_file: Option<PathBuf>,
    verbose: bool,
    region: Option<String>,
    session_duration: Option<Duration>,
    expiry_margin: Option<Duration>,
    log_json: bool,
}

impl Builder {
    /// Address to listen on, `host:port`. A bare `:port` listens on all interfaces.
    pub fn server_address(mut self, address: impl Into<String>) -> Self {
        self.server_address = Some(address.into());
        self
    }

    pub fn credentials_repository_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_repository_file = Some(path.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = Some(duration);
        self
    }

    pub fn expiry_margin(mut self, margin: Duration) -> Self {
        self.expiry_margin = Some(margin);
        self
    }

    pub fn log_json(mut self, log_json: bool) -> Self {
        self.log_json = log_json;
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let credentials_repository_file = self
            .credentials_repository_file
            .ok_or(ConfigError::MissingRepositoryFile)?;
        let server_address =
            parse_address(self.server_address.as_deref().unwrap_or(DEFAULT_SERVER_ADDRESS))?;
        let session_duration = self
            .session_duration
            .unwrap_or(Duration::from_secs(DEFAULT_SESSION_DURATION_SECS));
        let expiry_margin = self
            .expiry_margin
            .unwrap_or(Duration::from_secs(DEFAULT_EXPIRY_MARGIN_SECS));
        let allowed = Duration::from_secs(MIN_SESSION_DURATION_SECS)..=Duration::from_secs(MAX_SESSION_DURATION_SECS);
        if !allowed.contains(&session_duration) {
            return Err(ConfigError::InvalidSessionDuration {
                duration: session_duration,
            });
        }
        // a refreshed entry keeps `duration - margin` and is handed out while `margin` of it remains
        if expiry_margin.checked_mul(2).map_or(true, |twice| twice >= session_duration) {
            return Err(ConfigError::InvalidExpiryMargin {
                margin: expiry_margin,
                duration: session_duration,
            });
        }
        Ok(Config {
            server_address,
            credentials_repository_file,
            verbose: self.verbose,
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            session_duration,
            expiry_margin,
            log_json: self.log_json,
        })
    }
}

fn parse_address(address: &str) -> Result<SocketAddr, ConfigError> {
    let candidate = match address.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => address.to_string(),
    };
    candidate
        .parse()
        .map_err(|source| ConfigError::InvalidServerAddress {
            address: address.to_string(),
            source,
        })
}
