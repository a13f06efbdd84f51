/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Upstream exchange of a role for temporary credentials.
//!
//! The broker treats the upstream as a single fallible operation,
//! `assume(role, duration) -> credentials | error`. Request signing, transport and any retries
//! are the upstream's business.

mod in_memory;
#[cfg(feature = "sts")]
pub mod sts;

pub use in_memory::StaticAssumeRole;

use crate::future::AssumeRoleFuture;
use broker_types::date_time::format_expiration;
use broker_types::RoleArn;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Credentials as returned by the upstream, before the broker attaches its own expiry
#[derive(Clone, Eq, PartialEq)]
pub struct AssumedCredentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiry: SystemTime,
}

impl AssumedCredentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expiry: SystemTime,
    ) -> Self {
        AssumedCredentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            expiry,
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// Expiry reported by the upstream
    pub fn expiry(&self) -> SystemTime {
        self.expiry
    }
}

impl Debug for AssumedCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssumedCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiry", &self.expiry)
            .finish()
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum AssumeRoleError {
    /// The upstream rejected the request or could not be reached
    ///
    /// For example: access denied for the role, throttling, a timeout or a DNS failure.
    ServiceError(Box<dyn Error + Send + Sync + 'static>),

    /// The upstream answered but did not include credentials
    MissingCredentials,

    /// The request could not be built or the response could not be understood
    Unhandled(Box<dyn Error + Send + Sync + 'static>),

    /// The upstream issued credentials that expire before they could be handed out
    ExpiresTooSoon { expiry: SystemTime },
}

impl Display for AssumeRoleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AssumeRoleError::ServiceError(err) => write!(f, "assume role request failed: {}", err),
            AssumeRoleError::MissingCredentials => {
                write!(f, "assume role response did not contain credentials")
            }
            AssumeRoleError::Unhandled(err) => write!(f, "unexpected assume role error: {}", err),
            AssumeRoleError::ExpiresTooSoon { expiry } => write!(
                f,
                "assumed credentials expire too soon to be handed out ({})",
                format_expiration(*expiry)
            ),
        }
    }
}

impl Error for AssumeRoleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AssumeRoleError::ServiceError(err) | AssumeRoleError::Unhandled(err) => {
                Some(err.as_ref() as _)
            }
            AssumeRoleError::MissingCredentials | AssumeRoleError::ExpiresTooSoon { .. } => None,
        }
    }
}

/// Exchanges a role for temporary credentials valid for roughly `duration`
pub trait AssumeRole: Send + Sync + Debug {
    fn assume_role<'a>(&'a self, role_arn: &'a RoleArn, duration: Duration) -> AssumeRoleFuture<'a>;
}

impl<T: AssumeRole + ?Sized> AssumeRole for Arc<T> {
    fn assume_role<'a>(&'a self, role_arn: &'a RoleArn, duration: Duration) -> AssumeRoleFuture<'a> {
        self.as_ref().assume_role(role_arn, duration)
    }
}
