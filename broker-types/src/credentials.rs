/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Temporary credential set handed out to jobs.

use crate::date_time;
use crate::RoleArn;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::SystemTime;

/// Temporary credentials scoped to a single role.
///
/// `Credentials` is immutable once built. Internally it is reference counted so that a cached
/// set can be handed to many callers without copying the secret material.
///
/// The `Debug` implementation redacts the secret access key and the session token so that
/// credentials can be logged safely.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials(Arc<Inner>);

#[derive(Eq, PartialEq)]
struct Inner {
    role_arn: RoleArn,
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
    expiry: SystemTime,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("role_arn", &self.0.role_arn)
            .field("access_key_id", &self.0.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiry", &date_time::format_expiration(self.0.expiry))
            .finish()
    }
}

impl Credentials {
    pub fn new(
        role_arn: RoleArn,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
        expiry: SystemTime,
    ) -> Self {
        Credentials(Arc::new(Inner {
            role_arn,
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
            expiry,
        }))
    }

    pub fn role_arn(&self) -> &RoleArn {
        &self.0.role_arn
    }

    pub fn access_key_id(&self) -> &str {
        &self.0.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.0.secret_access_key
    }

    pub fn session_token(&self) -> &str {
        &self.0.session_token
    }

    /// Absolute time after which these credentials must not be handed out.
    pub fn expiry(&self) -> SystemTime {
        self.0.expiry
    }

    /// Returns true if both values share the same underlying allocation,
    /// ie. one is a clone of the other.
    pub fn ptr_eq(&self, other: &Credentials) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
