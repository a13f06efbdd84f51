/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::future::AssumeRoleFuture;
use crate::provider::{AssumeRole, AssumeRoleError, AssumedCredentials};
use broker_types::{RoleArn, SharedTimeSource, TimeSource};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug)]
struct StaticKeys {
    access_key_id: String,
    secret_access_key: String,
    session_token: String,
}

/// In-memory upstream that issues fixed keys for a set of known roles
///
/// Each successful call issues credentials expiring `duration` after the current time of the
/// configured time source. Unknown roles are rejected with [`AssumeRoleError::ServiceError`].
/// The number of calls is recorded so that tests can assert on upstream traffic.
///
/// ```rust
/// use broker_auth::provider::{AssumeRole, StaticAssumeRole};
/// use broker_auth::RoleArn;
/// use std::time::Duration;
///
/// # async fn docs() {
/// let upstream = StaticAssumeRole::new().with_role("arn:aws:iam::111111111:myrole/role", "Key", "Secret", "token");
/// let role = RoleArn::from("arn:aws:iam::111111111:myrole/role");
/// let creds = upstream.assume_role(&role, Duration::from_secs(3600)).await.unwrap();
/// assert_eq!("Key", creds.access_key_id());
/// assert_eq!(1, upstream.calls());
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticAssumeRole {
    roles: HashMap<RoleArn, StaticKeys>,
    time_source: SharedTimeSource,
    calls: Arc<AtomicUsize>,
}

impl StaticAssumeRole {
    pub fn new() -> Self {
        Default::default()
    }

    /// Issue `access_key_id`, `secret_access_key` and `session_token` for `role_arn`
    pub fn with_role(
        mut self,
        role_arn: impl Into<RoleArn>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        self.roles.insert(
            role_arn.into(),
            StaticKeys {
                access_key_id: access_key_id.into(),
                secret_access_key: secret_access_key.into(),
                session_token: session_token.into(),
            },
        );
        self
    }

    /// Time source used to compute the expiry of issued credentials
    pub fn with_time_source(mut self, time_source: impl TimeSource + 'static) -> Self {
        self.time_source = SharedTimeSource::new(time_source);
        self
    }

    /// Number of `assume_role` calls made so far, across all clones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn assume(&self, role_arn: &RoleArn, duration: Duration) -> Result<AssumedCredentials, AssumeRoleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let keys = self.roles.get(role_arn).ok_or_else(|| {
            AssumeRoleError::ServiceError(format!("AccessDenied: not authorized to assume {}", role_arn).into())
        })?;
        Ok(AssumedCredentials::new(
            keys.access_key_id.clone(),
            keys.secret_access_key.clone(),
            keys.session_token.clone(),
            self.time_source.now() + duration,
        ))
    }
}

impl AssumeRole for StaticAssumeRole {
    fn assume_role<'a>(&'a self, role_arn: &'a RoleArn, duration: Duration) -> AssumeRoleFuture<'a> {
        AssumeRoleFuture::ready(self.assume(role_arn, duration))
    }
}
