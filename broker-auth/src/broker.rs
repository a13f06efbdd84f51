/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Job-facing credential providers.

use crate::cache::CredentialCache;
use crate::future::JobCredentialsFuture;
use crate::provider::AssumeRoleError;
use crate::role::ResolveRole;
use broker_types::{Credentials, JobId, RoleArn};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Error returned when credentials for a job cannot be provided
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BrokerError {
    /// No role is mapped to the job
    #[error("could not get role for job: {0}")]
    RoleNotFound(JobId),

    /// The job's role is known but the upstream could not assume it
    #[error("could not get credentials for role: {role_arn}")]
    CredentialsUnavailable {
        role_arn: RoleArn,
        #[source]
        source: Arc<AssumeRoleError>,
    },

    /// No credentials were registered for the job
    #[error("couldn't find credentials for job: {0}")]
    CredentialsNotFound(JobId),
}

/// Asynchronous provider of temporary credentials for a job
pub trait ProvideJobCredentials: Send + Sync + Debug {
    fn credentials_for_job<'a>(&'a self, job_id: &'a JobId) -> JobCredentialsFuture<'a>;
}

impl<T: ProvideJobCredentials + ?Sized> ProvideJobCredentials for Arc<T> {
    fn credentials_for_job<'a>(&'a self, job_id: &'a JobId) -> JobCredentialsFuture<'a> {
        self.as_ref().credentials_for_job(job_id)
    }
}

/// Resolves a job's role, then hands out cached credentials for that role
///
/// The broker holds no state of its own. Both stages are injected:
///
/// ```rust
/// use broker_auth::cache::CredentialCache;
/// use broker_auth::provider::StaticAssumeRole;
/// use broker_auth::role::InMemoryRoleResolver;
/// use broker_auth::{CredentialBroker, JobId};
/// use std::sync::Arc;
///
/// # async fn docs() {
/// let roles: InMemoryRoleResolver = [("myjob", "arn:aws:iam::111111111:myrole/role")].into_iter().collect();
/// let upstream = StaticAssumeRole::new().with_role("arn:aws:iam::111111111:myrole/role", "Key", "Secret", "token");
/// let broker = CredentialBroker::new(Arc::new(roles), CredentialCache::builder(upstream).build());
///
/// let creds = broker.get_credentials(&JobId::from("myjob")).await.unwrap();
/// assert_eq!("arn:aws:iam::111111111:myrole/role", creds.role_arn().as_str());
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CredentialBroker {
    resolver: Arc<dyn ResolveRole>,
    cache: CredentialCache,
}

impl CredentialBroker {
    pub fn new(resolver: Arc<dyn ResolveRole>, cache: CredentialCache) -> Self {
        CredentialBroker { resolver, cache }
    }

    pub async fn get_credentials(&self, job_id: &JobId) -> Result<Credentials, BrokerError> {
        let role_arn = self.resolver.resolve(job_id).map_err(|err| {
            tracing::debug!(job_id = %job_id, error = %err, "role lookup failed");
            BrokerError::RoleNotFound(job_id.clone())
        })?;
        tracing::debug!(job_id = %job_id, role_arn = %role_arn, "resolved role");
        self.cache.credentials_for(&role_arn).await.map_err(|failure| {
            let (role_arn, source) = failure.into_parts();
            BrokerError::CredentialsUnavailable { role_arn, source }
        })
    }
}

impl ProvideJobCredentials for CredentialBroker {
    fn credentials_for_job<'a>(&'a self, job_id: &'a JobId) -> JobCredentialsFuture<'a> {
        JobCredentialsFuture::new(self.get_credentials(job_id))
    }
}

/// Fixed job to credentials mapping
#[derive(Clone, Debug, Default)]
pub struct StaticJobCredentials {
    credentials: HashMap<JobId, Credentials>,
}

impl StaticJobCredentials {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_credentials(&mut self, job_id: impl Into<JobId>, credentials: Credentials) {
        self.credentials.insert(job_id.into(), credentials);
    }
}

impl ProvideJobCredentials for StaticJobCredentials {
    fn credentials_for_job<'a>(&'a self, job_id: &'a JobId) -> JobCredentialsFuture<'a> {
        JobCredentialsFuture::ready(
            self.credentials
                .get(job_id)
                .cloned()
                .ok_or_else(|| BrokerError::CredentialsNotFound(job_id.clone())),
        )
    }
}
