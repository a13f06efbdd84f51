/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Assume role through the AWS Security Token Service (STS).

use crate::future::AssumeRoleFuture;
use crate::provider::{AssumeRole, AssumeRoleError, AssumedCredentials};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client;
use broker_types::RoleArn;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const SESSION_NAME_PREFIX: &str = "credential-broker";

/// [`AssumeRole`] implementation calling `sts:AssumeRole`
///
/// The broker authenticates to STS with whatever credentials the default AWS provider chain
/// resolves for the process (environment, profile, instance metadata, ...).
#[derive(Clone, Debug)]
pub struct StsAssumeRole {
    client: Client,
}

impl StsAssumeRole {
    pub fn new(client: Client) -> Self {
        StsAssumeRole { client }
    }

    /// Builds an STS client for `region` from the default AWS configuration
    pub async fn from_region(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;
        StsAssumeRole::new(Client::new(&config))
    }

    fn session_name() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|since_epoch| since_epoch.as_millis())
            .unwrap_or_default();
        format!("{}-{}", SESSION_NAME_PREFIX, millis)
    }

    async fn assume(&self, role_arn: &RoleArn, duration: Duration) -> Result<AssumedCredentials, AssumeRoleError> {
        let duration_seconds = i32::try_from(duration.as_secs())
            .map_err(|err| AssumeRoleError::Unhandled(err.into()))?;
        let output = self
            .client
            .assume_role()
            .role_arn(role_arn.as_str())
            .role_session_name(Self::session_name())
            .duration_seconds(duration_seconds)
            .send()
            .await
            .map_err(|err| AssumeRoleError::ServiceError(DisplayErrorContext(err).to_string().into()))?;
        let credentials = output
            .credentials()
            .ok_or(AssumeRoleError::MissingCredentials)?;
        let expiry = SystemTime::try_from(*credentials.expiration())
            .map_err(|err| AssumeRoleError::Unhandled(err.into()))?;
        Ok(AssumedCredentials::new(
            credentials.access_key_id(),
            credentials.secret_access_key(),
            credentials.session_token(),
            expiry,
        ))
    }
}

impl AssumeRole for StsAssumeRole {
    fn assume_role<'a>(&'a self, role_arn: &'a RoleArn, duration: Duration) -> AssumeRoleFuture<'a> {
        AssumeRoleFuture::new(self.assume(role_arn, duration))
    }
}
