/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Two stage resolution of temporary credentials for a job.
//!
//! 1. A [`ResolveRole`](role::ResolveRole) implementation maps a [`JobId`] to a [`RoleArn`].
//! 2. A [`CredentialCache`](cache::CredentialCache) hands out cached credentials for that role,
//!    refreshing them through an [`AssumeRole`](provider::AssumeRole) upstream when they are
//!    close to expiring.
//!
//! [`CredentialBroker`](broker::CredentialBroker) composes both stages behind
//! [`ProvideJobCredentials`](broker::ProvideJobCredentials).

pub mod broker;
pub mod cache;
pub mod future;
pub mod provider;
pub mod role;

pub use broker::{BrokerError, CredentialBroker, ProvideJobCredentials, StaticJobCredentials};
pub use cache::{CredentialCache, UpstreamFailure};
pub use provider::{AssumeRole, AssumeRoleError, AssumedCredentials};
pub use role::{ResolveRole, RoleNotFound};

pub use broker_types::{Credentials, JobId, RoleArn};
