/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Resolution of a job identifier to the role it is allowed to assume.
//!
//! The mapping is loaded once and never changes afterwards, so every resolver is a pure,
//! lock free read that can be shared freely across tasks.

mod file;
mod parse;

pub use file::{FileRoleResolver, MappingError, ROLES_SECTION};
pub use parse::ParseError;

use broker_types::{JobId, RoleArn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// No role is mapped to the requested job
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleNotFound {
    job_id: JobId,
}

impl RoleNotFound {
    pub fn new(job_id: JobId) -> Self {
        RoleNotFound { job_id }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl Display for RoleNotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "role for job {} does not exist", self.job_id)
    }
}

impl Error for RoleNotFound {}

/// Resolves a job to a role
///
/// Lookups are exact matches on the job identifier.
pub trait ResolveRole: Send + Sync + Debug {
    fn resolve(&self, job_id: &JobId) -> Result<RoleArn, RoleNotFound>;
}

impl<T: ResolveRole + ?Sized> ResolveRole for Arc<T> {
    fn resolve(&self, job_id: &JobId) -> Result<RoleArn, RoleNotFound> {
        self.as_ref().resolve(job_id)
    }
}

/// Role resolver backed by a map built in code
///
/// ```rust
/// use broker_auth::role::{InMemoryRoleResolver, ResolveRole};
/// use broker_auth::JobId;
///
/// let mut resolver = InMemoryRoleResolver::new();
/// resolver.add_role("myjob", "arn:aws:iam::111111111:myrole/role");
/// let role = resolver.resolve(&JobId::from("myjob")).unwrap();
/// assert_eq!("arn:aws:iam::111111111:myrole/role", role.as_str());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRoleResolver {
    roles: HashMap<JobId, RoleArn>,
}

impl InMemoryRoleResolver {
    pub fn new() -> Self {
        Default::default()
    }

    /// Maps `job_id` to `role_arn`, replacing any previous mapping for that job
    pub fn add_role(&mut self, job_id: impl Into<JobId>, role_arn: impl Into<RoleArn>) {
        self.roles.insert(job_id.into(), role_arn.into());
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl<J: Into<JobId>, R: Into<RoleArn>> FromIterator<(J, R)> for InMemoryRoleResolver {
    fn from_iter<I: IntoIterator<Item = (J, R)>>(iter: I) -> Self {
        InMemoryRoleResolver {
            roles: iter
                .into_iter()
                .map(|(job, role)| (job.into(), role.into()))
                .collect(),
        }
    }
}

impl ResolveRole for InMemoryRoleResolver {
    fn resolve(&self, job_id: &JobId) -> Result<RoleArn, RoleNotFound> {
        self.roles
            .get(job_id)
            .cloned()
            .ok_or_else(|| RoleNotFound::new(job_id.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::{InMemoryRoleResolver, ResolveRole, RoleNotFound};
    use broker_types::JobId;

    #[test]
    fn find_role_by_job_id() {
        let mut resolver = InMemoryRoleResolver::new();
        resolver.add_role("myjob", "arn:aws:iam::111111111:myrole/role");

        let role = resolver.resolve(&JobId::from("myjob")).expect("role exists");
        assert_eq!("arn:aws:iam::111111111:myrole/role", role.as_str());
    }

    #[test]
    fn find_role_by_job_id_returns_error() {
        let resolver = InMemoryRoleResolver::new();

        let err = resolver
            .resolve(&JobId::from("myNonExistentJob"))
            .expect_err("no role is mapped");
        assert_eq!(RoleNotFound::new(JobId::from("myNonExistentJob")), err);
        assert_eq!("role for job myNonExistentJob does not exist", err.to_string());
    }

    #[test]
    fn lookups_are_exact() {
        let resolver: InMemoryRoleResolver =
            vec![("myjob", "arn:aws:iam::111111111:myrole/role")].into_iter().collect();

        assert!(resolver.resolve(&JobId::from("myjob")).is_ok());
        assert!(resolver.resolve(&JobId::from("MYJOB")).is_err());
        assert!(resolver.resolve(&JobId::from("myjob2")).is_err());
        assert!(resolver.resolve(&JobId::from("my")).is_err());
    }

    #[test]
    fn later_mapping_wins() {
        let mut resolver = InMemoryRoleResolver::new();
        resolver.add_role("myjob", "first");
        resolver.add_role("myjob", "second");
        assert_eq!(1, resolver.len());
        assert_eq!("second", resolver.resolve(&JobId::from("myjob")).unwrap().as_str());
    }
}
