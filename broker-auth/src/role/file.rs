/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use super::parse::{self, ParseError};
use super::{InMemoryRoleResolver, ResolveRole, RoleNotFound};
use broker_types::{JobId, RoleArn};
use std::path::{Path, PathBuf};

/// Section of the mapping file listing `job = role` pairs
pub const ROLES_SECTION: &str = "roles";

/// Failure to load a mapping file. The broker cannot start without its mapping.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("could not read role mapping file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid role mapping file `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Role resolver loaded from a mapping file
///
/// The file is read once by [`FileRoleResolver::load`]; later changes to the file are not
/// picked up.
#[derive(Clone, Debug)]
pub struct FileRoleResolver {
    path: PathBuf,
    roles: InMemoryRoleResolver,
}

impl FileRoleResolver {
    /// Reads and parses the mapping file at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let path = path.as_ref().to_path_buf();
        let contents = std::fs::read_to_string(&path).map_err(|source| MappingError::Io {
            path: path.clone(),
            source,
        })?;
        let roles = Self::from_contents(&contents).map_err(|source| MappingError::Parse {
            path: path.clone(),
            source,
        })?;
        if roles.is_empty() {
            tracing::warn!(path = %path.display(), "role mapping file does not map any job");
        }
        tracing::info!(path = %path.display(), jobs = roles.len(), "role mapping loaded");
        Ok(FileRoleResolver { path, roles })
    }

    fn from_contents(contents: &str) -> Result<InMemoryRoleResolver, ParseError> {
        let mut sections = parse::parse(contents)?;
        Ok(sections
            .remove(ROLES_SECTION)
            .unwrap_or_default()
            .into_iter()
            .collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResolveRole for FileRoleResolver {
    fn resolve(&self, job_id: &JobId) -> Result<RoleArn, RoleNotFound> {
        self.roles.resolve(job_id)
    }
}
