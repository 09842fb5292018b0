// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Persistence of the generated configuration

use nix::unistd::{Group, User, chown};
use std::fs::{OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};
use translate::ConfigBuilder;

/// Mode of the configuration file. It may contain secrets.
const CONFIG_MODE: u32 = 0o600;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write configuration to '{}': {}", .0.display(), .1)]
    Write(PathBuf, #[source] std::io::Error),
    #[error("Failed to look up '{0}': {1}")]
    Lookup(String, #[source] nix::Error),
    #[error("Unknown user '{0}'")]
    UnknownUser(String),
    #[error("Unknown group '{0}'")]
    UnknownGroup(String),
    #[error("Failed to set owner of '{}': {}", .0.display(), .1)]
    Chown(PathBuf, #[source] nix::Error),
}

/// Writes configurations to a file owned by a given account
#[derive(Debug)]
pub struct ConfigWriter {
    path: PathBuf,
    owner: String,
}

impl ConfigWriter {
    pub fn new(path: &Path, owner: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            owner: owner.to_owned(),
        }
    }

    /// Write `config`, replacing the file if it exists. The file is only accessible by
    /// its owner, also when it existed before.
    pub fn write(&self, config: &ConfigBuilder) -> Result<(), WriteError> {
        let fail = |e| WriteError::Write(self.path.clone(), e);
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(CONFIG_MODE)
            .open(&self.path)
            .map_err(fail)?;
        file.set_permissions(Permissions::from_mode(CONFIG_MODE))
            .map_err(fail)?;
        file.write_all(config.to_string().as_bytes()).map_err(fail)?;
        debug!("Wrote {} lines to {}", config.len(), self.path.display());
        Ok(())
    }

    /// Give the file to the user and the group named after the owner
    pub fn chown(&self) -> Result<(), WriteError> {
        let owner = &self.owner;
        let user = User::from_name(owner)
            .map_err(|e| WriteError::Lookup(owner.clone(), e))?
            .ok_or_else(|| WriteError::UnknownUser(owner.clone()))?;
        let group = Group::from_name(owner)
            .map_err(|e| WriteError::Lookup(owner.clone(), e))?
            .ok_or_else(|| WriteError::UnknownGroup(owner.clone()))?;
        chown(&self.path, Some(user.uid), Some(group.gid))
            .map_err(|e| WriteError::Chown(self.path.clone(), e))
    }

    /// Write and chown. Failures are logged only. Returns whether the file was written.
    pub fn persist(&self, config: &ConfigBuilder) -> bool {
        if let Err(e) = self.write(config) {
            error!("{e}");
            return false;
        }
        if let Err(e) = self.chown() {
            error!("{e}");
        }
        true
    }
}
