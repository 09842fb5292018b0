// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Reload of FRR with a generated configuration

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("Failed to run '{}': {}", .0.display(), .1)]
    Spawn(PathBuf, #[source] std::io::Error),
    #[error("'{}' was terminated by a signal", .0.display())]
    Signaled(PathBuf),
}

/// Runs `<program> -f <config>`
#[derive(Debug)]
pub struct Reloader {
    program: PathBuf,
}

impl Reloader {
    pub fn new(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
        }
    }

    /// Ask FRR to load `config`. Returns the exit code of the reload program.
    pub fn reload(&self, config: &Path) -> Result<i32, ReloadError> {
        info!(
            "Reloading {} with {}",
            config.display(),
            self.program.display()
        );
        let status = Command::new(&self.program)
            .arg("-f")
            .arg(config)
            .status()
            .map_err(|e| ReloadError::Spawn(self.program.clone(), e))?;

        let code = status
            .code()
            .ok_or_else(|| ReloadError::Signaled(self.program.clone()))?;
        if code != 0 {
            error!("Reload of {} failed with code {code}", config.display());
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reload_exit_code() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("frr.conf");
        // sh -f runs the file as a script
        fs::write(&config, "exit 3\n").unwrap();
        let code = Reloader::new(Path::new("/bin/sh")).reload(&config).unwrap();
        assert_eq!(code, 3);

        fs::write(&config, "true\n").unwrap();
        let code = Reloader::new(Path::new("/bin/sh")).reload(&config).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_reload_signaled() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("frr.conf");
        fs::write(&config, "kill -9 $$\n").unwrap();
        let result = Reloader::new(Path::new("/bin/sh")).reload(&config);
        assert!(matches!(result, Err(ReloadError::Signaled(_))));
    }

    #[test]
    fn test_reload_missing_program() {
        let result = Reloader::new(Path::new("/nonexistent/frrcfg/vtysh"))
            .reload(Path::new("/etc/vyatta-routing/frr.conf"));
        assert!(matches!(result, Err(ReloadError::Spawn(_, _))));
    }
}
