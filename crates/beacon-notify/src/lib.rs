// # Desktop Notifications
//
// This crate delivers alerts through a desktop notification command
// (`dunstify` by default):
//
// ```text
// dunstify -a <app_tag> <title> <body>
// ```
//
// `PathProbe` answers, once at startup, whether the command is on `PATH`.
// `CommandNotifier` runs it once per alert, bounded by a timeout. A missing
// command, a non-zero exit and a hung command are all returned as errors;
// the alert dispatcher logs them and moves on.

use async_trait::async_trait;
use beacon_core::traits::{CapabilityProbe, Notifier};
use beacon_core::{AlertConfig, Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// Notifier that runs an external notification command
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    /// Program name or path
    program: String,

    /// Application tag passed with `-a`
    app_tag: String,

    /// Bound on one invocation
    timeout: Duration,
}

impl CommandNotifier {
    /// Create a notifier for `program`
    pub fn new(program: impl Into<String>, app_tag: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            app_tag: app_tag.into(),
            timeout,
        }
    }

    fn command(&self, title: &str, body: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-a")
            .arg(&self.app_tag)
            .arg(title)
            .arg(body)
            .kill_on_drop(true);
        cmd
    }
}

impl From<&AlertConfig> for CommandNotifier {
    fn from(config: &AlertConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.app_tag.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        let status = match tokio::time::timeout(self.timeout, self.command(title, body).status())
            .await
        {
            Ok(Ok(status)) => status,
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::tool_unavailable(format!(
                    "'{}' command not found",
                    self.program
                )));
            }
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => {
                return Err(Error::timeout(format!(
                    "'{}' did not finish within {:?}",
                    self.program, self.timeout
                )));
            }
        };

        if !status.success() {
            return Err(Error::unexpected(format!(
                "'{}' exited with {}",
                self.program, status
            )));
        }

        tracing::debug!("Notification sent via {}", self.program);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Capability probe that looks a program up on `PATH`
#[derive(Debug, Clone)]
pub struct PathProbe {
    program: String,
}

impl PathProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Full path of the program, if it can be found
    pub fn locate(&self) -> Option<PathBuf> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return is_executable(program).then(|| program.to_path_buf());
        }

        let paths = std::env::var_os("PATH")?;
        std::env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate))
    }
}

/// A regular file with at least one execute bit set
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

impl From<&AlertConfig> for PathProbe {
    fn from(config: &AlertConfig) -> Self {
        Self::new(config.program.clone())
    }
}

impl CapabilityProbe for PathProbe {
    fn capability(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        match self.locate() {
            Some(path) => {
                tracing::debug!("Found {} at {}", self.program, path.display());
                true
            }
            None => false,
        }
    }
}
