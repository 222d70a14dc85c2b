use std::{
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
    sync::LazyLock,
};

use regex::Regex;

use crate::{
    consts,
    err::{HostIdError, HostIdResult},
};

static UUID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(consts::UUID_PATTERN).expect("UUID pattern is valid"));

/// Host ID reported by a Cassandra node. Kept exactly as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostId(String);

impl HostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Finds the first UUID-shaped token in the given text.
pub fn extract_host_id(text: &str) -> Option<HostId> {
    UUID_RE.find(text).map(|m| HostId(m.as_str().to_string()))
}

/// Captured result of an external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` to completion.
    ///
    /// Only failing to start the program is an error, the exit status
    /// is reported in [`CommandOutput`].
    async fn run(&self, program: &Path, args: &[&str]) -> HostIdResult<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait::async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[&str]) -> HostIdResult<CommandOutput> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| HostIdError::Execution {
                command: program.display().to_string(),
                reason: err.to_string(),
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Reads the local node's host ID out of `nodetool info`.
pub struct HostIdExtractor<R> {
    runner: R,
    nodetool: PathBuf,
}

impl<R: CommandRunner> HostIdExtractor<R> {
    pub fn new(runner: R, nodetool: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            nodetool: nodetool.into(),
        }
    }

    #[tracing::instrument(skip(self), fields(nodetool = %self.nodetool.display()), err)]
    pub async fn extract(&self) -> HostIdResult<HostId> {
        let command = format!("{} {}", self.nodetool.display(), consts::NODETOOL_INFO);
        let output = self
            .runner
            .run(&self.nodetool, &[consts::NODETOOL_INFO])
            .await?;

        if !output.success {
            if output.stdout.trim().is_empty() {
                let reason = match output.code {
                    Some(code) => format!("exited with code {code}: {}", output.stderr.trim()),
                    None => format!("terminated by signal: {}", output.stderr.trim()),
                };
                return Err(HostIdError::Execution { command, reason });
            }
            tracing::warn!(
                code = ?output.code,
                "{command} exited unsuccessfully, looking for the host ID in its output anyway"
            );
        }
        tracing::trace!("{command} output:\n{}", output.stdout);

        let host_id = extract_host_id(&output.stdout).ok_or(HostIdError::HostIdNotFound(command))?;
        tracing::debug!(%host_id, "Found Cassandra host ID");
        Ok(host_id)
    }
}
