use crate::document::file_extension;
use crate::error::{AnalysisError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Subcommand of the analysis tool that scores text read from stdin.
pub const CHECK_SUBCOMMAND: &str = "check";

/// Everything needed to run the analysis tool once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub stdin: Arc<str>,
}

impl ToolInvocation {
    /// `<program> [leading_args..] check -f <ext>`, run next to `document_path`.
    pub fn check(
        program: &Path,
        leading_args: &[String],
        document_path: &Path,
        stdin: Arc<str>,
    ) -> Self {
        let mut args = leading_args.to_vec();
        args.extend([
            CHECK_SUBCOMMAND.to_string(),
            "-f".to_string(),
            file_extension(document_path),
        ]);

        Self {
            program: program.to_path_buf(),
            args,
            working_dir: document_path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(Path::to_path_buf),
            stdin,
        }
    }
}

/// Boundary to the external analysis tool.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs the tool and returns its standard output.
    async fn run(&self, invocation: ToolInvocation) -> Result<String>;
}

/// Runs the tool as a child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: ToolInvocation) -> Result<String> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| AnalysisError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

        let Some(mut stdin) = child.stdin.take() else {
            let _ = child.kill().await;
            return Err(AnalysisError::StdinUnavailable(invocation.program));
        };

        let text = invocation.stdin;
        let feed = async move {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await
        };

        // Feed stdin while draining stdout/stderr so neither side can block on a full pipe.
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(AnalysisError::Execution {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        match fed {
            Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!(program = %invocation.program.display(), "tool exited before reading all input");
            }
            other => other?,
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
