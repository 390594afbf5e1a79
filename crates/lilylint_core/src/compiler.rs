//! Compiler invocation shim.
//!
//! Runs `lilypond` with the buffer text on stdin and returns the captured
//! stderr. A non-zero exit with diagnostics on stderr is a normal outcome,
//! not a failure.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::config::LinterConfig;
use crate::error::LintError;

/// One invocation of the external compiler for one buffer.
pub struct CompilerInvocation<'a> {
    config: &'a LinterConfig,
    /// Absolute path of the linted file; its directory becomes the working
    /// directory so the compiler resolves relative `\include`s the same way.
    source_path: &'a Path,
}

impl<'a> CompilerInvocation<'a> {
    pub fn new(config: &'a LinterConfig, source_path: &'a Path) -> Self {
        Self {
            config,
            source_path,
        }
    }

    /// Runs the compiler with `input` on stdin and returns its stderr.
    ///
    /// Output files are directed to a temporary directory that is removed
    /// when this call returns. Setting a null backend alone is not enough:
    /// input using `lilypond-book-preamble.ly` re-selects a backend and
    /// would otherwise scatter output files next to the source.
    pub async fn run(&self, input: &str) -> Result<String, LintError> {
        let output_dir = tempfile::tempdir()?;

        let mut command = Command::new(&self.config.executable_path);
        command
            .arg("--define-default=backend=null")
            .arg("--loglevel=WARNING")
            .arg(format!("--output={}", output_dir.path().display()))
            .args(&self.config.extra_args)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = self.source_path.parent() {
            command.current_dir(dir);
        }

        debug!(
            executable = %self.config.executable_path,
            source = %self.source_path.display(),
            "invoking compiler"
        );

        let mut child = command.spawn().map_err(|source| LintError::Spawn {
            executable: self.config.executable_path.clone(),
            source,
        })?;

        // Feed stdin while draining output; the compiler may fill its
        // stderr pipe before consuming all of its stdin.
        let stdin = child.stdin.take();
        let feed = async {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let (output, ()) = tokio::time::timeout(
            timeout,
            async { tokio::try_join!(child.wait_with_output(), feed) },
        )
        .await
        .map_err(|_| LintError::Timeout {
            seconds: self.config.timeout_secs,
        })??;

        debug!(status = ?output.status, stderr_len = output.stderr.len(), "compiler finished");

        String::from_utf8(output.stderr).map_err(|_| LintError::Encoding)
    }
}
