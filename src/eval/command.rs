//! Evaluator that pipes each submitted line through an external program.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::Evaluator;

/// Runs `program args...` once per line with the line on stdin.
///
/// The result text is stdout followed by stderr. Spawn failures and timeouts
/// come back as `ERROR: ...` lines rather than errors.
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    banner: String,
}

impl CommandEvaluator {
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        timeout: Duration,
        banner: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            banner: banner.into(),
        }
    }

    async fn run(&self, line: &str) -> Result<String, String> {
        let mut cmd = Command::new(&self.program);
        // A timed-out call drops this future; take the child down with it.
        cmd.kill_on_drop(true);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| format!("failed to start {}: {e}", self.program.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            let payload = format!("{line}\n");
            match stdin.write_all(payload.as_bytes()).await {
                Ok(()) => {}
                // The program may exit without reading its input.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(format!("failed to write evaluator input: {e}")),
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| format!("failed to wait for evaluator: {e}"))?;
        if !output.status.success() {
            tracing::debug!(status = %output.status, "evaluator exited unsuccessfully");
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

#[async_trait]
impl Evaluator for CommandEvaluator {
    fn welcome_banner(&self) -> String {
        self.banner.clone()
    }

    async fn evaluate(&mut self, line: &str) -> String {
        match timeout(self.timeout, self.run(line)).await {
            Ok(Ok(text)) => text,
            Ok(Err(msg)) => format!("ERROR: {msg}\n"),
            Err(_) => {
                tracing::warn!(program = %self.program.display(), "evaluator timed out");
                format!(
                    "ERROR: evaluation timed out after {}\n",
                    format_duration(self.timeout)
                )
            }
        }
    }
}

/// Human-oriented duration formatting used in timeout messages.
pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs == 0 {
        return format!("{millis}ms");
    }
    if millis == 0 {
        if secs % 60 == 0 {
            return format!("{}m", secs / 60);
        }
        return format!("{secs}s");
    }
    format!("{secs}.{millis:03}s")
}
