//! External renderer supervision.
//!
//! The renderer is a long-running subprocess. Its stdout is forwarded to
//! the caller as it arrives, stderr is drained concurrently so the child
//! never blocks on a full pipe, and the whole run is bounded by a deadline
//! after which the child is killed. The child is also killed if the
//! supervising future is dropped.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use robovid_common::config::{ExitPolicy, RenderConfig};
use robovid_common::error::{RobovidError, RobovidResult};
use robovid_content_model::AssetLayout;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Lines of renderer stderr kept for error messages.
const STDERR_TAIL_LINES: usize = 20;

/// A renderer invocation.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Renderer executable.
    pub executable: PathBuf,

    /// Composition to render.
    pub composition: String,

    /// Project/template file.
    pub project: PathBuf,

    /// Video output path.
    pub output: PathBuf,

    /// Upper bound on the run.
    pub timeout: Duration,

    /// How the exit status is judged.
    pub exit_policy: ExitPolicy,
}

impl RenderJob {
    pub fn from_config(config: &RenderConfig, layout: &AssetLayout) -> Self {
        Self {
            executable: config.renderer_binary.clone(),
            composition: config.composition.clone(),
            project: config.template_project.clone(),
            output: layout.output_path(),
            timeout: Duration::from_secs(config.timeout_secs),
            exit_policy: config.exit_policy,
        }
    }

    /// Fixed renderer argument list.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-comp".into(),
            self.composition.clone().into(),
            "-project".into(),
            self.project.clone().into_os_string(),
            "-output".into(),
            self.output.clone().into_os_string(),
        ]
    }
}

/// Lifecycle of a supervised render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    NotStarted,
    Running { pid: Option<u32> },
    Succeeded,
    Failed { exit_code: Option<i32> },
}

/// Summary of a finished render.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub exit_code: Option<i32>,
    pub stdout_bytes: u64,
    pub elapsed_secs: f64,
    /// Start time (RFC 3339).
    pub started_at: String,
    /// End time (RFC 3339).
    pub finished_at: String,
}

/// Runs one [`RenderJob`] and tracks its state.
#[derive(Debug)]
pub struct RenderSupervisor {
    job: RenderJob,
    state: RenderState,
}

impl RenderSupervisor {
    pub fn new(job: RenderJob) -> Self {
        Self {
            job,
            state: RenderState::NotStarted,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Launch the renderer, forward its stdout into `sink`, and wait for it
    /// to exit.
    pub async fn run<W>(&mut self, sink: &mut W) -> RobovidResult<RenderOutcome>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let executable = self.job.executable.display().to_string();
        let started_at = chrono::Utc::now().to_rfc3339();
        let start = Instant::now();

        let mut cmd = tokio::process::Command::new(&self.job.executable);
        cmd.args(self.job.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.state = RenderState::Failed { exit_code: None };
                return Err(RobovidError::render_process(
                    None,
                    format!("failed to start {executable}: {e}"),
                ));
            }
        };
        self.state = RenderState::Running { pid: child.id() };

        tracing::info!(
            pid = child.id(),
            executable = %executable,
            composition = %self.job.composition,
            output = %self.job.output.display(),
            "Renderer process started"
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RobovidError::render_process(None, "failed to capture renderer stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RobovidError::render_process(None, "failed to capture renderer stderr"))?;

        let mut stderr_task = tokio::spawn(drain_stderr(stderr));
        let deadline = tokio::time::Instant::now() + self.job.timeout;

        let waited = tokio::time::timeout_at(deadline, async {
            let streamed = forward_stdout(stdout, sink).await?;
            let status = child.wait().await?;
            Ok::<(u64, ExitStatus), std::io::Error>((streamed, status))
        })
        .await;

        let (stdout_bytes, status) = match waited {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                self.state = RenderState::Failed { exit_code: None };
                stderr_task.abort();
                return Err(e.into());
            }
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(error = %e, "Failed to kill renderer after deadline");
                }
                stderr_task.abort();
                self.state = RenderState::Failed { exit_code: None };
                tracing::warn!(
                    timeout_secs = self.job.timeout.as_secs(),
                    "Renderer exceeded its deadline and was terminated"
                );
                return Err(RobovidError::RenderTimedOut {
                    timeout_secs: self.job.timeout.as_secs(),
                });
            }
        };

        // A descendant of the renderer may still hold stderr open after the
        // renderer itself exited; the drain shares the same deadline.
        let stderr_tail = match tokio::time::timeout_at(deadline, &mut stderr_task).await {
            Ok(Ok(tail)) => tail,
            Ok(Err(_)) => "<failed to join stderr reader>".to_string(),
            Err(_) => {
                stderr_task.abort();
                tracing::warn!("Renderer stderr still open at deadline; stopped reading it");
                "<renderer stderr still open at deadline>".to_string()
            }
        };
        let exit_code = status.code();

        if !status.success() {
            match self.job.exit_policy {
                ExitPolicy::Strict => {
                    self.state = RenderState::Failed { exit_code };
                    return Err(RobovidError::render_process(
                        exit_code,
                        format!("{executable} exited with {status}: {}", stderr_tail.trim()),
                    ));
                }
                ExitPolicy::Lenient => {
                    tracing::warn!(
                        %status,
                        "Renderer exited unsuccessfully; accepted under lenient exit policy"
                    );
                }
            }
        }

        self.state = RenderState::Succeeded;
        let outcome = RenderOutcome {
            exit_code,
            stdout_bytes,
            elapsed_secs: start.elapsed().as_secs_f64(),
            started_at,
            finished_at: chrono::Utc::now().to_rfc3339(),
        };
        tracing::info!(
            exit_code = ?outcome.exit_code,
            elapsed_secs = outcome.elapsed_secs,
            "Renderer finished"
        );
        Ok(outcome)
    }
}

/// Copy `stdout` into `sink` chunk by chunk, flushing after each chunk.
async fn forward_stdout<R, W>(mut stdout: R, sink: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = [0u8; 8192];
    let mut total = 0u64;
    loop {
        let n = stdout.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        sink.write_all(&buf[..n]).await?;
        sink.flush().await?;
        total += n as u64;
    }
    Ok(total)
}

/// Log stderr lines and return the last few.
async fn drain_stderr<R>(stderr: R) -> String
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stderr).lines();
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                tracing::debug!(target: "robovid::renderer", "{line}");
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Ok(None) => break,
            Err(err) => {
                tail.push_back(format!("<failed to read renderer stderr: {err}>"));
                break;
            }
        }
    }
    tail.into_iter().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_identify_composition_project_and_output() {
        let layout = AssetLayout::with_defaults("/work/content");
        let job = RenderJob::from_config(&RenderConfig::default(), &layout);
        let args: Vec<String> = job
            .args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "-comp",
                "main",
                "-project",
                "templates/1/template.aep",
                "-output",
                "/work/content/output.mov",
            ]
        );
    }

    #[test]
    fn test_new_supervisor_is_not_started() {
        let layout = AssetLayout::with_defaults("content");
        let supervisor =
            RenderSupervisor::new(RenderJob::from_config(&RenderConfig::default(), &layout));
        assert_eq!(supervisor.state(), RenderState::NotStarted);
    }

    #[tokio::test]
    async fn test_drain_stderr_keeps_tail() {
        let input: String = (0..30).map(|i| format!("line {i}\n")).collect();
        let tail = drain_stderr(input.as_bytes()).await;
        assert!(tail.starts_with("line 10"));
        assert!(tail.ends_with("line 29"));
    }

    #[tokio::test]
    async fn test_forward_stdout_copies_everything() {
        let mut sink = Vec::new();
        let n = forward_stdout(&b"progress 50%\nprogress 100%\n"[..], &mut sink)
            .await
            .unwrap();
        assert_eq!(n, 26);
        assert_eq!(sink, b"progress 50%\nprogress 100%\n");
    }
}
