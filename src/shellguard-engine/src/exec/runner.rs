//! Sandboxed command execution.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use shellguard_protocol::{ExecutionResult, FAILURE_EXIT_CODE};

use super::script::{Interpreter, materialize};
use super::{DEFAULT_TIMEOUT, MAX_OUTPUT_SIZE};

/// Grace period for reaping a killed interpreter and for drain shutdown.
/// Bounds the whole call to timeout + a fixed margin.
const KILL_GRACE: Duration = Duration::from_millis(500);

/// How a command should be run.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    /// Raw command text; written verbatim into the temp script.
    pub command: String,
    /// Hard timeout.
    pub timeout: Duration,
    /// Interpreter flavor.
    pub interpreter: Interpreter,
    /// Interpreter binary override; `None` uses the flavor default.
    pub binary: Option<String>,
}

impl ExecRequest {
    /// Request with the default timeout and interpreter.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: DEFAULT_TIMEOUT,
            interpreter: Interpreter::default(),
            binary: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = Some(binary.into());
        self
    }
}

/// Execute a command in the sandboxed interpreter.
///
/// Never returns an error: spawn failures, I/O failures, and timeouts all
/// fold into a failed [`ExecutionResult`], so callers see one shape
/// regardless of what went wrong.
pub async fn execute(request: ExecRequest) -> ExecutionResult {
    let start = Instant::now();

    if request.command.trim().is_empty() {
        return ExecutionResult::failure("empty command", start.elapsed());
    }

    // Deleted on drop, which covers every return below.
    let script = match materialize(request.interpreter, &request.command) {
        Ok(script) => script,
        Err(e) => {
            warn!(error = %e, "failed to write command script");
            return ExecutionResult::failure(
                format!("failed to write command script: {e}"),
                start.elapsed(),
            );
        }
    };

    let binary = request
        .binary
        .clone()
        .unwrap_or_else(|| request.interpreter.default_binary().to_string());

    let mut cmd = Command::new(&binary);
    cmd.args(request.interpreter.invocation_args())
        .arg(script.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Unix: own process group, so a timeout can kill the whole tree.
    // SAFETY: setpgid only changes the process group, no other state.
    #[cfg(unix)]
    unsafe {
        cmd.pre_exec(|| {
            if libc::setpgid(0, 0) == -1 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }

    // Windows: never pop up an interpreter console.
    #[cfg(windows)]
    cmd.creation_flags(0x0800_0000); // CREATE_NO_WINDOW

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(binary = %binary, error = %e, "failed to spawn interpreter");
            return ExecutionResult::failure(
                format!("failed to spawn {binary}: {e}"),
                start.elapsed(),
            );
        }
    };

    // Drain both pipes concurrently while waiting. A child that fills one
    // pipe past the OS buffer must never deadlock against us.
    let stdout_buf = Arc::new(Mutex::new(Capture::default()));
    let stderr_buf = Arc::new(Mutex::new(Capture::default()));
    let stdout_task = child
        .stdout
        .take()
        .map(|h| spawn_drain(h, Arc::clone(&stdout_buf)));
    let stderr_task = child
        .stderr
        .take()
        .map(|h| spawn_drain(h, Arc::clone(&stderr_buf)));

    let timeout_secs = request.timeout.as_secs();

    match tokio::time::timeout(request.timeout, child.wait()).await {
        Ok(wait_result) => {
            // Drains are joined only after the child has exited; bounded so
            // a grandchild holding the pipe open cannot hang the call.
            join_drains(stdout_task, stderr_task).await;
            let stdout_capture = take_buffer(&stdout_buf).await;
            let stderr_capture = take_buffer(&stderr_buf).await;
            shape_result(wait_result, &stdout_capture, &stderr_capture, start.elapsed())
        }
        Err(_) => {
            kill_process_tree(&mut child).await;
            join_drains(stdout_task, stderr_task).await;
            debug!(timeout_secs, "command killed after timeout");
            ExecutionResult::failure(
                format!("command timed out after {timeout_secs} seconds"),
                start.elapsed(),
            )
        }
    }
}

/// Captured bytes for one stream. `data` stops growing at
/// [`MAX_OUTPUT_SIZE`]; `total` keeps counting, so the truncation marker
/// can report the real stream size.
#[derive(Default)]
struct Capture {
    data: Vec<u8>,
    total: usize,
}

fn spawn_drain<R>(mut reader: R, buf: Arc<Mutex<Capture>>) -> JoinHandle<()>
where
    R: AsyncReadExt + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = [0u8; 4096];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    let mut capture = buf.lock().await;
                    capture.total += n;
                    // Past the cap, keep reading to drain the pipe but
                    // store nothing more.
                    let room = MAX_OUTPUT_SIZE.saturating_sub(capture.data.len());
                    if room > 0 {
                        capture.data.extend_from_slice(&chunk[..n.min(room)]);
                    }
                }
                Err(_) => break,
            }
        }
    })
}

async fn join_drains(stdout_task: Option<JoinHandle<()>>, stderr_task: Option<JoinHandle<()>>) {
    for task in [stdout_task, stderr_task].into_iter().flatten() {
        let abort = task.abort_handle();
        if tokio::time::timeout(KILL_GRACE, task).await.is_err() {
            // Something downstream still holds the pipe open; stop reading
            // and settle for what was captured.
            abort.abort();
        }
    }
}

async fn take_buffer(buf: &Arc<Mutex<Capture>>) -> Capture {
    std::mem::take(&mut *buf.lock().await)
}

/// Kill the interpreter and, on Unix, its whole process group.
async fn kill_process_tree(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // The child was made its own group leader at spawn.
        // SAFETY: sends a signal, touches no local state.
        unsafe {
            libc::killpg(pid as libc::pid_t, libc::SIGKILL);
        }
    }

    // kill() also reaps; bound it so a stuck reap cannot hold us past the
    // grace period. kill_on_drop remains as the backstop.
    if tokio::time::timeout(KILL_GRACE, child.kill()).await.is_err() {
        warn!("interpreter did not die within the grace period");
    }
}

fn shape_result(
    wait_result: std::io::Result<std::process::ExitStatus>,
    stdout_capture: &Capture,
    stderr_capture: &Capture,
    elapsed: Duration,
) -> ExecutionResult {
    let status = match wait_result {
        Ok(status) => status,
        Err(e) => {
            return ExecutionResult {
                success: false,
                stdout: truncate_output(stdout_capture),
                stderr: format!("failed to reap interpreter: {e}"),
                exit_code: FAILURE_EXIT_CODE,
                elapsed,
            };
        }
    };

    let exit_code = status.code().unwrap_or(FAILURE_EXIT_CODE);
    let stdout = truncate_output(stdout_capture);
    let mut stderr = truncate_output(stderr_capture);

    // Success means a clean exit AND a silent error channel.
    let success = exit_code == 0 && stderr_capture.total == 0;
    if !success && stderr_capture.total == 0 {
        stderr = format!("command exited with code {exit_code}");
    }

    ExecutionResult {
        success,
        stdout,
        stderr,
        exit_code,
        elapsed,
    }
}

fn truncate_output(capture: &Capture) -> String {
    let s = String::from_utf8_lossy(&capture.data);
    // Lossy conversion can shift lengths, so check both the stream size
    // and the rendered size.
    if capture.total > MAX_OUTPUT_SIZE || s.len() > MAX_OUTPUT_SIZE {
        let mut cut = MAX_OUTPUT_SIZE.min(s.len());
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}...\n[output truncated, {} bytes total]",
            &s[..cut],
            capture.total
        )
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn posix(command: &str) -> ExecRequest {
        ExecRequest::new(command)
            .with_interpreter(Interpreter::Posix)
            .with_timeout(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_execute_captures_stdout() {
        let result = execute(posix("echo hello")).await;
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_stderr_output_means_failure() {
        let result = execute(posix("echo oops 1>&2")).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, 0);
        assert!(result.stderr.contains("oops"));
    }

    #[tokio::test]
    async fn test_silent_nonzero_exit_synthesizes_message() {
        let result = execute(posix("exit 3")).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
        assert!(result.stderr.contains("exited with code 3"));
    }

    #[tokio::test]
    async fn test_empty_command_fails_without_spawning() {
        let result = execute(ExecRequest::new("   ")).await;
        assert!(!result.success);
        assert_eq!(result.stderr, "empty command");
        assert_eq!(result.exit_code, FAILURE_EXIT_CODE);
    }

    #[tokio::test]
    async fn test_spawn_failure_folds_into_result() {
        let request = posix("echo hi").with_binary("shellguard-no-such-binary");
        let result = execute(request).await;
        assert!(!result.success);
        assert_eq!(result.exit_code, FAILURE_EXIT_CODE);
        assert!(result.stderr.contains("failed to spawn"));
    }

    #[tokio::test]
    async fn test_timeout_kills_and_reports_duration() {
        let start = Instant::now();
        let result = execute(posix("sleep 30").with_timeout(Duration::from_secs(1))).await;
        // Hard timeout plus the bounded grace margins, nowhere near 30s.
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(!result.success);
        assert_eq!(result.exit_code, FAILURE_EXIT_CODE);
        assert!(result.stderr.contains("timed out after 1"));
        assert!(result.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_releases_temp_script() {
        // Scripts from concurrently running tests share the temp dir, so
        // identify ours by a marker unique to this run.
        let marker = format!("timeout_cleanup_{}", std::process::id());
        let command = format!("# {marker}\nsleep 30");
        let result = execute(posix(&command).with_timeout(Duration::from_secs(1))).await;
        assert!(!result.success);
        assert!(result.stderr.contains("timed out"));

        for entry in std::fs::read_dir(std::env::temp_dir()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !name.starts_with("shellguard-") {
                continue;
            }
            // Other tests may delete their scripts mid-scan; skip those.
            if let Ok(body) = std::fs::read_to_string(&path) {
                assert!(
                    !body.contains(&marker),
                    "temp script survived the timeout: {}",
                    path.display()
                );
            }
        }
    }

    #[tokio::test]
    async fn test_large_output_on_both_streams_does_not_deadlock() {
        // Several hundred KiB per stream, far beyond the OS pipe buffer.
        // Sequential drain-after-wait would deadlock here.
        let script = "i=0\n\
                      while [ \"$i\" -lt 20000 ]; do\n\
                      echo \"stdout line $i\"\n\
                      echo \"stderr line $i\" 1>&2\n\
                      i=$((i+1))\n\
                      done";
        let result = execute(posix(script)).await;
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.len() > 100_000);
        assert!(result.stderr.len() > 100_000);
        assert!(result.stdout.contains("stdout line 19999"));
        assert!(result.stderr.contains("stderr line 19999"));
    }

    #[tokio::test]
    async fn test_runaway_stdout_is_capped_and_marked() {
        // ~2 MiB on stdout: 16500 lines of 127 chars plus a newline.
        // The capture must stay near the cap while the marker reports
        // the full stream size.
        let line = "x".repeat(127);
        let script = format!(
            "i=0\n\
             while [ \"$i\" -lt 16500 ]; do\n\
             echo \"{line}\"\n\
             i=$((i+1))\n\
             done"
        );
        let result = execute(posix(&script)).await;
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.len() <= MAX_OUTPUT_SIZE + 100);
        assert!(
            result
                .stdout
                .contains("[output truncated, 2112000 bytes total]")
        );
    }

    #[tokio::test]
    async fn test_elapsed_is_measured() {
        let result = execute(posix("sleep 0.2")).await;
        assert!(result.elapsed >= Duration::from_millis(100));
    }

    #[test]
    fn test_truncate_output_marks_overflow() {
        let over = Capture {
            data: vec![b'a'; MAX_OUTPUT_SIZE],
            total: MAX_OUTPUT_SIZE + 10,
        };
        let s = truncate_output(&over);
        assert!(s.contains(&format!("[output truncated, {} bytes total]", over.total)));
        assert!(s.len() < MAX_OUTPUT_SIZE + 100);

        let small = Capture {
            data: b"tiny".to_vec(),
            total: 4,
        };
        assert_eq!(truncate_output(&small), "tiny");
    }
}
