use crate::foundation::error::{ReelError, ReelResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Locations of the external media tools.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MediaTools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for MediaTools {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl MediaTools {
    /// Return `true` when `ffmpeg` can be invoked.
    pub fn ffmpeg_available(&self) -> bool {
        tool_available(&self.ffmpeg)
    }

    /// Return `true` when `ffprobe` can be invoked.
    pub fn ffprobe_available(&self) -> bool {
        tool_available(&self.ffprobe)
    }
}

/// Return `true` when `bin -version` runs successfully.
pub fn tool_available(bin: &Path) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub(crate) fn drain<R: Read + Send + 'static>(mut r: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

pub(crate) fn join_drain(
    handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    what: &str,
) -> ReelResult<Vec<u8>> {
    match handle {
        Some(h) => h
            .join()
            .map_err(|_| ReelError::media(format!("{what} drain thread panicked")))?
            .map_err(|e| ReelError::media(format!("{what} read failed: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Kill a child and reap it; errors are ignored because the process may already be gone.
pub(crate) fn kill_quietly(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Run `cmd` to completion, killing it once `timeout` elapses.
///
/// stdout and stderr are captured; stdin is closed.
pub fn run_with_timeout(mut cmd: Command, what: &str, timeout: Duration) -> ReelResult<Output> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd
        .spawn()
        .map_err(|e| ReelError::media(format!("failed to spawn {what}: {e}")))?;
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                kill_quietly(&mut child);
                let _ = join_drain(stdout, what);
                let _ = join_drain(stderr, what);
                tracing::warn!(what, ?timeout, "child process timed out and was killed");
                return Err(ReelError::timeout(what, timeout));
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(e) => {
                kill_quietly(&mut child);
                return Err(ReelError::media(format!("failed to wait for {what}: {e}")));
            }
        }
    };

    Ok(Output {
        status,
        stdout: join_drain(stdout, what)?,
        stderr: join_drain(stderr, what)?,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/media/process.rs"]
mod tests;
