use super::*;

#[test]
fn missing_tool_is_not_available() {
    assert!(!tool_available(Path::new("/nonexistent/ffmpeg-binary")));
    let tools = MediaTools {
        ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
        ffprobe: PathBuf::from("/nonexistent/ffprobe"),
    };
    assert!(!tools.ffmpeg_available());
    assert!(!tools.ffprobe_available());
}

#[test]
fn spawn_failure_is_media_error() {
    let err = run_with_timeout(
        Command::new("/nonexistent/tool"),
        "probe",
        Duration::from_secs(1),
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::Media(_)));
}

#[cfg(unix)]
#[test]
fn captures_stdout_of_finished_process() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "printf hello; printf oops >&2"]);
    let out = run_with_timeout(cmd, "shell", Duration::from_secs(10)).unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout, b"hello");
    assert_eq!(out.stderr, b"oops");
}

#[cfg(unix)]
#[test]
fn slow_process_times_out_and_is_killed() {
    let mut cmd = Command::new("sleep");
    cmd.arg("30");
    let started = Instant::now();
    let err = run_with_timeout(cmd, "sleeper", Duration::from_millis(100)).unwrap_err();
    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(10));
}
