//! mpv child process driven over its JSON IPC socket.
//!
//! Launching mpv and waiting for its socket can take a while, so all
//! process and socket work happens on a worker thread. The UI side only
//! queues commands and drains events.

use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{MediaBackend, MediaEvent};

const CONNECT_RETRIES: usize = 20;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(50);
/// How often the worker checks the socket while no commands arrive.
const READ_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Debug, Clone, PartialEq)]
enum PlayerCommand {
    Load(String),
    Play,
    Pause,
    SeekToStart,
    Release,
    Shutdown,
}

pub struct MpvBackend {
    commands: Sender<PlayerCommand>,
    events: Receiver<MediaEvent>,
    worker: Option<JoinHandle<()>>,
}

impl MpvBackend {
    /// Checks that `mpv_path` runs and starts the worker thread. The
    /// player process itself starts on first load.
    pub fn launch(mpv_path: &str) -> Result<Self> {
        let status = Command::new(mpv_path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("could not run {mpv_path}"))?;
        if !status.success() {
            bail!("{mpv_path} --version exited with {status}");
        }
        Ok(Self::spawn(mpv_path))
    }

    fn spawn(mpv_path: &str) -> Self {
        let mut ipc_path = std::env::temp_dir();
        ipc_path.push(format!("vidfeed-mpv-{}.sock", std::process::id()));

        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let worker = Worker {
            mpv_path: mpv_path.to_string(),
            ipc_path,
            child: None,
            stream: None,
            buffer: String::new(),
            events: event_tx,
        };
        let handle = thread::Builder::new()
            .name("mpv".into())
            .spawn(move || worker.run(command_rx));
        let worker = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(error = %err, "could not start mpv worker");
                None
            }
        };
        Self {
            commands: command_tx,
            events: event_rx,
            worker,
        }
    }

    fn queue(&self, command: PlayerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("mpv worker has stopped"))
    }
}

impl MediaBackend for MpvBackend {
    fn load(&mut self, url: &str) -> Result<()> {
        self.queue(PlayerCommand::Load(url.to_string()))
    }

    fn play(&mut self) -> Result<()> {
        self.queue(PlayerCommand::Play)
    }

    fn pause(&mut self) -> Result<()> {
        self.queue(PlayerCommand::Pause)
    }

    fn seek_to_start(&mut self) -> Result<()> {
        self.queue(PlayerCommand::SeekToStart)
    }

    fn release(&mut self) -> Result<()> {
        self.queue(PlayerCommand::Release)
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.worker.take().is_some() {
                        events.push(MediaEvent::Error("Player stopped".into()));
                    }
                    break;
                }
            }
        }
        events
    }

    fn name(&self) -> &'static str {
        "mpv"
    }
}

impl Drop for MpvBackend {
    fn drop(&mut self) {
        let _ = self.commands.send(PlayerCommand::Shutdown);
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("mpv worker panicked");
        }
    }
}

/// Owns the mpv process and its socket. Lives on its own thread.
struct Worker {
    mpv_path: String,
    ipc_path: PathBuf,
    child: Option<Child>,
    stream: Option<UnixStream>,
    buffer: String,
    events: Sender<MediaEvent>,
}

impl Worker {
    fn run(mut self, commands: Receiver<PlayerCommand>) {
        loop {
            match commands.recv_timeout(READ_INTERVAL) {
                Ok(PlayerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(command) => {
                    if let Err(err) = self.apply(command) {
                        warn!(error = %err, "mpv command failed");
                        self.emit(MediaEvent::Error(format!("Could not load video: {err}")));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
            }
            self.read_events();
        }
        self.shutdown();
        debug!("mpv worker stopped");
    }

    fn apply(&mut self, command: PlayerCommand) -> Result<()> {
        match command {
            PlayerCommand::Load(url) => {
                self.ensure_running()?;
                self.send(json!(["set_property", "pause", true]))?;
                self.send(json!(["loadfile", url, "replace"]))
            }
            PlayerCommand::Play => self.send(json!(["set_property", "pause", false])),
            PlayerCommand::Pause => self.send(json!(["set_property", "pause", true])),
            PlayerCommand::SeekToStart => self.send(json!(["seek", 0, "absolute"])),
            PlayerCommand::Release => {
                if self.stream.is_some() {
                    let _ = self.send(json!(["quit"]));
                }
                self.shutdown();
                Ok(())
            }
            PlayerCommand::Shutdown => Ok(()),
        }
    }

    fn emit(&self, event: MediaEvent) {
        // The receiver only goes away when the backend is dropped.
        let _ = self.events.send(event);
    }

    fn is_running(&mut self) -> bool {
        match self.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(None)) => self.stream.is_some(),
            _ => false,
        }
    }

    fn ensure_running(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        self.shutdown();
        remove_socket(&self.ipc_path);

        let child = Command::new(&self.mpv_path)
            .arg(format!("--input-ipc-server={}", self.ipc_path.display()))
            .args([
                "--idle=yes",
                "--force-window=yes",
                "--keep-open=no",
                "--loop-file=inf",
                "--really-quiet",
                "--terminal=no",
                "--input-terminal=no",
                "--ytdl=no",
                "--pause",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("launch {}", self.mpv_path))?;
        debug!(pid = child.id(), ipc = %self.ipc_path.display(), "mpv started");
        self.child = Some(child);

        let stream = self.connect()?;
        stream
            .set_nonblocking(true)
            .context("set mpv IPC socket non-blocking")?;
        self.stream = Some(stream);

        self.send(json!(["observe_property", 1, "paused-for-cache"]))?;
        self.send(json!(["observe_property", 2, "time-pos"]))?;
        Ok(())
    }

    fn connect(&self) -> Result<UnixStream> {
        for _ in 0..CONNECT_RETRIES {
            match UnixStream::connect(&self.ipc_path) {
                Ok(stream) => return Ok(stream),
                Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::ConnectionRefused) => {
                    thread::sleep(CONNECT_RETRY_DELAY);
                }
                Err(err) => {
                    return Err(anyhow!(err)).with_context(|| {
                        format!("connect to mpv IPC socket {}", self.ipc_path.display())
                    });
                }
            }
        }
        bail!("mpv IPC socket {} never appeared", self.ipc_path.display())
    }

    fn send(&mut self, command: Value) -> Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            bail!("mpv is not running");
        };
        let mut line = serde_json::to_string(&json!({ "command": command }))
            .context("serialize mpv command")?;
        line.push('\n');
        stream
            .write_all(line.as_bytes())
            .context("write mpv IPC command")
    }

    fn read_events(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };

        let mut closed = false;
        let mut chunk = [0u8; 4096];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => {
                    closed = true;
                    break;
                }
                Ok(n) => self.buffer.push_str(&String::from_utf8_lossy(&chunk[..n])),
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) => {
                    warn!(error = %err, "mpv IPC read failed");
                    closed = true;
                    break;
                }
            }
        }

        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_event(line.trim()) {
                self.emit(event);
            }
        }

        if closed {
            self.shutdown();
            self.emit(MediaEvent::Error("Player window was closed".into()));
        }
    }

    fn shutdown(&mut self) {
        self.stream = None;
        self.buffer.clear();
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        remove_socket(&self.ipc_path);
    }
}

fn remove_socket(path: &Path) {
    if let Err(err) = fs::remove_file(path)
        && err.kind() != ErrorKind::NotFound
    {
        debug!(error = %err, "failed to remove mpv socket");
    }
}

/// Maps one line of mpv IPC output to an event. Command replies and
/// properties we don't observe yield `None`.
fn parse_event(line: &str) -> Option<MediaEvent> {
    let value: Value = serde_json::from_str(line).ok()?;
    match value.get("event")?.as_str()? {
        "property-change" => match value.get("name")?.as_str()? {
            "paused-for-cache" => Some(MediaEvent::Buffering(value.get("data")?.as_bool()?)),
            "time-pos" => {
                let secs = value.get("data")?.as_f64()?;
                Some(MediaEvent::Position(Duration::from_secs_f64(secs.max(0.0))))
            }
            _ => None,
        },
        "end-file" => match value.get("reason").and_then(Value::as_str) {
            Some("eof") => Some(MediaEvent::Ended),
            Some("error") => {
                let detail = value
                    .get("file_error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                Some(MediaEvent::Error(format!("Playback failed: {detail}")))
            }
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_buffering_changes() {
        let line = r#"{"event":"property-change","id":1,"name":"paused-for-cache","data":true}"#;
        assert_eq!(parse_event(line), Some(MediaEvent::Buffering(true)));
    }

    #[test]
    fn parses_position() {
        let line = r#"{"event":"property-change","id":2,"name":"time-pos","data":1.5}"#;
        assert_eq!(
            parse_event(line),
            Some(MediaEvent::Position(Duration::from_millis(1500)))
        );
    }

    #[test]
    fn position_before_playback_is_ignored() {
        let line = r#"{"event":"property-change","id":2,"name":"time-pos","data":null}"#;
        assert_eq!(parse_event(line), None);
    }

    #[test]
    fn parses_end_file_reasons() {
        assert_eq!(
            parse_event(r#"{"event":"end-file","reason":"eof"}"#),
            Some(MediaEvent::Ended)
        );
        assert_eq!(
            parse_event(r#"{"event":"end-file","reason":"error","file_error":"loading failed"}"#),
            Some(MediaEvent::Error("Playback failed: loading failed".into()))
        );
        assert_eq!(parse_event(r#"{"event":"end-file","reason":"stop"}"#), None);
    }

    #[test]
    fn ignores_command_replies_and_garbage() {
        assert_eq!(parse_event(r#"{"data":null,"error":"success"}"#), None);
        assert_eq!(parse_event("not json"), None);
    }

    #[test]
    fn launch_fails_for_missing_binary() {
        assert!(MpvBackend::launch("/nonexistent/vidfeed-test-mpv").is_err());
    }

    fn wait_for_events(backend: &mut MpvBackend) -> Vec<MediaEvent> {
        for _ in 0..100 {
            let events = backend.poll_events();
            if !events.is_empty() {
                return events;
            }
            thread::sleep(Duration::from_millis(20));
        }
        Vec::new()
    }

    #[test]
    fn load_is_queued_and_failures_arrive_as_events() {
        let mut backend = MpvBackend::spawn("/nonexistent/vidfeed-test-mpv");

        assert!(backend.load("https://cdn.example/v1.m3u8").is_ok());
        assert!(backend.play().is_ok());

        let events = wait_for_events(&mut backend);
        assert!(matches!(
            events.first(),
            Some(MediaEvent::Error(msg)) if msg.starts_with("Could not load video")
        ));
    }

    #[test]
    fn release_without_a_player_is_quiet() {
        let mut backend = MpvBackend::spawn("/nonexistent/vidfeed-test-mpv");

        assert!(backend.release().is_ok());
        thread::sleep(Duration::from_millis(100));

        assert!(backend.poll_events().is_empty());
    }
}
