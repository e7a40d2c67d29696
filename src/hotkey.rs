//! Global toggle bridge.
//!
//! Compositors bind keys to commands, so the global hotkey runs `glasspen --toggle`,
//! which writes a command line to the running overlay's socket.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

const SOCKET_NAME: &str = "glasspen.sock";
const CLIENT_READ_TIMEOUT: Duration = Duration::from_millis(250);

pub type HotkeyResult<T> = std::result::Result<T, HotkeyError>;

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("XDG_RUNTIME_DIR is not set")]
    MissingRuntimeDir,
    #[error("another overlay is already listening on {path}")]
    AlreadyRunning { path: PathBuf },
    #[error("failed to bind hotkey socket {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no running overlay at {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to send hotkey command: {0}")]
    Send(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyTrigger {
    ToggleMode,
    Quit,
}

impl HotkeyTrigger {
    pub const fn command(self) -> &'static str {
        match self {
            Self::ToggleMode => "toggle",
            Self::Quit => "quit",
        }
    }

    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "toggle" => Some(Self::ToggleMode),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

pub fn socket_path() -> HotkeyResult<PathBuf> {
    socket_path_in(std::env::var_os("XDG_RUNTIME_DIR").map(PathBuf::from))
}

fn socket_path_in(runtime_dir: Option<PathBuf>) -> HotkeyResult<PathBuf> {
    runtime_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(SOCKET_NAME))
        .ok_or(HotkeyError::MissingRuntimeDir)
}

/// Accepts trigger commands on a Unix socket from a background thread.
#[derive(Debug)]
pub struct HotkeyListener {
    path: PathBuf,
    receiver: mpsc::Receiver<HotkeyTrigger>,
    _accept_thread: JoinHandle<()>,
}

impl HotkeyListener {
    pub fn bind_default() -> HotkeyResult<Self> {
        Self::bind(socket_path()?)
    }

    /// Binds `path`, replacing a stale socket left by a crashed instance.
    pub fn bind(path: PathBuf) -> HotkeyResult<Self> {
        let listener = match UnixListener::bind(&path) {
            Ok(listener) => listener,
            Err(err) if err.kind() == ErrorKind::AddrInUse => {
                if UnixStream::connect(&path).is_ok() {
                    return Err(HotkeyError::AlreadyRunning { path });
                }
                tracing::debug!(path = %path.display(), "removing stale hotkey socket");
                let _ = std::fs::remove_file(&path);
                UnixListener::bind(&path).map_err(|source| HotkeyError::Bind {
                    path: path.clone(),
                    source,
                })?
            }
            Err(source) => return Err(HotkeyError::Bind { path, source }),
        };

        let (tx, receiver) = mpsc::channel();
        let accept_thread = std::thread::spawn(move || accept_loop(listener, tx));
        tracing::info!(path = %path.display(), "hotkey socket listening");
        Ok(Self {
            path,
            receiver,
            _accept_thread: accept_thread,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_recv(&self) -> Result<HotkeyTrigger, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    #[cfg(test)]
    fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<HotkeyTrigger, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn accept_loop(listener: UnixListener, tx: mpsc::Sender<HotkeyTrigger>) {
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(?err, "hotkey socket accept failed");
                continue;
            }
        };
        let Some(line) = read_command(stream) else {
            continue;
        };
        match HotkeyTrigger::parse(&line) {
            Some(trigger) => {
                if tx.send(trigger).is_err() {
                    return;
                }
            }
            None => tracing::warn!(command = line.trim(), "unknown hotkey command"),
        }
    }
}

/// One command line per connection; silent clients time out.
fn read_command(stream: UnixStream) -> Option<String> {
    if let Err(err) = stream.set_read_timeout(Some(CLIENT_READ_TIMEOUT)) {
        tracing::warn!(?err, "failed to set hotkey client timeout");
        return None;
    }
    let mut line = String::new();
    match BufReader::new(stream).read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(err) => {
            tracing::debug!(?err, "dropping hotkey client");
            None
        }
    }
}

pub fn send(trigger: HotkeyTrigger) -> HotkeyResult<()> {
    send_to(&socket_path()?, trigger)
}

pub fn send_to(path: &Path, trigger: HotkeyTrigger) -> HotkeyResult<()> {
    let mut stream = UnixStream::connect(path).map_err(|source| HotkeyError::Connect {
        path: path.to_path_buf(),
        source,
    })?;
    writeln!(stream, "{}", trigger.command())?;
    stream.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn fresh_socket_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        std::env::temp_dir().join(format!("glasspen-{name}-{}-{nanos}.sock", std::process::id()))
    }

    #[test]
    fn parse_accepts_known_commands() {
        assert_eq!(HotkeyTrigger::parse("toggle\n"), Some(HotkeyTrigger::ToggleMode));
        assert_eq!(HotkeyTrigger::parse("  QUIT "), Some(HotkeyTrigger::Quit));
        assert_eq!(HotkeyTrigger::parse("draw"), None);
        for trigger in [HotkeyTrigger::ToggleMode, HotkeyTrigger::Quit] {
            assert_eq!(HotkeyTrigger::parse(trigger.command()), Some(trigger));
        }
    }

    #[test]
    fn socket_path_requires_runtime_dir() {
        assert_eq!(
            socket_path_in(Some(PathBuf::from("/run/user/1000"))).expect("path"),
            PathBuf::from("/run/user/1000/glasspen.sock")
        );
        assert!(matches!(
            socket_path_in(None),
            Err(HotkeyError::MissingRuntimeDir)
        ));
        assert!(matches!(
            socket_path_in(Some(PathBuf::new())),
            Err(HotkeyError::MissingRuntimeDir)
        ));
    }

    #[test]
    fn listener_delivers_sent_triggers() {
        let path = fresh_socket_path("deliver");
        let listener = HotkeyListener::bind(path.clone()).expect("bind");

        send_to(&path, HotkeyTrigger::ToggleMode).expect("send toggle");
        send_to(&path, HotkeyTrigger::Quit).expect("send quit");

        let timeout = Duration::from_secs(2);
        assert_eq!(listener.recv_timeout(timeout), Ok(HotkeyTrigger::ToggleMode));
        assert_eq!(listener.recv_timeout(timeout), Ok(HotkeyTrigger::Quit));
    }

    #[test]
    fn silent_client_does_not_block_later_triggers() {
        let path = fresh_socket_path("silent");
        let listener = HotkeyListener::bind(path.clone()).expect("bind");

        let _idle = UnixStream::connect(&path).expect("idle client");
        send_to(&path, HotkeyTrigger::ToggleMode).expect("send toggle");

        assert_eq!(
            listener.recv_timeout(Duration::from_secs(2)),
            Ok(HotkeyTrigger::ToggleMode)
        );
    }

    #[test]
    fn second_listener_reports_running_instance() {
        let path = fresh_socket_path("running");
        let _first = HotkeyListener::bind(path.clone()).expect("bind");
        assert!(matches!(
            HotkeyListener::bind(path),
            Err(HotkeyError::AlreadyRunning { .. })
        ));
    }

    #[test]
    fn bind_replaces_stale_socket_file() {
        let path = fresh_socket_path("stale");
        drop(UnixListener::bind(&path).expect("stale bind"));
        assert!(path.exists());

        let listener = HotkeyListener::bind(path.clone()).expect("rebind");
        assert_eq!(listener.path(), path.as_path());
        drop(listener);
        assert!(!path.exists());
    }

    #[test]
    fn send_without_listener_fails_with_connect_error() {
        let path = fresh_socket_path("missing");
        assert!(matches!(
            send_to(&path, HotkeyTrigger::ToggleMode),
            Err(HotkeyError::Connect { .. })
        ));
    }
}
