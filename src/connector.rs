use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a single non-blocking poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// No connection; nothing was attempted.
    Disconnected,
    /// Connected, no complete payload pending.
    Idle,
    /// This many payloads were forwarded to the overlays.
    Forwarded(usize),
}

/// Seam to the chat service. `do_read` must be best-effort and return
/// immediately whether or not data is available; the poll loop calls it on
/// every tick.
pub trait Connector: Send {
    fn connect(&mut self) -> bool;
    fn do_read(&mut self) -> ReadOutcome;
}

/// Matches the overlay refresh rate.
pub const POLL_INTERVAL: Duration = Duration::from_micros(16_667);

/// Roughly five seconds between reconnection attempts.
const RECONNECT_TICKS: u32 = 300;

/// Drive the connector at ~60 Hz on a dedicated thread until `shutdown`
/// flips. A lost connection is retried on a coarse backoff counted in ticks.
pub fn spawn_poll_loop(mut connector: Box<dyn Connector>, shutdown: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        connector.connect();
        let mut idle_ticks = 0u32;
        while !shutdown.load(Ordering::SeqCst) {
            if connector.do_read() == ReadOutcome::Disconnected {
                idle_ticks += 1;
                if idle_ticks >= RECONNECT_TICKS {
                    idle_ticks = 0;
                    connector.connect();
                }
            } else {
                idle_ticks = 0;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    });
}

/// Wire framing shared with the chat client: a little-endian
/// `[op: u32][len: u32]` header followed by `len` bytes of JSON payload.
mod frame {
    pub const OP_HANDSHAKE: u32 = 0;
    pub const OP_FRAME: u32 = 1;

    const HEADER_LEN: usize = 8;
    const MAX_PAYLOAD_LEN: usize = 1 << 20;

    /// The stream can no longer be framed; the connection must be dropped.
    #[derive(Debug, PartialEq, Eq)]
    pub struct CorruptStream;

    pub fn encode(op: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
        out.extend_from_slice(&op.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// Split complete frames off the front of `buffer`, leaving any trailing
    /// partial frame in place. Returns the payloads of OP_FRAME messages;
    /// other opcodes are transport chatter and dropped. A payload length
    /// beyond `MAX_PAYLOAD_LEN` means the stream is corrupt; the buffer is
    /// discarded and the caller should reconnect.
    pub fn drain(buffer: &mut Vec<u8>) -> Result<Vec<String>, CorruptStream> {
        let mut payloads = Vec::new();
        let mut offset = 0;

        while buffer.len() - offset >= HEADER_LEN {
            let op = u32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap());
            let len =
                u32::from_le_bytes(buffer[offset + 4..offset + 8].try_into().unwrap()) as usize;

            if len > MAX_PAYLOAD_LEN {
                buffer.clear();
                return Err(CorruptStream);
            }
            if buffer.len() - offset - HEADER_LEN < len {
                break;
            }

            let start = offset + HEADER_LEN;
            if op == OP_FRAME {
                payloads.push(String::from_utf8_lossy(&buffer[start..start + len]).into_owned());
            }
            offset = start + len;
        }

        buffer.drain(..offset);
        Ok(payloads)
    }
}

#[cfg(unix)]
pub use unix_ipc::IpcConnector;

#[cfg(unix)]
mod unix_ipc {
    use std::io::{ErrorKind, Read, Write};
    use std::os::unix::net::UnixStream;
    use std::path::PathBuf;

    use tauri::{AppHandle, Emitter};

    use super::frame;
    use super::{Connector, ReadOutcome};
    use crate::overlay;

    /// StreamKit overlay application id; the service accepts it for
    /// read-only overlay sessions.
    const CLIENT_ID: &str = "207646673902501888";

    /// Transport-level connection to the chat service's local IPC socket.
    /// Payloads are forwarded verbatim to the overlay windows; what they
    /// mean is the overlays' business.
    pub struct IpcConnector {
        app: AppHandle,
        stream: Option<UnixStream>,
        buffer: Vec<u8>,
    }

    impl IpcConnector {
        pub fn new(app: AppHandle) -> Self {
            Self {
                app,
                stream: None,
                buffer: Vec::new(),
            }
        }

        fn socket_candidates() -> Vec<PathBuf> {
            let base = std::env::var_os("XDG_RUNTIME_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir);
            (0..10).map(|i| base.join(format!("discord-ipc-{i}"))).collect()
        }

        fn forward(&self, payload: &str) {
            let value: serde_json::Value = match serde_json::from_str(payload) {
                Ok(value) => value,
                Err(_) => {
                    log::debug!("Discarding non-JSON connector frame");
                    return;
                }
            };
            let _ = self
                .app
                .emit_to(overlay::VOICE_OVERLAY_LABEL, "connector-payload", value.clone());
            let _ = self
                .app
                .emit_to(overlay::TEXT_OVERLAY_LABEL, "connector-payload", value);
        }

        fn drop_connection(&mut self) {
            self.stream = None;
            self.buffer.clear();
        }
    }

    impl Connector for IpcConnector {
        fn connect(&mut self) -> bool {
            for path in Self::socket_candidates() {
                let mut stream = match UnixStream::connect(&path) {
                    Ok(stream) => stream,
                    Err(_) => continue,
                };

                let handshake = format!("{{\"v\":1,\"client_id\":\"{CLIENT_ID}\"}}");
                if stream
                    .write_all(&frame::encode(frame::OP_HANDSHAKE, handshake.as_bytes()))
                    .is_err()
                {
                    continue;
                }
                if stream.set_nonblocking(true).is_err() {
                    continue;
                }

                log::info!("Connected to chat IPC socket at {}", path.display());
                self.buffer.clear();
                self.stream = Some(stream);
                return true;
            }

            log::debug!("No chat IPC socket available");
            false
        }

        fn do_read(&mut self) -> ReadOutcome {
            let Some(stream) = self.stream.as_mut() else {
                return ReadOutcome::Disconnected;
            };

            let mut chunk = [0u8; 4096];
            loop {
                match stream.read(&mut chunk) {
                    Ok(0) => {
                        log::info!("Chat IPC connection closed");
                        self.drop_connection();
                        return ReadOutcome::Disconnected;
                    }
                    Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                    Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                    Err(err) => {
                        log::warn!("Chat IPC read failed: {err}");
                        self.drop_connection();
                        return ReadOutcome::Disconnected;
                    }
                }
            }

            let payloads = match frame::drain(&mut self.buffer) {
                Ok(payloads) => payloads,
                Err(frame::CorruptStream) => {
                    log::warn!("Corrupt chat IPC stream, reconnecting");
                    self.drop_connection();
                    return ReadOutcome::Disconnected;
                }
            };

            if payloads.is_empty() {
                return ReadOutcome::Idle;
            }
            let count = payloads.len();
            for payload in payloads {
                self.forward(&payload);
            }
            ReadOutcome::Forwarded(count)
        }
    }
}

#[cfg(not(unix))]
pub use stub_ipc::IpcConnector;

#[cfg(not(unix))]
mod stub_ipc {
    use tauri::AppHandle;

    use super::{Connector, ReadOutcome};

    /// The chat service exposes its IPC endpoint as a Unix socket; on other
    /// platforms the overlay simply stays idle.
    pub struct IpcConnector;

    impl IpcConnector {
        pub fn new(_app: AppHandle) -> Self {
            Self
        }
    }

    impl Connector for IpcConnector {
        fn connect(&mut self) -> bool {
            false
        }

        fn do_read(&mut self) -> ReadOutcome {
            ReadOutcome::Disconnected
        }
    }
}
