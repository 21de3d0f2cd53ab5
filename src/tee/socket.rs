// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

use bytes::BytesMut;
use log::{debug, error, warn};
use std::collections::HashMap;
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use crate::tee::{TeeConfig, TeeTransport, TransportError, MSG_PREFIX};

#[derive(Debug, Default)]
struct SessionTable {
    closed: bool,
    senders: HashMap<String, std_mpsc::Sender<String>>,
}

type Sessions = Arc<Mutex<SessionTable>>;

/// Connection to the enclave.
///
/// Requests are queued to a writer task; a reader task dispatches each reply
/// line to the session named by its `MsgPrex` field. Both tasks run on the
/// tokio runtime `connect` was called from, so the blocking side (the rounds)
/// can wait on the std receivers from any other thread.
#[derive(Debug)]
pub struct SocketClient {
    out_tx: mpsc::UnboundedSender<String>,
    sessions: Sessions,
}

impl SocketClient {
    pub async fn connect(endpoint: &str) -> Result<Arc<Self>, TransportError> {
        let stream = TcpStream::connect(endpoint).await?;
        stream.set_nodelay(true)?;
        debug!("connected to tee endpoint {}", endpoint);

        let (read_half, write_half) = stream.into_split();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let sessions: Sessions = Arc::new(Mutex::new(SessionTable::default()));

        tokio::spawn(write_loop(write_half, out_rx));
        tokio::spawn(read_loop(read_half, sessions.clone()));

        Ok(Arc::new(SocketClient { out_tx, sessions }))
    }

    /// Connects to the endpoint named in `config`.
    pub async fn connect_with(config: &TeeConfig) -> Result<Arc<Self>, TransportError> {
        Self::connect(&config.endpoint).await
    }

    /// Registers `msg_prefix` and returns the channel its replies arrive on.
    /// Registering the same prefix again replaces the previous channel.
    pub fn register_session(
        &self,
        msg_prefix: &str,
    ) -> Result<std_mpsc::Receiver<String>, TransportError> {
        let (tx, rx) = std_mpsc::channel();
        let mut sessions = self.sessions.lock().map_err(|_| TransportError::NotConnected)?;
        if sessions.closed {
            return Err(TransportError::NotConnected);
        }
        sessions.senders.insert(msg_prefix.to_string(), tx);
        Ok(rx)
    }

    pub fn unregister_session(&self, msg_prefix: &str) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.senders.remove(msg_prefix);
        }
    }

    pub fn is_connected(&self) -> bool {
        !self.out_tx.is_closed()
    }
}

impl TeeTransport for SocketClient {
    fn send_msg_data(&self, data: String) -> Result<(), TransportError> {
        self.out_tx.send(data).map_err(|_| TransportError::NotConnected)
    }
}

async fn write_loop(mut write_half: OwnedWriteHalf, mut out_rx: mpsc::UnboundedReceiver<String>) {
    let mut buf = BytesMut::new();
    while let Some(data) = out_rx.recv().await {
        buf.clear();
        buf.extend_from_slice(data.as_bytes());
        buf.extend_from_slice(b"\n");
        if let Err(e) = write_half.write_all(&buf).await {
            error!("tee socket write failed: {}", e);
            break;
        }
    }
    out_rx.close();
}

async fn read_loop(read_half: OwnedReadHalf, sessions: Sessions) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => dispatch(&sessions, line),
            Ok(None) => {
                debug!("tee endpoint closed the connection");
                break;
            }
            Err(e) => {
                error!("tee socket read failed: {}", e);
                break;
            }
        }
    }
    // dropping the senders wakes every waiting session with a disconnect
    if let Ok(mut sessions) = sessions.lock() {
        sessions.closed = true;
        sessions.senders.clear();
    }
}

fn dispatch(sessions: &Sessions, line: String) {
    let prefix = match serde_json::from_str::<HashMap<String, serde_json::Value>>(&line) {
        Ok(map) => match map.get(MSG_PREFIX).and_then(|v| v.as_str()) {
            Some(p) => p.to_string(),
            None => {
                warn!("tee reply without {}, dropped", MSG_PREFIX);
                return;
            }
        },
        Err(e) => {
            warn!("malformed tee reply dropped: {}", e);
            return;
        }
    };

    let sessions = match sessions.lock() {
        Ok(s) => s,
        Err(_) => return,
    };
    match sessions.senders.get(&prefix) {
        Some(tx) => {
            if tx.send(line).is_err() {
                debug!("session {} no longer listening", prefix);
            }
        }
        None => warn!("tee reply for unknown session {}", prefix),
    }
}
