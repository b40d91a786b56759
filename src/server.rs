//! TCP control server
//!
//! Each connection carries one request line and receives one reply line.
//! The `shutdown` command ends the accept loop after a short grace period
//! so the farewell cue can finish playing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use matchcue_core::{Cue, CueSender, LifecycleCue, Transport};

use crate::commands;

pub const DEFAULT_PORT: u16 = 38383;

/// Time between the shutdown reply and the end of the accept loop
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind TCP port {port}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to accept connection")]
    Accept(#[source] std::io::Error),
}

pub struct Server {
    listener: TcpListener,
    transport: Transport,
    cues: CueSender,
    shutdown_grace: Duration,
}

impl Server {
    /// Bind to `0.0.0.0:port`. Port 0 picks a free port.
    pub async fn bind(port: u16, transport: Transport, cues: CueSender) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|source| ServerError::Bind { port, source })?;

        Ok(Self {
            listener,
            transport,
            cues,
            shutdown_grace: SHUTDOWN_GRACE,
        })
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve requests until a client sends `shutdown`.
    pub async fn run(self) -> Result<(), ServerError> {
        if let Ok(addr) = self.listener.local_addr() {
            info!(%addr, "matchcue server listening");
        }
        if let Err(err) = self.cues.send(Cue::from(LifecycleCue::ServerOnline)).await {
            warn!(cue = %err.0, "Cue sink is gone, cue dropped");
        }

        let shutdown = Arc::new(Notify::new());

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted.map_err(ServerError::Accept)?;
                    debug!(%peer, "Connection accepted");

                    let connection = Connection {
                        transport: self.transport.clone(),
                        cues: self.cues.clone(),
                        shutdown: Arc::clone(&shutdown),
                        shutdown_grace: self.shutdown_grace,
                    };
                    tokio::spawn(connection.handle(stream, peer));
                }
                _ = shutdown.notified() => {
                    info!("Server stopped. gg wp");
                    return Ok(());
                }
            }
        }
    }
}

struct Connection {
    transport: Transport,
    cues: CueSender,
    shutdown: Arc<Notify>,
    shutdown_grace: Duration,
}

impl Connection {
    async fn handle(self, mut stream: TcpStream, peer: SocketAddr) {
        let (reader, mut writer) = stream.split();
        let mut lines = BufReader::new(reader).lines();

        let request = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!(%peer, "Connection closed without a request");
                return;
            }
            Err(err) => {
                error!(%peer, error = %err, "Failed to read request");
                return;
            }
        };

        info!(%peer, request = request.trim(), "Request received");
        let reply = commands::respond(&request, &self.transport, &self.cues).await;
        debug!(%peer, reply = %reply.text, "Sending reply");

        let mut response = reply.text;
        response.push('\n');
        if let Err(err) = writer.write_all(response.as_bytes()).await {
            error!(%peer, error = %err, "Failed to send reply");
        }
        if let Err(err) = writer.shutdown().await {
            debug!(%peer, error = %err, "Failed to close connection");
        }

        if reply.shutdown {
            info!(grace = ?self.shutdown_grace, "Shutdown requested");
            tokio::time::sleep(self.shutdown_grace).await;
            self.shutdown.notify_one();
        }
    }
}
