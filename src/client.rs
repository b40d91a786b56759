//! One-shot client for a running server

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to the matchcue server at {addr}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send request")]
    Send(#[source] std::io::Error),

    #[error("failed to read reply")]
    Receive(#[source] std::io::Error),

    #[error("server closed the connection without replying")]
    NoReply,
}

/// Send one command to the server on `localhost:port` and return its reply.
pub async fn send_request(port: u16, message: &str) -> Result<String, ClientError> {
    send_request_to(&format!("localhost:{port}"), message).await
}

pub async fn send_request_to(addr: &str, message: &str) -> Result<String, ClientError> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.to_string(),
            source,
        })?;
    debug!(addr, request = message, "Connected");

    let (reader, mut writer) = stream.split();
    let request = format!("{}\n", message.trim());
    writer
        .write_all(request.as_bytes())
        .await
        .map_err(ClientError::Send)?;

    let mut lines = BufReader::new(reader).lines();
    match lines.next_line().await.map_err(ClientError::Receive)? {
        Some(reply) => Ok(reply),
        None => Err(ClientError::NoReply),
    }
}
