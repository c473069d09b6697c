//! Inbound listener - accept loop and per-connection line reads

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use groupcast_core::{GroupcastError, GroupcastResult};

/// Channel of received lines, in the order their reads complete
pub type InboundReceiver = mpsc::UnboundedReceiver<String>;

/// Listening socket for inbound messages
pub struct LineListener {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl LineListener {
    /// Bind the well-known local port
    ///
    /// A bind failure is fatal to the node: without its inbound channel
    /// it cannot serve its purpose, so the error propagates instead of
    /// being retried.
    pub async fn bind(addr: SocketAddr) -> GroupcastResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GroupcastError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        Ok(LineListener {
            listener,
            local_addr,
        })
    }

    /// Get local address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the accept loop
    ///
    /// Consumes the listener and returns the channel the loop feeds.
    /// Each accepted connection is handled by its own task, so a slow
    /// peer holding one connection open never stalls acceptance of the
    /// next. The loop runs until the receiver is dropped; individual
    /// accept or read errors are logged and never terminate it.
    pub fn start(self) -> InboundReceiver {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                match self.listener.accept().await {
                    Ok((stream, remote)) => {
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            match read_one_line(stream).await {
                                Ok(Some(line)) => {
                                    tracing::debug!("received line from {}", remote);
                                    let _ = tx.send(line);
                                }
                                Ok(None) => {
                                    tracing::debug!("{} closed without sending", remote);
                                }
                                Err(e) => {
                                    tracing::warn!("read error from {}: {}", remote, e);
                                }
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!("accept error: {}", e);
                    }
                }

                if tx.is_closed() {
                    break;
                }
            }
        });

        rx
    }
}

/// Read exactly one line from an inbound connection
///
/// Bytes after the first newline are never read; the connection is
/// dropped when this returns. A peer that closes before sending a
/// terminator still gets its partial line delivered, matching a sender
/// that writes and closes without a trailing newline.
async fn read_one_line(stream: TcpStream) -> std::io::Result<Option<String>> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Ok(None);
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}
