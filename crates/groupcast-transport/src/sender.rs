//! Outbound sender - one connection per peer per message

use std::net::SocketAddr;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::task::JoinSet;

use groupcast_core::{GroupcastError, GroupcastResult, PeerDirectory};

/// Deliver one line to a single peer over a fresh connection
///
/// Connect, write the text and its terminator, flush, close. The
/// connection is never reused.
pub async fn send_line(addr: SocketAddr, text: &str) -> GroupcastResult<()> {
    let mut stream = TcpStream::connect(addr)
        .await
        .map_err(|source| GroupcastError::Connect { addr, source })?;

    stream.write_all(text.as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.flush().await?;
    stream.shutdown().await?;
    Ok(())
}

/// Deliver one message to every peer in the directory, best-effort
///
/// Each per-peer send runs in its own task; a peer that is down or
/// refusing connections is logged and skipped while the remaining
/// peers are still attempted. Completion means every attempt finished,
/// not that any peer received the message - there is no acknowledgment
/// and no retry. Our own address, if present in the directory, is
/// contacted like any other peer.
pub async fn broadcast(peers: &PeerDirectory, text: &str) {
    let mut sends = JoinSet::new();

    for (index, addr) in peers.iter() {
        let text = text.to_owned();
        sends.spawn(async move {
            if let Err(e) = send_line(addr, &text).await {
                tracing::warn!("broadcast to {} ({}) failed: {}", index, addr, e);
            }
        });
    }

    while sends.join_next().await.is_some() {}
}
