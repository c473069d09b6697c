//! Groupcast Node - listener lifecycle and the send entry point

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::mpsc;

use groupcast_core::{GroupcastError, GroupcastResult, MessageLog, PeerDirectory, Seq};
use groupcast_transport::{broadcast, LineListener};

/// Node configuration, immutable after start
#[derive(Clone, Debug)]
pub struct NodeConfig {
    /// Well-known local listening address
    pub listen_addr: SocketAddr,
    /// Fixed peer membership, broadcast targets
    pub peers: PeerDirectory,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            listen_addr: ([127, 0, 0, 1], 10000).into(),
            peers: PeerDirectory::default(),
        }
    }
}

/// A message handed to the embedding layer, in receipt order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub seq: Seq,
    pub text: String,
}

/// Channel of deliveries consumed by the embedding layer
pub type DeliveryReceiver = mpsc::UnboundedReceiver<Delivery>;

/// The groupcast node - a running listener plus the broadcast entry
/// point
///
/// Once started the node runs for the remainder of the process; there
/// is no graceful stop.
pub struct Node {
    local_addr: SocketAddr,
    peers: Arc<PeerDirectory>,
    log: Arc<MessageLog>,
    deliveries: Option<DeliveryReceiver>,
}

impl Node {
    /// Bind the listener and start serving
    ///
    /// The only fatal error: if the listening address cannot be bound
    /// the node cannot function and the error propagates to the
    /// caller. Everything after a successful bind is best-effort.
    pub async fn start(config: NodeConfig) -> GroupcastResult<Self> {
        let listener = LineListener::bind(config.listen_addr).await?;
        let local_addr = listener.local_addr();
        tracing::info!("node listening on {}", local_addr);

        let mut inbound = listener.start();
        let log = Arc::new(MessageLog::new());
        let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();

        // Receipt task: the single writer to the log. The unbounded
        // channel send never blocks, so a slow delivery consumer
        // cannot back up into the accept loop.
        let receipt_log = Arc::clone(&log);
        tokio::spawn(async move {
            while let Some(text) = inbound.recv().await {
                let seq = receipt_log.append(text.clone());
                tracing::debug!("received message {}", seq);
                if delivery_tx.send(Delivery { seq, text }).is_err() {
                    // Consumer gone; keep logging receipts regardless.
                }
            }
        });

        Ok(Node {
            local_addr,
            peers: Arc::new(config.peers),
            log,
            deliveries: Some(delivery_rx),
        })
    }

    /// Broadcast a message to every peer, fire-and-forget
    ///
    /// Returns as soon as the fan-out task is dispatched; per-peer
    /// failures are logged inside the task and never reported back.
    /// The text must be a single line, since the wire format carries
    /// one newline-terminated message per connection.
    pub fn send_message(&self, text: &str) -> GroupcastResult<()> {
        if text.contains(['\n', '\r']) {
            return Err(GroupcastError::EmbeddedNewline);
        }

        let peers = Arc::clone(&self.peers);
        let text = text.to_owned();
        tokio::spawn(async move {
            broadcast(&peers, &text).await;
        });
        Ok(())
    }

    /// Take the delivery channel
    ///
    /// Deliveries arrive in receipt order with their assigned
    /// sequences. The channel can be taken once; subsequent calls
    /// return `None`.
    pub fn deliveries(&mut self) -> Option<DeliveryReceiver> {
        self.deliveries.take()
    }

    /// Get the shared message log
    pub fn log(&self) -> Arc<MessageLog> {
        Arc::clone(&self.log)
    }

    /// Get the bound listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Get the peer directory
    pub fn peers(&self) -> &PeerDirectory {
        &self.peers
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;

    use super::*;

    async fn start_node(peers: PeerDirectory) -> Node {
        Node::start(NodeConfig {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            peers,
        })
        .await
        .unwrap()
    }

    async fn push_line(addr: SocketAddr, text: &str) {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(text.as_bytes()).await.unwrap();
        stream.write_all(b"\n").await.unwrap();
        stream.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_start_binds_and_reports_addr() {
        let node = start_node(PeerDirectory::default()).await;
        assert_ne!(node.local_addr().port(), 0);
        assert!(node.log().is_empty());
    }

    #[tokio::test]
    async fn test_bind_conflict_is_fatal() {
        let node = start_node(PeerDirectory::default()).await;

        let result = Node::start(NodeConfig {
            listen_addr: node.local_addr(),
            peers: PeerDirectory::default(),
        })
        .await;
        assert!(matches!(result, Err(GroupcastError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_receipt_assigns_sequences_in_completion_order() {
        let mut node = start_node(PeerDirectory::default()).await;
        let mut deliveries = node.deliveries().unwrap();
        let addr = node.local_addr();

        push_line(addr, "hi").await;
        let first = deliveries.recv().await.unwrap();
        push_line(addr, "there").await;
        let second = deliveries.recv().await.unwrap();

        assert_eq!(first, Delivery { seq: Seq::new(0), text: "hi".into() });
        assert_eq!(second, Delivery { seq: Seq::new(1), text: "there".into() });

        let snapshot = node.log().snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].text, "hi");
        assert_eq!(snapshot[1].text, "there");
    }

    #[tokio::test]
    async fn test_send_message_reaches_peer_node() {
        let mut receiver = start_node(PeerDirectory::default()).await;
        let mut deliveries = receiver.deliveries().unwrap();

        let peers = PeerDirectory::new(vec![receiver.local_addr()]).unwrap();
        let sender = start_node(peers).await;

        sender.send_message("hello").unwrap();

        let delivery = deliveries.recv().await.unwrap();
        assert_eq!(delivery.seq, Seq::new(0));
        assert_eq!(delivery.text, "hello");
    }

    #[tokio::test]
    async fn test_node_sends_to_its_own_address_like_any_peer() {
        // No self-exclusion: the directory containing our own address
        // means we deliver to ourselves too.
        let mut node = start_node(PeerDirectory::default()).await;
        let mut deliveries = node.deliveries().unwrap();

        // The listen port is only known after binding, so point the
        // directory back at ourselves now.
        node.peers = Arc::new(PeerDirectory::new(vec![node.local_addr()]).unwrap());

        node.send_message("echo").unwrap();
        let delivery = deliveries.recv().await.unwrap();
        assert_eq!(delivery.text, "echo");
    }

    #[tokio::test]
    async fn test_send_message_survives_dead_peer() {
        let mut receiver = start_node(PeerDirectory::default()).await;
        let mut deliveries = receiver.deliveries().unwrap();

        // A peer that refuses connections, listed before the live one.
        let dead = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);
            addr
        };
        let peers = PeerDirectory::new(vec![dead, receiver.local_addr()]).unwrap();
        let sender = start_node(peers).await;

        // No error surfaces, and the live peer still gets the message.
        sender.send_message("x").unwrap();
        assert_eq!(deliveries.recv().await.unwrap().text, "x");
    }

    #[tokio::test]
    async fn test_send_message_rejects_embedded_newline() {
        let node = start_node(PeerDirectory::default()).await;
        let result = node.send_message("two\nlines");
        assert!(matches!(result, Err(GroupcastError::EmbeddedNewline)));
    }

    #[tokio::test]
    async fn test_deliveries_taken_once() {
        let mut node = start_node(PeerDirectory::default()).await;
        assert!(node.deliveries().is_some());
        assert!(node.deliveries().is_none());
    }

    #[test]
    fn test_default_config_uses_well_known_port() {
        let config = NodeConfig::default();
        assert_eq!(config.listen_addr.port(), 10000);
        assert!(config.peers.is_empty());
    }
}
