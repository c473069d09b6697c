//! Groupcast chat demo - terminal group messenger
//!
//! Usage: chat [LISTEN_PORT] [PEER_ADDR...]
//!
//! With no arguments, listens on port 10000 and targets the classic
//! five-node localhost topology (ports 11108, 11112, 11116, 11120,
//! 11124). Set GROUPCAST_TRANSCRIPT to a file path to persist every
//! received message keyed by its sequence.

mod store;

use std::io::{self, BufRead, Write};
use std::net::SocketAddr;

use groupcast_core::PeerDirectory;
use groupcast_runtime::{Node, NodeConfig};
use store::TranscriptStore;

const DEFAULT_LISTEN_PORT: u16 = 10000;
const DEFAULT_PEER_PORTS: [u16; 5] = [11108, 11112, 11116, 11120, 11124];

fn parse_args() -> Result<(u16, Vec<SocketAddr>), String> {
    let mut args = std::env::args().skip(1);

    let port = match args.next() {
        Some(arg) => arg
            .parse()
            .map_err(|_| format!("invalid listen port: {}", arg))?,
        None => DEFAULT_LISTEN_PORT,
    };

    let mut peers = Vec::new();
    for arg in args {
        let addr = arg
            .parse()
            .map_err(|_| format!("invalid peer address: {}", arg))?;
        peers.push(addr);
    }
    if peers.is_empty() {
        peers = DEFAULT_PEER_PORTS
            .iter()
            .map(|p| SocketAddr::from(([127, 0, 0, 1], *p)))
            .collect();
    }

    Ok((port, peers))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (port, peer_addrs) = parse_args().map_err(|e| {
        eprintln!("{}", e);
        eprintln!("usage: chat [LISTEN_PORT] [PEER_ADDR...]");
        e
    })?;

    let peers = PeerDirectory::new(peer_addrs)?;
    let mut node = Node::start(NodeConfig {
        listen_addr: ([0, 0, 0, 0], port).into(),
        peers,
    })
    .await?;

    println!("Listening on {}", node.local_addr());
    println!("Broadcasting to {} peer(s)", node.peers().len());

    let mut transcript = match std::env::var("GROUPCAST_TRANSCRIPT") {
        Ok(path) => Some(TranscriptStore::open(path.as_ref())?),
        Err(_) => None,
    };

    // Delivery consumer: print and optionally persist, in receipt
    // order.
    let mut deliveries = node.deliveries().expect("fresh node");
    tokio::spawn(async move {
        while let Some(delivery) = deliveries.recv().await {
            println!("\r[{}] {}", delivery.seq, delivery.text);
            print!("> ");
            let _ = io::stdout().flush();

            if let Some(store) = transcript.as_mut() {
                if let Err(e) = store.insert(delivery.seq, &delivery.text) {
                    tracing::warn!("transcript write failed: {}", e);
                }
            }
        }
    });

    println!("Type messages and press Enter to send. Type 'quit' to exit.\n");
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();

        if line == "quit" || line == "/quit" {
            break;
        }

        if !line.is_empty() {
            if let Err(e) = node.send_message(line) {
                eprintln!("cannot send: {}", e);
            }
        }

        print!("> ");
        io::stdout().flush()?;
    }

    println!("Goodbye!");
    Ok(())
}
