//! UDP socket reader.
//!
//! Packets are copied out of the receive buffer and offered to a bounded
//! channel without waiting. When the decoder falls behind, new packets
//! are dropped so the socket keeps being drained.

use crate::stats::{PACKETS_DROPPED, PACKETS_RECEIVED};
use nflow_config::ListenerConfig;
use nflow_utils::hex_string::hex_preview;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Bytes of a dropped packet shown in the warning.
const DROP_PREVIEW_BYTES: usize = 32;

#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("invalid listen address: {0}")]
    Address(String),
    #[error("unable to bind UDP socket on {address}: {source}")]
    Bind {
        address: SocketAddr,
        source: std::io::Error,
    },
}

/// One received datagram.
#[derive(Clone, Debug)]
pub struct Packet {
    pub source: SocketAddr,
    pub payload: Vec<u8>,
    pub received: SystemTime,
}

/// Binds the configured UDP address.
pub async fn bind(config: &ListenerConfig) -> Result<UdpSocket, ListenerError> {
    let address = config.socket_addr().map_err(ListenerError::Address)?;
    let socket = UdpSocket::bind(address)
        .await
        .map_err(|source| ListenerError::Bind { address, source })?;
    match socket.local_addr() {
        Ok(local) => info!("Listening for flow packets on udp://{local}"),
        Err(_) => info!("Listening for flow packets on udp://{address}"),
    }
    Ok(socket)
}

/// Offers a packet to the decoder queue. Returns `false` once the
/// queue has been closed by its consumer.
pub fn enqueue(tx: &mpsc::Sender<Packet>, packet: Packet, warn_every: u64) -> bool {
    match tx.try_send(packet) {
        Ok(()) => true,
        Err(TrySendError::Full(packet)) => {
            let dropped = PACKETS_DROPPED.fetch_add(1, Ordering::Relaxed);
            if dropped % warn_every.max(1) == 0 {
                warn!(
                    "Packet queue full, dropped packet from {} [{}] ({} dropped so far). Consider increasing allowed_pending_messages",
                    packet.source,
                    hex_preview(&packet.payload, DROP_PREVIEW_BYTES),
                    dropped + 1,
                );
            }
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

/// Reads datagrams until `cancel` fires or the decoder goes away.
pub async fn run_listener(
    socket: UdpSocket,
    read_buffer_size: usize,
    tx: mpsc::Sender<Packet>,
    cancel: CancellationToken,
) {
    let warn_every = tx.max_capacity() as u64;
    let mut buffer = vec![0u8; read_buffer_size];
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            received = socket.recv_from(&mut buffer) => received,
        };
        match received {
            Ok((size, source)) => {
                PACKETS_RECEIVED.fetch_add(1, Ordering::Relaxed);
                let packet = Packet {
                    source,
                    payload: buffer[..size].to_vec(),
                    received: SystemTime::now(),
                };
                if !enqueue(&tx, packet, warn_every) {
                    debug!("Packet queue closed, stopping listener");
                    break;
                }
            }
            Err(e) => {
                error!("Error reading from UDP socket: {e:?}");
            }
        }
    }
    info!("UDP listener stopped");
}

#[cfg(test)]
mod test {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn packet(byte: u8) -> Packet {
        Packet {
            source: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 2055),
            payload: vec![0, 9, byte],
            received: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn full_queue_drops_newest() {
        let (tx, mut rx) = mpsc::channel(1);
        let before = PACKETS_DROPPED.load(Ordering::Relaxed);
        assert!(enqueue(&tx, packet(1), 1));
        assert!(enqueue(&tx, packet(2), 1));
        assert!(PACKETS_DROPPED.load(Ordering::Relaxed) > before);
        assert_eq!(rx.recv().await.unwrap().payload, vec![0, 9, 1]);
        assert!(enqueue(&tx, packet(3), 1));
        assert_eq!(rx.recv().await.unwrap().payload, vec![0, 9, 3]);
    }

    #[tokio::test]
    async fn closed_queue_stops() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        assert!(!enqueue(&tx, packet(1), 1));
    }

    #[tokio::test]
    async fn listener_forwards_datagrams() {
        let config = ListenerConfig {
            service_address: "127.0.0.1:0".to_string(),
            ..Default::default()
        };
        let socket = bind(&config).await.unwrap();
        let target = socket.local_addr().unwrap();
        let (tx, mut rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_listener(socket, 1500, tx, cancel.clone()));

        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(&[0, 10, 0, 16], target).await.unwrap();
        let received = rx.recv().await.unwrap();
        assert_eq!(received.payload, vec![0, 10, 0, 16]);
        assert_eq!(received.source, sender.local_addr().unwrap());

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn bad_address_is_rejected() {
        let config = ListenerConfig {
            service_address: "not an address".to_string(),
            ..Default::default()
        };
        assert!(matches!(bind(&config).await, Err(ListenerError::Address(_))));
    }
}
