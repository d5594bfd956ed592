//! Packet dispatch: reads the version from each datagram and hands it
//! to the matching protocol decoder.
//!
//! Problems are contained at the smallest level possible. A bad field
//! is skipped, a bad set is abandoned, and a bad packet is logged and
//! counted. Nothing short of a stopped actor ends the dispatch loop.

mod flow_records;
mod ipfix;
mod netflow5;
mod netflow9;

use crate::accumulator::Accumulator;
use crate::field_registry::FieldRegistry;
use crate::listener::Packet;
use crate::name_cache::{ApplicationNames, InterfaceNames, NameCacheError};
use crate::stats::{PACKETS_DECODED, PACKETS_MALFORMED};
use crate::template_store::{TemplateStore, TemplateStoreError};
use nflow_utils::hex_string::to_hex_string;
use std::net::IpAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub const NETFLOW_V5: u16 = 5;
pub const NETFLOW_V9: u16 = 9;
pub const IPFIX: u16 = 10;

/// Measurement name for flow records.
pub const FLOW_MEASUREMENT: &str = "netflow";
/// Measurement name for option records.
pub const OPTIONS_MEASUREMENT: &str = "netflow_options";

#[derive(Error, Debug)]
pub enum DecoderError {
    #[error("packet of {length} bytes is too short for a {kind} header")]
    TruncatedHeader { kind: &'static str, length: usize },
    #[error("declared length {declared} overruns the {available} bytes available")]
    LengthOverrun { declared: usize, available: usize },
    #[error("set length {0} is shorter than the set header")]
    SetTooShort(u16),
    #[error("unsupported flow export version {0}")]
    UnsupportedVersion(u16),
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    TemplateStore(#[from] TemplateStoreError),
    #[error(transparent)]
    NameCache(#[from] NameCacheError),
}

impl DecoderError {
    /// True when an actor the decoder depends on has stopped.
    pub fn is_actor_failure(&self) -> bool {
        matches!(self, DecoderError::TemplateStore(_) | DecoderError::NameCache(_))
    }
}

/// Per-packet facts every record decoder needs.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PacketContext {
    pub exporter: IpAddr,
    pub arrival: SystemTime,
}

/// Walks the `(id, length)` framed sets of a v9 or IPFIX body, yielding
/// each set id with the bytes after its 4-byte header. Fewer than four
/// trailing bytes are padding.
pub(crate) struct Sets<'a> {
    data: &'a [u8],
}

impl<'a> Sets<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for Sets<'a> {
    type Item = Result<(u16, &'a [u8]), DecoderError>;

    fn next(&mut self) -> Option<Self::Item> {
        let [a, b, c, d, ..] = self.data else {
            return None;
        };
        let id = u16::from_be_bytes([*a, *b]);
        let length = u16::from_be_bytes([*c, *d]);
        let available = self.data.len();
        let declared = length as usize;
        if declared < 4 {
            self.data = &[];
            return Some(Err(DecoderError::SetTooShort(length)));
        }
        if declared > available {
            self.data = &[];
            return Some(Err(DecoderError::LengthOverrun {
                declared,
                available,
            }));
        }
        let (set, rest) = self.data.split_at(declared);
        self.data = rest;
        Some(Ok((id, &set[4..])))
    }
}

/// Keeps a failed set from taking the packet down with it. Only a
/// stopped actor is passed on.
pub(crate) fn contain_set_error(
    result: Result<(), DecoderError>,
    set_id: u16,
    exporter: IpAddr,
) -> Result<(), DecoderError> {
    match result {
        Err(e) if e.is_actor_failure() => Err(e),
        Err(e) => {
            warn!("Abandoning set {set_id} from {exporter}: {e}");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

/// Decodes packets and forwards the results to an accumulator.
pub struct FlowDecoder {
    registry: Arc<FieldRegistry>,
    templates: TemplateStore,
    interfaces: Option<InterfaceNames>,
    applications: Option<ApplicationNames>,
    accumulator: Arc<dyn Accumulator>,
    emit_option_records: bool,
    dump_packets: bool,
}

impl FlowDecoder {
    pub fn new(
        registry: Arc<FieldRegistry>,
        templates: TemplateStore,
        accumulator: Arc<dyn Accumulator>,
    ) -> Self {
        Self {
            registry,
            templates,
            interfaces: None,
            applications: None,
            accumulator,
            emit_option_records: true,
            dump_packets: false,
        }
    }

    /// Enables interface name tags, learned from option records.
    pub fn with_interface_names(mut self, cache: InterfaceNames) -> Self {
        self.interfaces = Some(cache);
        self
    }

    /// Enables application name tags, learned from option records.
    pub fn with_application_names(mut self, cache: ApplicationNames) -> Self {
        self.applications = Some(cache);
        self
    }

    pub fn emit_option_records(mut self, emit: bool) -> Self {
        self.emit_option_records = emit;
        self
    }

    pub fn dump_packets(mut self, dump: bool) -> Self {
        self.dump_packets = dump;
        self
    }

    /// Decodes one datagram. Errors describe why the whole packet was
    /// abandoned; narrower problems are only logged.
    pub async fn decode_packet(&self, packet: &Packet) -> Result<(), DecoderError> {
        if self.dump_packets {
            debug!(
                "Packet from {}: {}",
                packet.source,
                to_hex_string(&packet.payload)
            );
        }
        let context = PacketContext {
            exporter: packet.source.ip().to_canonical(),
            arrival: packet.received,
        };
        let payload = packet.payload.as_slice();
        let version = match payload {
            [hi, lo, ..] => u16::from_be_bytes([*hi, *lo]),
            _ => {
                return Err(DecoderError::TruncatedHeader {
                    kind: "version",
                    length: payload.len(),
                })
            }
        };
        match version {
            NETFLOW_V5 => self.decode_netflow5(&context, payload).await,
            NETFLOW_V9 => self.decode_netflow9(&context, payload).await,
            IPFIX => self.decode_ipfix(&context, payload).await,
            other => Err(DecoderError::UnsupportedVersion(other)),
        }
    }
}

/// Consumes packets until the queue closes or `cancel` fires.
pub async fn run_decoder(
    decoder: FlowDecoder,
    mut rx: mpsc::Receiver<Packet>,
    cancel: CancellationToken,
) {
    loop {
        let packet = tokio::select! {
            _ = cancel.cancelled() => break,
            packet = rx.recv() => packet,
        };
        let Some(packet) = packet else {
            break;
        };
        match decoder.decode_packet(&packet).await {
            Ok(()) => {
                PACKETS_DECODED.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) if e.is_actor_failure() => {
                error!("Decoder cannot continue: {e}");
                break;
            }
            Err(e) => {
                PACKETS_MALFORMED.fetch_add(1, Ordering::Relaxed);
                warn!("Discarding packet from {}: {e}", packet.source);
            }
        }
    }
    info!("Packet decoder stopped");
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sets_are_walked_by_declared_length() {
        let data = [
            0, 0, 0, 6, 0xAA, 0xBB, // set 0, two body bytes
            1, 1, 0, 4, // set 257, empty
            0, 0, // padding
        ];
        let sets: Vec<_> = Sets::new(&data).map(|s| s.unwrap()).collect();
        assert_eq!(sets, vec![(0, &[0xAA, 0xBB][..]), (257, &[][..])]);
    }

    #[test]
    fn bad_set_lengths_stop_the_walk() {
        let short = [0, 2, 0, 3, 0, 0];
        let mut sets = Sets::new(&short);
        assert!(matches!(sets.next(), Some(Err(DecoderError::SetTooShort(3)))));
        assert!(sets.next().is_none());

        let overrun = [0, 2, 0, 40, 0, 0];
        let mut sets = Sets::new(&overrun);
        assert!(matches!(
            sets.next(),
            Some(Err(DecoderError::LengthOverrun {
                declared: 40,
                available: 6
            }))
        ));
        assert!(sets.next().is_none());
    }

    #[test]
    fn only_actor_failures_escape_a_set() {
        let exporter = IpAddr::from([192, 0, 2, 1]);
        let io = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert!(contain_set_error(Err(io.into()), 256, exporter).is_ok());
        assert!(contain_set_error(
            Err(TemplateStoreError::ActorGone.into()),
            256,
            exporter
        )
        .is_err());
    }
}
