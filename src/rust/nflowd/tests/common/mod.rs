//! Wire fixtures and harness shared by the integration tests.
#![allow(dead_code)]

use nflowd::accumulator::{CollectingAccumulator, Metric};
use nflowd::decoder::FlowDecoder;
use nflowd::field_registry::FieldRegistry;
use nflowd::listener::Packet;
use nflowd::name_cache::name_cache_actor;
use nflowd::template_store::template_store_actor;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;

pub const EXPORTER: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10));

/// Arrival time stamped on every fixture packet.
pub fn arrival() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

pub fn packet_from(exporter: IpAddr, payload: Vec<u8>) -> Packet {
    Packet {
        source: SocketAddr::new(exporter, 40_000),
        payload,
        received: arrival(),
    }
}

pub fn packet(payload: Vec<u8>) -> Packet {
    packet_from(EXPORTER, payload)
}

/// A decoder wired to fresh actors and an in-memory accumulator.
pub struct Harness {
    pub decoder: FlowDecoder,
    pub metrics: Arc<CollectingAccumulator>,
    pub cancel: CancellationToken,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_registry(FieldRegistry::new(), false).await
    }

    pub async fn with_names() -> Self {
        Self::with_registry(FieldRegistry::new(), true).await
    }

    pub async fn with_registry(registry: FieldRegistry, names: bool) -> Self {
        let cancel = CancellationToken::new();
        let metrics = Arc::new(CollectingAccumulator::new());
        let templates = template_store_actor(cancel.clone()).await;
        let mut decoder = FlowDecoder::new(Arc::new(registry), templates, metrics.clone());
        if names {
            decoder = decoder
                .with_interface_names(name_cache_actor("interface", cancel.clone()).await)
                .with_application_names(name_cache_actor("application", cancel.clone()).await);
        }
        Self {
            decoder,
            metrics,
            cancel,
        }
    }

    /// Applies a builder option to the decoder.
    pub fn map_decoder(self, f: impl FnOnce(FlowDecoder) -> FlowDecoder) -> Self {
        Self {
            decoder: f(self.decoder),
            ..self
        }
    }

    pub fn take(&self) -> Vec<Metric> {
        self.metrics.take()
    }
}


fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// Frames a set body with its `(id, length)` header.
pub fn set(id: u16, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 4);
    push_u16(&mut out, id);
    push_u16(&mut out, (body.len() + 4) as u16);
    out.extend_from_slice(body);
    out
}

/// Template record body: `(type, length)` pairs, v9 style.
pub fn template_record(template_id: u16, fields: &[(u16, u16)]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, template_id);
    push_u16(&mut out, fields.len() as u16);
    for (type_code, length) in fields {
        push_u16(&mut out, *type_code);
        push_u16(&mut out, *length);
    }
    out
}

/// NetFlow v9 option template record.
pub fn v9_option_template_record(
    template_id: u16,
    scope: &[(u16, u16)],
    options: &[(u16, u16)],
) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, template_id);
    push_u16(&mut out, (scope.len() * 4) as u16);
    push_u16(&mut out, (options.len() * 4) as u16);
    for (type_code, length) in scope.iter().chain(options) {
        push_u16(&mut out, *type_code);
        push_u16(&mut out, *length);
    }
    out
}

/// NetFlow v9 packet around already framed flowsets.
pub fn v9_packet(flowsets: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, 9);
    push_u16(&mut out, flowsets.len() as u16);
    push_u32(&mut out, 3_600_000);
    push_u32(&mut out, 1_700_000_000);
    push_u32(&mut out, 1);
    push_u32(&mut out, 0);
    for flowset in flowsets {
        out.extend_from_slice(flowset);
    }
    out
}

/// One IPFIX field specifier in a template.
pub enum Element {
    Iana(u16, u16),
    Enterprise(u16, u16, u32),
}

/// IPFIX template record, enterprise numbers included.
pub fn ipfix_template_record(template_id: u16, fields: &[Element]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, template_id);
    push_u16(&mut out, fields.len() as u16);
    push_elements(&mut out, fields);
    out
}

/// IPFIX option template record. The first `scope_count` specifiers
/// are scope fields.
pub fn ipfix_option_template_record(template_id: u16, scope_count: u16, fields: &[Element]) -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, template_id);
    push_u16(&mut out, fields.len() as u16);
    push_u16(&mut out, scope_count);
    push_elements(&mut out, fields);
    out
}

fn push_elements(out: &mut Vec<u8>, fields: &[Element]) {
    for field in fields {
        match field {
            Element::Iana(type_code, length) => {
                push_u16(out, *type_code);
                push_u16(out, *length);
            }
            Element::Enterprise(type_code, length, pen) => {
                push_u16(out, *type_code | 0x8000);
                push_u16(out, *length);
                push_u32(out, *pen);
            }
        }
    }
}

/// IPFIX message around already framed sets.
pub fn ipfix_packet(sets: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    let length: usize = 16 + sets.iter().map(Vec::len).sum::<usize>();
    push_u16(&mut out, 10);
    push_u16(&mut out, length as u16);
    push_u32(&mut out, 1_700_000_000);
    push_u32(&mut out, 1);
    push_u32(&mut out, 0);
    for set in sets {
        out.extend_from_slice(set);
    }
    out
}
