//! Fixed-layout NetFlow v5.

use super::{DecoderError, FlowDecoder, PacketContext, FLOW_MEASUREMENT};
use crate::accumulator::{FieldMap, TagMap};
use crate::stats::METRICS_EMITTED;
use crate::type_decoders::{engine_type_name, l4_protocol_name, tcp_flags_string, FlowValue};
use byteorder::{BigEndian, ReadBytesExt};
use nflow_utils::hex_string::to_hex_string;
use nflow_utils::unix_time::from_unix_parts;
use std::io::Cursor;
use std::net::Ipv4Addr;
use std::sync::atomic::Ordering;
use tracing::debug;

pub(crate) const HEADER_LENGTH: usize = 24;
pub(crate) const RECORD_LENGTH: usize = 48;

/// Standard Netflow 5 header
#[derive(Debug)]
pub(crate) struct Netflow5Header {
    pub(crate) version: u16,
    pub(crate) count: u16,
    pub(crate) sys_uptime: u32,
    pub(crate) unix_secs: u32,
    pub(crate) unix_nsecs: u32,
    pub(crate) flow_sequence: u32,
    pub(crate) engine_type: u8,
    pub(crate) engine_id: u8,
    pub(crate) sampling_interval: u16,
}

impl Netflow5Header {
    fn read(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Self {
            version: cursor.read_u16::<BigEndian>()?,
            count: cursor.read_u16::<BigEndian>()?,
            sys_uptime: cursor.read_u32::<BigEndian>()?,
            unix_secs: cursor.read_u32::<BigEndian>()?,
            unix_nsecs: cursor.read_u32::<BigEndian>()?,
            flow_sequence: cursor.read_u32::<BigEndian>()?,
            engine_type: cursor.read_u8()?,
            engine_id: cursor.read_u8()?,
            sampling_interval: cursor.read_u16::<BigEndian>()?,
        })
    }
}

/// Standard Netflow 5 record
#[derive(Debug)]
pub(crate) struct Netflow5Record {
    pub(crate) src_addr: u32,
    pub(crate) dst_addr: u32,
    pub(crate) next_hop: u32,
    pub(crate) input: u16,
    pub(crate) output: u16,
    pub(crate) d_pkts: u32,
    pub(crate) d_octets: u32,
    pub(crate) first: u32,
    pub(crate) last: u32,
    pub(crate) src_port: u16,
    pub(crate) dst_port: u16,
    pub(crate) tcp_flags: u8,
    pub(crate) prot: u8,
    pub(crate) tos: u8,
    pub(crate) src_as: u16,
    pub(crate) dst_as: u16,
    pub(crate) src_mask: u8,
    pub(crate) dst_mask: u8,
}

impl Netflow5Record {
    fn read(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        let src_addr = cursor.read_u32::<BigEndian>()?;
        let dst_addr = cursor.read_u32::<BigEndian>()?;
        let next_hop = cursor.read_u32::<BigEndian>()?;
        let input = cursor.read_u16::<BigEndian>()?;
        let output = cursor.read_u16::<BigEndian>()?;
        let d_pkts = cursor.read_u32::<BigEndian>()?;
        let d_octets = cursor.read_u32::<BigEndian>()?;
        let first = cursor.read_u32::<BigEndian>()?;
        let last = cursor.read_u32::<BigEndian>()?;
        let src_port = cursor.read_u16::<BigEndian>()?;
        let dst_port = cursor.read_u16::<BigEndian>()?;
        let _pad1 = cursor.read_u8()?;
        let tcp_flags = cursor.read_u8()?;
        let prot = cursor.read_u8()?;
        let tos = cursor.read_u8()?;
        let src_as = cursor.read_u16::<BigEndian>()?;
        let dst_as = cursor.read_u16::<BigEndian>()?;
        let src_mask = cursor.read_u8()?;
        let dst_mask = cursor.read_u8()?;
        let _pad2 = cursor.read_u16::<BigEndian>()?;
        Ok(Self {
            src_addr,
            dst_addr,
            next_hop,
            input,
            output,
            d_pkts,
            d_octets,
            first,
            last,
            src_port,
            dst_port,
            tcp_flags,
            prot,
            tos,
            src_as,
            dst_as,
            src_mask,
            dst_mask,
        })
    }

    fn fields(&self, header: &Netflow5Header) -> FieldMap {
        let mut fields = FieldMap::new();
        let mut put = |name: &str, value: FlowValue| {
            fields.insert(name.to_string(), value);
        };
        let ip = |raw: u32| FlowValue::Text(Ipv4Addr::from(raw).to_string());
        let uint = |raw: u64| FlowValue::Unsigned(raw);

        put("flows", uint(header.count as u64));
        put("sys_uptime", uint(header.sys_uptime as u64));
        put("seq_number", uint(header.flow_sequence as u64));
        put("engine_type", FlowValue::Text(engine_type_name(header.engine_type)));
        put("engine_id", FlowValue::Text(to_hex_string(&[header.engine_id])));
        put("sampling_interval", uint(header.sampling_interval as u64));

        put("src", ip(self.src_addr));
        put("dst", ip(self.dst_addr));
        put("next_hop", ip(self.next_hop));
        put("in_snmp", uint(self.input as u64));
        put("out_snmp", uint(self.output as u64));
        put("in_packets", uint(self.d_pkts as u64));
        put("in_bytes", uint(self.d_octets as u64));
        put("first_switched", uint(self.first as u64));
        put("last_switched", uint(self.last as u64));
        put("src_port", uint(self.src_port as u64));
        put("dst_port", uint(self.dst_port as u64));
        put("tcp_flags", FlowValue::Text(tcp_flags_string(self.tcp_flags)));
        put("protocol", FlowValue::Text(l4_protocol_name(self.prot)));
        put("src_tos", FlowValue::Text(to_hex_string(&[self.tos])));
        put("bgp_src_as", uint(self.src_as as u64));
        put("bgp_dst_as", uint(self.dst_as as u64));
        put("src_mask", uint(self.src_mask as u64));
        put("dst_mask", uint(self.dst_mask as u64));
        fields
    }
}

impl FlowDecoder {
    pub(super) async fn decode_netflow5(
        &self,
        context: &PacketContext,
        payload: &[u8],
    ) -> Result<(), DecoderError> {
        if payload.len() < HEADER_LENGTH {
            return Err(DecoderError::TruncatedHeader {
                kind: "NetFlow v5",
                length: payload.len(),
            });
        }
        let mut cursor = Cursor::new(payload);
        let header = Netflow5Header::read(&mut cursor)?;
        let declared = HEADER_LENGTH + RECORD_LENGTH * header.count as usize;
        if payload.len() < declared {
            return Err(DecoderError::LengthOverrun {
                declared,
                available: payload.len(),
            });
        }

        debug!(
            "NetFlow v{} packet from {}: {} records, sequence {}, uptime {} ms",
            header.version,
            context.exporter,
            header.count,
            header.flow_sequence,
            header.sys_uptime
        );
        let timestamp = from_unix_parts(header.unix_secs as u64, header.unix_nsecs)
            .unwrap_or(context.arrival);
        for _ in 0..header.count {
            let record = Netflow5Record::read(&mut cursor)?;
            let mut tags = TagMap::new();
            tags.insert("exporter".to_string(), context.exporter.to_string());
            tags.insert("version".to_string(), "NetFlowV5".to_string());
            self.tag_interfaces(&mut tags, Some(record.input as u32), Some(record.output as u32))
                .await?;
            self.accumulator
                .add_fields(FLOW_MEASUREMENT, record.fields(&header), tags, timestamp);
            METRICS_EMITTED.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}
