//! NetFlow v9 (RFC 3954).

use super::{contain_set_error, DecoderError, FlowDecoder, PacketContext, Sets};
use crate::field_registry::FlowProtocol;
use crate::template::{OptionTemplate, StoredTemplate, Template, TemplateField};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::Cursor;
use tracing::{debug, warn};

pub(crate) const HEADER_LENGTH: usize = 20;

const TEMPLATE_FLOWSET: u16 = 0;
const OPTION_TEMPLATE_FLOWSET: u16 = 1;
/// Data flowsets use template ids from here on.
pub(crate) const FIRST_DATA_FLOWSET: u16 = 256;

/// NetFlow v9 packet header
#[derive(Debug)]
pub(crate) struct Netflow9Header {
    pub(crate) version: u16,
    pub(crate) count: u16,
    pub(crate) sys_uptime: u32,
    pub(crate) unix_secs: u32,
    pub(crate) sequence_number: u32,
    pub(crate) source_id: u32,
}

impl Netflow9Header {
    fn read(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Self {
            version: cursor.read_u16::<BigEndian>()?,
            count: cursor.read_u16::<BigEndian>()?,
            sys_uptime: cursor.read_u32::<BigEndian>()?,
            unix_secs: cursor.read_u32::<BigEndian>()?,
            sequence_number: cursor.read_u32::<BigEndian>()?,
            source_id: cursor.read_u32::<BigEndian>()?,
        })
    }
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}

fn read_fields(cursor: &mut Cursor<&[u8]>, count: usize) -> std::io::Result<Vec<TemplateField>> {
    let mut fields = Vec::with_capacity(count);
    for _ in 0..count {
        let type_code = cursor.read_u16::<BigEndian>()?;
        let length = cursor.read_u16::<BigEndian>()?;
        fields.push(TemplateField::new(type_code, length));
    }
    Ok(fields)
}

impl FlowDecoder {
    pub(super) async fn decode_netflow9(
        &self,
        context: &PacketContext,
        payload: &[u8],
    ) -> Result<(), DecoderError> {
        if payload.len() < HEADER_LENGTH {
            return Err(DecoderError::TruncatedHeader {
                kind: "NetFlow v9",
                length: payload.len(),
            });
        }
        let header = Netflow9Header::read(&mut Cursor::new(payload))?;
        debug!(
            "NetFlow v{} packet from {}: {} records, sequence {}, source id {}, uptime {} ms, exported at {}",
            header.version,
            context.exporter,
            header.count,
            header.sequence_number,
            header.source_id,
            header.sys_uptime,
            header.unix_secs
        );

        for set in Sets::new(&payload[HEADER_LENGTH..]) {
            let (flowset_id, body) = set?;
            let result = match flowset_id {
                TEMPLATE_FLOWSET => self.learn_v9_templates(context, body).await,
                OPTION_TEMPLATE_FLOWSET => self.learn_v9_option_templates(context, body).await,
                id if id >= FIRST_DATA_FLOWSET => {
                    self.decode_data_set(context, FlowProtocol::NetflowV9, id, body)
                        .await
                }
                other => {
                    warn!(
                        "Unsupported NetFlow v9 flowset id {other} from {}, skipping",
                        context.exporter
                    );
                    Ok(())
                }
            };
            contain_set_error(result, flowset_id, context.exporter)?;
        }
        Ok(())
    }

    async fn learn_v9_templates(
        &self,
        context: &PacketContext,
        body: &[u8],
    ) -> Result<(), DecoderError> {
        let mut cursor = Cursor::new(body);
        while remaining(&cursor) >= 4 {
            let template_id = cursor.read_u16::<BigEndian>()?;
            let field_count = cursor.read_u16::<BigEndian>()?;
            if template_id < FIRST_DATA_FLOWSET {
                // Zero padding at the end of the flowset
                break;
            }
            let fields = read_fields(&mut cursor, field_count as usize)?;
            debug!(
                "Learned NetFlow v9 template {template_id} from {} ({} fields)",
                context.exporter,
                fields.len()
            );
            self.templates
                .write(
                    context.exporter,
                    template_id,
                    StoredTemplate::Data(Template::new(fields)),
                )
                .await?;
        }
        Ok(())
    }

    async fn learn_v9_option_templates(
        &self,
        context: &PacketContext,
        body: &[u8],
    ) -> Result<(), DecoderError> {
        let mut cursor = Cursor::new(body);
        while remaining(&cursor) >= 6 {
            let template_id = cursor.read_u16::<BigEndian>()?;
            let scope_length = cursor.read_u16::<BigEndian>()?;
            let option_length = cursor.read_u16::<BigEndian>()?;
            if template_id < FIRST_DATA_FLOWSET {
                break;
            }
            let scope_fields = read_fields(&mut cursor, scope_length as usize / 4)?;
            let option_fields = read_fields(&mut cursor, option_length as usize / 4)?;
            debug!(
                "Learned NetFlow v9 option template {template_id} from {} ({} scope, {} option fields)",
                context.exporter,
                scope_fields.len(),
                option_fields.len()
            );
            self.templates
                .write(
                    context.exporter,
                    template_id,
                    StoredTemplate::Options(OptionTemplate {
                        scope_fields,
                        option_fields,
                    }),
                )
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_layout() {
        let mut packet = Vec::new();
        packet.extend_from_slice(&9u16.to_be_bytes());
        packet.extend_from_slice(&2u16.to_be_bytes());
        packet.extend_from_slice(&123u32.to_be_bytes());
        packet.extend_from_slice(&1_700_000_000u32.to_be_bytes());
        packet.extend_from_slice(&77u32.to_be_bytes());
        packet.extend_from_slice(&5u32.to_be_bytes());
        assert_eq!(packet.len(), HEADER_LENGTH);
        let header = Netflow9Header::read(&mut Cursor::new(packet.as_slice())).unwrap();
        assert_eq!(header.version, 9);
        assert_eq!(header.count, 2);
        assert_eq!(header.sys_uptime, 123);
        assert_eq!(header.unix_secs, 1_700_000_000);
        assert_eq!(header.sequence_number, 77);
        assert_eq!(header.source_id, 5);
    }

    #[test]
    fn truncated_field_list_is_an_error() {
        let body = [0, 8, 0, 4, 0, 12];
        let mut cursor = Cursor::new(&body[..]);
        assert!(read_fields(&mut cursor, 2).is_err());
        let mut cursor = Cursor::new(&body[..4]);
        assert_eq!(
            read_fields(&mut cursor, 1).unwrap(),
            vec![TemplateField::new(8, 4)]
        );
    }
}
