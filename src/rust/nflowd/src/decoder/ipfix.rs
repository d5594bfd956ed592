//! IPFIX (RFC 7011).

use super::{contain_set_error, DecoderError, FlowDecoder, PacketContext, Sets};
use crate::field_registry::{FlowProtocol, ENTERPRISE_BIT};
use crate::template::{OptionTemplate, StoredTemplate, Template, TemplateField};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Error, ErrorKind};
use tracing::{debug, warn};

pub(crate) const HEADER_LENGTH: usize = 16;

const TEMPLATE_SET: u16 = 2;
const OPTION_TEMPLATE_SET: u16 = 3;
const FIRST_DATA_SET: u16 = 256;

/// IPFIX message header
#[derive(Debug)]
pub(crate) struct IpfixHeader {
    pub(crate) version: u16,
    pub(crate) length: u16,
    pub(crate) export_time: u32,
    pub(crate) sequence_number: u32,
    pub(crate) observation_domain_id: u32,
}

impl IpfixHeader {
    fn read(cursor: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Self {
            version: cursor.read_u16::<BigEndian>()?,
            length: cursor.read_u16::<BigEndian>()?,
            export_time: cursor.read_u32::<BigEndian>()?,
            sequence_number: cursor.read_u32::<BigEndian>()?,
            observation_domain_id: cursor.read_u32::<BigEndian>()?,
        })
    }
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len().saturating_sub(cursor.position() as usize)
}

/// Reads field specifiers. Elements with the enterprise bit set are
/// followed by a 4-byte private enterprise number.
fn read_fields(cursor: &mut Cursor<&[u8]>, count: usize) -> std::io::Result<Vec<TemplateField>> {
    let mut fields = Vec::with_capacity(count);
    for _ in 0..count {
        let type_code = cursor.read_u16::<BigEndian>()?;
        let length = cursor.read_u16::<BigEndian>()?;
        if type_code & ENTERPRISE_BIT != 0 {
            let enterprise_number = cursor.read_u32::<BigEndian>()?;
            fields.push(TemplateField::enterprise(type_code, length, enterprise_number));
        } else {
            fields.push(TemplateField::new(type_code, length));
        }
    }
    Ok(fields)
}

impl FlowDecoder {
    pub(super) async fn decode_ipfix(
        &self,
        context: &PacketContext,
        payload: &[u8],
    ) -> Result<(), DecoderError> {
        if payload.len() < HEADER_LENGTH {
            return Err(DecoderError::TruncatedHeader {
                kind: "IPFIX",
                length: payload.len(),
            });
        }
        let header = IpfixHeader::read(&mut Cursor::new(payload))?;
        let declared = header.length as usize;
        if declared > payload.len() {
            return Err(DecoderError::LengthOverrun {
                declared,
                available: payload.len(),
            });
        }
        if declared < HEADER_LENGTH {
            return Err(DecoderError::TruncatedHeader {
                kind: "IPFIX",
                length: declared,
            });
        }
        debug!(
            "IPFIX v{} message from {}: {declared} bytes, sequence {}, domain {}, exported at {}",
            header.version,
            context.exporter,
            header.sequence_number,
            header.observation_domain_id,
            header.export_time
        );

        for set in Sets::new(&payload[HEADER_LENGTH..declared]) {
            let (set_id, body) = set?;
            let result = match set_id {
                TEMPLATE_SET => self.learn_ipfix_templates(context, body).await,
                OPTION_TEMPLATE_SET => self.learn_ipfix_option_templates(context, body).await,
                id if id >= FIRST_DATA_SET => {
                    self.decode_data_set(context, FlowProtocol::Ipfix, id, body)
                        .await
                }
                other => {
                    warn!(
                        "Unsupported IPFIX set id {other} from {}, skipping",
                        context.exporter
                    );
                    Ok(())
                }
            };
            contain_set_error(result, set_id, context.exporter)?;
        }
        Ok(())
    }

    async fn learn_ipfix_templates(
        &self,
        context: &PacketContext,
        body: &[u8],
    ) -> Result<(), DecoderError> {
        let mut cursor = Cursor::new(body);
        while remaining(&cursor) >= 4 {
            let template_id = cursor.read_u16::<BigEndian>()?;
            let field_count = cursor.read_u16::<BigEndian>()?;
            if template_id < FIRST_DATA_SET {
                break;
            }
            if field_count == 0 {
                debug!(
                    "Ignoring withdrawal of IPFIX template {template_id} from {}",
                    context.exporter
                );
                continue;
            }
            let fields = read_fields(&mut cursor, field_count as usize)?;
            debug!(
                "Learned IPFIX template {template_id} from {} ({} fields)",
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

    async fn learn_ipfix_option_templates(
        &self,
        context: &PacketContext,
        body: &[u8],
    ) -> Result<(), DecoderError> {
        let mut cursor = Cursor::new(body);
        while remaining(&cursor) >= 4 {
            let template_id = cursor.read_u16::<BigEndian>()?;
            let field_count = cursor.read_u16::<BigEndian>()?;
            if template_id < FIRST_DATA_SET {
                break;
            }
            if field_count == 0 {
                debug!(
                    "Ignoring withdrawal of IPFIX option template {template_id} from {}",
                    context.exporter
                );
                continue;
            }
            let scope_count = cursor.read_u16::<BigEndian>()?;
            if scope_count == 0 || scope_count > field_count {
                return Err(Error::new(
                    ErrorKind::InvalidData,
                    format!("option template {template_id} has {scope_count} scope fields out of {field_count}"),
                )
                .into());
            }
            let mut scope_fields = read_fields(&mut cursor, field_count as usize)?;
            let option_fields = scope_fields.split_off(scope_count as usize);
            debug!(
                "Learned IPFIX option template {template_id} from {} ({} scope, {} option fields)",
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
