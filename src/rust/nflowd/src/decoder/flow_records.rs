//! Template-driven decoding of data sets, shared by NetFlow v9 and IPFIX.

use super::{DecoderError, FlowDecoder, PacketContext, FLOW_MEASUREMENT, OPTIONS_MEASUREMENT};
use crate::accumulator::{FieldMap, TagMap};
use crate::field_registry::FlowProtocol;
use crate::name_cache::{application_key, NameCacheError};
use crate::stats::{METRICS_EMITTED, MISSING_TEMPLATES};
use crate::template::{OptionTemplate, Template, TemplateField};
use crate::template_store::TemplateLookup;
use crate::type_decoders::{decode_string, decode_uint, FlowValue};
use nflow_utils::unix_time::{from_unix_micros, from_unix_millis, from_unix_nanos, from_unix_parts};
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Output name that is published as a tag instead of a field.
const DIRECTION_TAG: &str = "flow_direction";

const INGRESS_INTERFACE: u16 = 10;
const EGRESS_INTERFACE: u16 = 14;
const INTERFACE_NAME: u16 = 82;
const INTERFACE_DESCRIPTION: u16 = 83;
const APPLICATION_ID: u16 = 95;
const APPLICATION_NAME: u16 = 96;
const FLOW_END_SECONDS: u16 = 151;
const FLOW_END_MILLISECONDS: u16 = 153;
const FLOW_END_MICROSECONDS: u16 = 155;
const FLOW_END_NANOSECONDS: u16 = 157;

pub(crate) fn version_tag(protocol: FlowProtocol) -> &'static str {
    match protocol {
        FlowProtocol::NetflowV9 => "NetFlowV9",
        FlowProtocol::Ipfix => "IPFIX",
    }
}

fn raw_uint(raw: &[u8]) -> Option<u64> {
    decode_uint(raw).ok().and_then(|v| v.as_u64())
}

fn raw_name(raw: &[u8]) -> Option<String> {
    match decode_string(raw) {
        Ok(FlowValue::Text(name)) if !name.is_empty() => Some(name),
        _ => None,
    }
}

/// Everything pulled out of one record.
#[derive(Default, Debug)]
pub(crate) struct RecordValues {
    pub(crate) fields: FieldMap,
    pub(crate) direction: Option<String>,
    input_interface: Option<u32>,
    output_interface: Option<u32>,
    application_id: Option<u32>,
    interface_name: Option<String>,
    interface_description: Option<String>,
    application_name: Option<String>,
    end_seconds: Option<u64>,
    end_millis: Option<u64>,
    end_micros: Option<u64>,
    end_nanos: Option<u64>,
}

impl RecordValues {
    /// Remembers the raw value of the elements used for enrichment and
    /// timestamps. Enterprise and reverse elements never qualify.
    fn capture(&mut self, field: &TemplateField, raw: &[u8]) {
        if field.enterprise_number.is_some() {
            return;
        }
        match field.type_code {
            INGRESS_INTERFACE => {
                self.input_interface = raw_uint(raw).and_then(|v| u32::try_from(v).ok())
            }
            EGRESS_INTERFACE => {
                self.output_interface = raw_uint(raw).and_then(|v| u32::try_from(v).ok())
            }
            APPLICATION_ID => {
                self.application_id = <[u8; 4]>::try_from(raw).ok().map(u32::from_be_bytes)
            }
            INTERFACE_NAME => self.interface_name = raw_name(raw),
            INTERFACE_DESCRIPTION => self.interface_description = raw_name(raw),
            APPLICATION_NAME => self.application_name = raw_name(raw),
            FLOW_END_SECONDS => self.end_seconds = raw_uint(raw),
            FLOW_END_MILLISECONDS => self.end_millis = raw_uint(raw),
            FLOW_END_MICROSECONDS => self.end_micros = raw_uint(raw),
            FLOW_END_NANOSECONDS => self.end_nanos = raw_uint(raw),
            _ => {}
        }
    }

    /// The most precise flow end time present, if any. A value too
    /// large for `SystemTime` counts as absent.
    pub(crate) fn timestamp(&self) -> Option<SystemTime> {
        let (converted, raw) = if let Some(ns) = self.end_nanos {
            (from_unix_nanos(ns), ns)
        } else if let Some(us) = self.end_micros {
            (from_unix_micros(us), us)
        } else if let Some(ms) = self.end_millis {
            (from_unix_millis(ms), ms)
        } else if let Some(s) = self.end_seconds {
            (from_unix_parts(s, 0), s)
        } else {
            return None;
        };
        if converted.is_none() {
            debug!("Flow end time {raw} is out of range, using arrival time");
        }
        converted
    }
}

impl FlowDecoder {
    /// Decodes the fields of one record in template order.
    fn decode_record_fields(
        &self,
        protocol: FlowProtocol,
        fields: &[TemplateField],
        record: &[u8],
        values: &mut RecordValues,
    ) {
        let mut offset = 0;
        for field in fields {
            let end = offset + field.length as usize;
            let Some(raw) = record.get(offset..end) else {
                break;
            };
            offset = end;
            values.capture(field, raw);
            let decoded = match protocol {
                FlowProtocol::NetflowV9 => self.registry.decode_v9(field.type_code, raw),
                FlowProtocol::Ipfix => {
                    self.registry
                        .decode_ipfix(field.type_code, field.enterprise_number, raw)
                }
            };
            match decoded {
                Ok(outputs) => {
                    for (name, value) in outputs {
                        if name == DIRECTION_TAG {
                            values.direction = Some(value.to_string());
                        } else {
                            values.fields.insert(name, value);
                        }
                    }
                }
                Err(e) => debug!("Skipping field type {}: {e}", field.type_code),
            }
        }
    }

    /// Decodes a data set body (the bytes after the set header) using
    /// whatever template the exporter announced for `template_id`.
    pub(super) async fn decode_data_set(
        &self,
        context: &PacketContext,
        protocol: FlowProtocol,
        template_id: u16,
        body: &[u8],
    ) -> Result<(), DecoderError> {
        match self.templates.read(context.exporter, template_id).await? {
            TemplateLookup::Template(template) => {
                self.decode_flow_records(context, protocol, &template, body)
                    .await
            }
            TemplateLookup::Options(template) => {
                self.decode_option_records(context, protocol, &template, body)
                    .await
            }
            TemplateLookup::NotFound => {
                MISSING_TEMPLATES.fetch_add(1, Ordering::Relaxed);
                warn!(
                    "No template {template_id} known for exporter {}. Skipping data set until the device resends it",
                    context.exporter
                );
                Ok(())
            }
        }
    }

    async fn decode_flow_records(
        &self,
        context: &PacketContext,
        protocol: FlowProtocol,
        template: &Template,
        body: &[u8],
    ) -> Result<(), DecoderError> {
        if template.has_variable_length() {
            warn!(
                "Variable-length fields from {} are not supported, skipping data set",
                context.exporter
            );
            return Ok(());
        }
        let Some(records) = split_records(body, template.total_length()) else {
            warn!("Empty template from {}, skipping data set", context.exporter);
            return Ok(());
        };
        for record in records {
            let mut values = RecordValues::default();
            self.decode_record_fields(protocol, &template.fields, record, &mut values);

            let mut tags = TagMap::new();
            tags.insert("exporter".to_string(), context.exporter.to_string());
            tags.insert("version".to_string(), version_tag(protocol).to_string());
            if let Some(direction) = values.direction.take() {
                tags.insert(DIRECTION_TAG.to_string(), direction);
            }
            self.tag_interfaces(&mut tags, values.input_interface, values.output_interface)
                .await?;
            self.tag_application(&mut tags, values.application_id).await?;

            let timestamp = values.timestamp().unwrap_or(context.arrival);
            self.accumulator
                .add_fields(FLOW_MEASUREMENT, values.fields, tags, timestamp);
            METRICS_EMITTED.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn decode_option_records(
        &self,
        context: &PacketContext,
        protocol: FlowProtocol,
        template: &OptionTemplate,
        body: &[u8],
    ) -> Result<(), DecoderError> {
        if template.has_variable_length() {
            warn!(
                "Variable-length option fields from {} are not supported, skipping option set",
                context.exporter
            );
            return Ok(());
        }
        let scope_length: usize = template.scope_fields.iter().map(|f| f.length as usize).sum();
        let Some(records) = split_records(body, template.total_length()) else {
            warn!("Empty option template from {}, skipping option set", context.exporter);
            return Ok(());
        };
        for record in records {
            let mut values = RecordValues::default();
            let (scope, options) = record.split_at(scope_length);
            self.decode_record_fields(protocol, &template.scope_fields, scope, &mut values);
            self.decode_record_fields(protocol, &template.option_fields, options, &mut values);

            self.learn_names(&values).await?;

            if self.emit_option_records {
                let mut tags = TagMap::new();
                tags.insert("exporter".to_string(), context.exporter.to_string());
                tags.insert("version".to_string(), version_tag(protocol).to_string());
                if let Some(direction) = values.direction.take() {
                    tags.insert(DIRECTION_TAG.to_string(), direction);
                }
                self.accumulator
                    .add_fields(OPTIONS_MEASUREMENT, values.fields, tags, context.arrival);
                METRICS_EMITTED.fetch_add(1, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Feeds interface and application names from an option record into
    /// the name caches.
    async fn learn_names(&self, values: &RecordValues) -> Result<(), NameCacheError> {
        if let (Some(cache), Some(index)) = (&self.interfaces, values.input_interface) {
            let name = values
                .interface_name
                .as_ref()
                .or(values.interface_description.as_ref());
            if let Some(name) = name {
                cache.write(index, name.clone()).await?;
            }
        }
        if let (Some(cache), Some(id), Some(name)) = (
            &self.applications,
            values.application_id,
            &values.application_name,
        ) {
            cache.write(application_key(id), name.clone()).await?;
        }
        Ok(())
    }

    /// Adds interface name tags for non-zero interface indexes.
    pub(super) async fn tag_interfaces(
        &self,
        tags: &mut TagMap,
        input: Option<u32>,
        output: Option<u32>,
    ) -> Result<(), NameCacheError> {
        let Some(cache) = &self.interfaces else {
            return Ok(());
        };
        for (tag, index) in [
            ("interface_input_name", input),
            ("interface_output_name", output),
        ] {
            let Some(index) = index.filter(|i| *i != 0) else {
                continue;
            };
            match cache.read(index).await? {
                Some(name) => {
                    tags.insert(tag.to_string(), name);
                }
                None => debug!("No interface name known for index {index}"),
            }
        }
        Ok(())
    }

    async fn tag_application(
        &self,
        tags: &mut TagMap,
        application_id: Option<u32>,
    ) -> Result<(), NameCacheError> {
        let (Some(cache), Some(id)) = (&self.applications, application_id) else {
            return Ok(());
        };
        let key = application_key(id);
        match cache.read(key.clone()).await? {
            Some(name) => {
                tags.insert("application_name".to_string(), name);
            }
            None => debug!("No application name known for id {key}"),
        }
        Ok(())
    }
}

/// Splits a set body into whole records of `width` bytes. Trailing
/// bytes that cannot hold a full record are padding and are ignored.
/// Returns `None` for a zero-width template.
pub(crate) fn split_records(body: &[u8], width: usize) -> Option<std::slice::ChunksExact<'_, u8>> {
    if width == 0 {
        return None;
    }
    let padding = body.len() % width;
    if padding != 0 {
        debug!(
            "Data set holds {} records of {width} bytes and {padding} bytes of padding",
            body.len() / width
        );
    }
    Some(body.chunks_exact(width))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn padding_is_never_a_record() {
        let body = [1u8; 19];
        let records: Vec<&[u8]> = split_records(&body, 8).unwrap().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records.iter().map(|r| r.len()).sum::<usize>(), 16);
        assert!(split_records(&body, 0).is_none());
        assert_eq!(split_records(&body[..7], 8).unwrap().count(), 0);
    }

    #[test]
    fn enrichment_values_are_captured() {
        let mut values = RecordValues::default();
        values.capture(&TemplateField::new(INGRESS_INTERFACE, 2), &[0, 7]);
        values.capture(&TemplateField::new(EGRESS_INTERFACE, 4), &[0, 0, 0, 9]);
        values.capture(&TemplateField::new(APPLICATION_ID, 4), &[3, 0, 0, 80]);
        values.capture(&TemplateField::new(INTERFACE_NAME, 8), b"Gi0/1\0\0\0");
        values.capture(&TemplateField::enterprise(INTERFACE_DESCRIPTION | 0x8000, 4, 9), b"nope");
        assert_eq!(values.input_interface, Some(7));
        assert_eq!(values.output_interface, Some(9));
        assert_eq!(values.application_id, Some(0x0300_0050));
        assert_eq!(values.interface_name.as_deref(), Some("Gi0/1"));
        assert_eq!(values.interface_description, None);
    }

    #[test]
    fn most_precise_end_time_wins() {
        let mut values = RecordValues::default();
        assert_eq!(values.timestamp(), None);
        values.capture(&TemplateField::new(FLOW_END_SECONDS, 4), &10u32.to_be_bytes());
        assert_eq!(values.timestamp(), Some(UNIX_EPOCH + Duration::from_secs(10)));
        values.capture(&TemplateField::new(FLOW_END_MILLISECONDS, 8), &10_500u64.to_be_bytes());
        assert_eq!(values.timestamp(), Some(UNIX_EPOCH + Duration::from_millis(10_500)));
        values.capture(&TemplateField::new(FLOW_END_NANOSECONDS, 8), &7u64.to_be_bytes());
        assert_eq!(values.timestamp(), Some(UNIX_EPOCH + Duration::from_nanos(7)));
    }

    #[test]
    fn end_time_beyond_system_time_is_ignored() {
        let mut values = RecordValues::default();
        values.capture(&TemplateField::new(FLOW_END_SECONDS, 8), &[0xff; 8]);
        assert_eq!(values.end_seconds, Some(u64::MAX));
        assert_eq!(values.timestamp(), None);
    }
}
