//! Maps NetFlow v9 and IPFIX element ids onto output field names and
//! the decoder for their bytes.
//!
//! The registry is built once at start-up from the built-in tables and
//! the operator's mapping files, then shared read-only by the decoder.

mod common;
mod ipfix;
mod v9;

use crate::type_decoders::{decode_hex, decoder_for_kind, DecodeError, DecodeFn, FlowValue};
use log_once::debug_once;
use nflow_config::{CustomField, FieldMappings};
use std::borrow::Cow;
use std::collections::HashMap;

/// Bit marking an IPFIX element that carries an enterprise number.
pub const ENTERPRISE_BIT: u16 = 0x8000;
/// RFC 5103 reverse-direction bit.
pub const REVERSE_BIT: u16 = 0x4000;

/// One built-in output of an element.
#[derive(Clone, Copy)]
pub(crate) struct FieldDef {
    pub(crate) name: &'static str,
    pub(crate) decode: DecodeFn,
}

macro_rules! fields {
    ($($code:literal => [$($name:literal : $decode:ident),*]),* $(,)?) => {
        &[$(
            ($code, &[$(FieldDef { name: $name, decode: $decode }),*] as &[FieldDef])
        ),*]
    };
}
pub(crate) use fields;

/// Name and decoder for one output field.
#[derive(Clone)]
pub struct FieldMapping {
    pub name: Cow<'static, str>,
    pub decode: DecodeFn,
}

impl From<&FieldDef> for FieldMapping {
    fn from(def: &FieldDef) -> Self {
        Self {
            name: Cow::Borrowed(def.name),
            decode: def.decode,
        }
    }
}

impl From<&CustomField> for FieldMapping {
    fn from(field: &CustomField) -> Self {
        Self {
            name: Cow::Owned(field.name.clone()),
            decode: decoder_for_kind(field.kind),
        }
    }
}

/// Which template-based protocol a field arrived in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowProtocol {
    NetflowV9,
    Ipfix,
}

pub struct FieldRegistry {
    overrides: HashMap<u16, Vec<FieldMapping>>,
    enterprise: HashMap<(u32, u16), Vec<FieldMapping>>,
    v9: HashMap<u16, Vec<FieldMapping>>,
    ipfix: HashMap<u16, Vec<FieldMapping>>,
    common: HashMap<u16, Vec<FieldMapping>>,
}

fn build_table(source: &[(u16, &[FieldDef])]) -> HashMap<u16, Vec<FieldMapping>> {
    source
        .iter()
        .map(|(code, defs)| (*code, defs.iter().map(FieldMapping::from).collect()))
        .collect()
}

impl FieldRegistry {
    /// Registry with the built-in tables only.
    pub fn new() -> Self {
        Self::with_mappings(&FieldMappings::default())
    }

    /// Registry with the operator's mappings layered on top.
    pub fn with_mappings(mappings: &FieldMappings) -> Self {
        Self {
            overrides: mappings
                .elements
                .iter()
                .map(|(id, field)| (*id, vec![FieldMapping::from(field)]))
                .collect(),
            enterprise: mappings
                .enterprise
                .iter()
                .map(|(key, field)| (*key, vec![FieldMapping::from(field)]))
                .collect(),
            v9: build_table(v9::V9_FIELDS),
            ipfix: build_table(ipfix::IPFIX_FIELDS),
            common: build_table(common::COMMON_FIELDS),
        }
    }

    /// Finds the outputs for an element. For IPFIX `type_code` must
    /// already have the enterprise and reverse bits cleared.
    ///
    /// An empty slice means the element is known but produces nothing.
    pub fn lookup(
        &self,
        protocol: FlowProtocol,
        type_code: u16,
        enterprise_number: Option<u32>,
    ) -> Option<&[FieldMapping]> {
        if let Some(pen) = enterprise_number {
            return self.enterprise.get(&(pen, type_code)).map(Vec::as_slice);
        }
        let found = match protocol {
            FlowProtocol::NetflowV9 => self
                .overrides
                .get(&type_code)
                .or_else(|| self.v9.get(&type_code))
                .or_else(|| self.common.get(&type_code))
                .or_else(|| self.ipfix.get(&type_code)),
            FlowProtocol::Ipfix => self
                .overrides
                .get(&type_code)
                .or_else(|| self.ipfix.get(&type_code))
                .or_else(|| self.common.get(&type_code)),
        };
        found.map(Vec::as_slice)
    }

    /// Decodes one NetFlow v9 field into zero or more named values.
    pub fn decode_v9(
        &self,
        type_code: u16,
        raw: &[u8],
    ) -> Result<Vec<(String, FlowValue)>, DecodeError> {
        match self.lookup(FlowProtocol::NetflowV9, type_code, None) {
            Some(mappings) => apply(mappings, "", raw),
            None => {
                debug_once!("Unknown NetFlow v9 field type {type_code}");
                Ok(vec![(format!("type_{type_code}"), decode_hex(raw)?)])
            }
        }
    }

    /// Decodes one IPFIX field. `type_code` is the value from the
    /// template, enterprise bit included.
    pub fn decode_ipfix(
        &self,
        type_code: u16,
        enterprise_number: Option<u32>,
        raw: &[u8],
    ) -> Result<Vec<(String, FlowValue)>, DecodeError> {
        let mut element = type_code & !ENTERPRISE_BIT;
        let mut prefix = "";
        if element & REVERSE_BIT != 0 {
            prefix = "rev_";
            element &= !REVERSE_BIT;
        }

        if let Some(pen) = enterprise_number {
            return match self.lookup(FlowProtocol::Ipfix, element, Some(pen)) {
                Some(mappings) => apply(mappings, prefix, raw),
                None => {
                    debug_once!("Unknown IPFIX enterprise field {pen}.{element}");
                    Ok(vec![(format!("type_{pen}_{prefix}{element}"), decode_hex(raw)?)])
                }
            };
        }

        match self.lookup(FlowProtocol::Ipfix, element, None) {
            Some(mappings) => apply(mappings, prefix, raw),
            None => {
                debug_once!("Unknown IPFIX field type {prefix}{element}");
                Ok(vec![(format!("type_{prefix}{element}"), decode_hex(raw)?)])
            }
        }
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(
    mappings: &[FieldMapping],
    prefix: &str,
    raw: &[u8],
) -> Result<Vec<(String, FlowValue)>, DecodeError> {
    mappings
        .iter()
        .map(|m| Ok((format!("{prefix}{}", m.name), (m.decode)(raw)?)))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use nflow_config::DecodeKind;

    fn one(result: Result<Vec<(String, FlowValue)>, DecodeError>) -> (String, FlowValue) {
        let mut fields = result.unwrap();
        assert_eq!(fields.len(), 1);
        fields.remove(0)
    }

    #[test]
    fn common_fields_resolve_for_both_protocols() {
        let registry = FieldRegistry::new();
        assert_eq!(
            one(registry.decode_v9(8, &[10, 0, 0, 1])),
            ("src".to_string(), FlowValue::from("10.0.0.1"))
        );
        assert_eq!(
            one(registry.decode_ipfix(12, None, &[10, 0, 0, 2])),
            ("dst".to_string(), FlowValue::from("10.0.0.2"))
        );
    }

    #[test]
    fn v9_falls_back_to_ipfix_elements() {
        let registry = FieldRegistry::new();
        assert_eq!(
            one(registry.decode_v9(192, &[64])),
            ("ttl".to_string(), FlowValue::Unsigned(64))
        );
        assert_eq!(
            one(registry.decode_v9(40000, b"alice\0")),
            ("username".to_string(), FlowValue::from("alice"))
        );
    }

    #[test]
    fn ipfix_prefers_its_own_table() {
        let registry = FieldRegistry::new();
        assert_eq!(
            one(registry.decode_ipfix(130, None, &[192, 0, 2, 9])),
            ("exporter".to_string(), FlowValue::from("192.0.2.9"))
        );
        assert!(registry.lookup(FlowProtocol::Ipfix, 40000, None).is_none());
        assert!(registry.lookup(FlowProtocol::NetflowV9, 40000, None).is_some());
    }

    #[test]
    fn reverse_elements_get_prefix() {
        let registry = FieldRegistry::new();
        let (name, value) = one(registry.decode_ipfix(REVERSE_BIT | 152, None, &[0, 0, 0, 0, 0, 0, 0, 5]));
        assert_eq!(name, "rev_flow_start_ms");
        assert_eq!(value, FlowValue::Unsigned(5));
    }

    #[test]
    fn unknown_fields_fall_back_to_hex() {
        let registry = FieldRegistry::new();
        assert_eq!(
            one(registry.decode_v9(105, &[0xde, 0xad])),
            ("type_105".to_string(), FlowValue::from("0xdead"))
        );
        assert_eq!(
            one(registry.decode_ipfix(ENTERPRISE_BIT | 7, Some(9), &[0x01])),
            ("type_9_7".to_string(), FlowValue::from("0x01"))
        );
        assert_eq!(
            one(registry.decode_ipfix(ENTERPRISE_BIT | REVERSE_BIT | 7, Some(9), &[0x01])),
            ("type_9_rev_7".to_string(), FlowValue::from("0x01"))
        );
        assert_eq!(
            one(registry.decode_ipfix(15616, None, &[0xaa])),
            ("type_15616".to_string(), FlowValue::from("0xaa"))
        );
        assert_eq!(
            one(registry.decode_ipfix(REVERSE_BIT | 15616, None, &[0xbb])),
            ("type_rev_15616".to_string(), FlowValue::from("0xbb"))
        );
    }

    #[test]
    fn multi_output_elements() {
        let registry = FieldRegistry::new();
        let fields = registry.decode_v9(32, &[3, 1]).unwrap();
        assert_eq!(
            fields,
            vec![
                ("icmp_type".to_string(), FlowValue::Unsigned(3)),
                ("icmp_code".to_string(), FlowValue::Unsigned(1)),
            ]
        );
        let fields = registry.decode_ipfix(89, None, &[0x81]).unwrap();
        assert_eq!(fields[0].1, FlowValue::from("dropped"));
        assert_eq!(fields[1].1, FlowValue::from("ACL deny"));
    }

    #[test]
    fn ignored_elements_produce_nothing() {
        let registry = FieldRegistry::new();
        assert!(registry.decode_ipfix(267, None, &[1, 2]).unwrap().is_empty());
        assert!(registry.decode_ipfix(292, None, &[1, 2]).unwrap().is_empty());
    }

    #[test]
    fn decode_errors_propagate() {
        let registry = FieldRegistry::new();
        assert!(registry.decode_v9(1, &[1, 2, 3]).is_err());
    }

    #[test]
    fn operator_mappings_take_priority() {
        let mut mappings = FieldMappings::default();
        mappings.elements.insert(
            8,
            CustomField {
                name: "origin".to_string(),
                kind: DecodeKind::Hex,
            },
        );
        mappings.enterprise.insert(
            (9, 12235),
            CustomField {
                name: "vendor_app".to_string(),
                kind: DecodeKind::String,
            },
        );
        let registry = FieldRegistry::with_mappings(&mappings);
        assert_eq!(
            one(registry.decode_v9(8, &[10, 0, 0, 1])),
            ("origin".to_string(), FlowValue::from("0x0a000001"))
        );
        assert_eq!(
            one(registry.decode_ipfix(ENTERPRISE_BIT | REVERSE_BIT | 12235, Some(9), b"web")),
            ("rev_vendor_app".to_string(), FlowValue::from("web"))
        );
        assert!(registry.lookup(FlowProtocol::Ipfix, 8, None).is_some());
    }
}
