//! NetFlow v9 only: Cisco ASA vendor elements.

use super::{fields, FieldDef};
use crate::type_decoders::*;

pub(super) static V9_FIELDS: &[(u16, &[FieldDef])] = fields! {
    33000 => ["in_acl_id": decode_hex],
    33001 => ["out_acl_id": decode_hex],
    33002 => ["fw_event_ext": decode_hex],
    40000 => ["username": decode_string],
};
