//! Record layouts learned from exporters.

/// Variable-length marker in a template field length.
pub const VARIABLE_LENGTH: u16 = 0xFFFF;

/// One field of a template, as announced on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateField {
    pub type_code: u16,
    pub length: u16,
    /// Only present for IPFIX elements with the enterprise bit set.
    pub enterprise_number: Option<u32>,
}

impl TemplateField {
    pub fn new(type_code: u16, length: u16) -> Self {
        Self {
            type_code,
            length,
            enterprise_number: None,
        }
    }

    pub fn enterprise(type_code: u16, length: u16, enterprise_number: u32) -> Self {
        Self {
            type_code,
            length,
            enterprise_number: Some(enterprise_number),
        }
    }
}

fn total_length(fields: &[TemplateField]) -> usize {
    fields.iter().map(|f| f.length as usize).sum()
}

fn has_variable_length(fields: &[TemplateField]) -> bool {
    fields.iter().any(|f| f.length == VARIABLE_LENGTH)
}

/// Layout of ordinary data records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    pub fields: Vec<TemplateField>,
}

impl Template {
    pub fn new(fields: Vec<TemplateField>) -> Self {
        Self { fields }
    }

    /// Bytes occupied by one record.
    pub fn total_length(&self) -> usize {
        total_length(&self.fields)
    }

    pub fn has_variable_length(&self) -> bool {
        has_variable_length(&self.fields)
    }
}

/// Layout of option data records: scope fields identify what the record
/// describes, option fields carry the values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionTemplate {
    pub scope_fields: Vec<TemplateField>,
    pub option_fields: Vec<TemplateField>,
}

impl OptionTemplate {
    pub fn total_length(&self) -> usize {
        total_length(&self.scope_fields) + total_length(&self.option_fields)
    }

    pub fn has_variable_length(&self) -> bool {
        has_variable_length(&self.scope_fields) || has_variable_length(&self.option_fields)
    }
}

/// Anything the template store can hold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredTemplate {
    Data(Template),
    Options(OptionTemplate),
}
