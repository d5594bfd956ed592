//! Decoder behaviour section of the configuration file.

use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct DecoderConfig {
    /// Add an `application_name` tag to flows that carry an application id
    /// previously announced in an option record.
    pub resolve_application_name_by_id: bool,

    /// Add `interface_input_name`/`interface_output_name` tags to flows
    /// whose interface indexes were announced in an option record.
    pub resolve_ifname_by_ifindex: bool,

    /// Publish option data records as `netflow_options` metrics.
    pub emit_option_records: bool,

    /// Log every received packet as hex at debug level.
    pub dump_packets: bool,

    /// CSV file overriding the decoding of standard element ids.
    pub custom_field_mappings: Option<String>,

    /// CSV files describing enterprise-specific (PEN) elements.
    pub private_enterprise_number_files: Vec<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            resolve_application_name_by_id: false,
            resolve_ifname_by_ifindex: false,
            emit_option_records: true,
            dump_packets: false,
            custom_field_mappings: None,
            private_enterprise_number_files: Vec::new(),
        }
    }
}
