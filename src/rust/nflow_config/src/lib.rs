//! Configuration for the `nflowd` flow collector.
//!
//! Two sources are handled here: the TOML configuration file
//! (`/etc/nflowd.conf` by default) and the optional CSV files that
//! teach the decoder about custom and enterprise-specific fields.

mod etc;
mod field_mappings;

pub use etc::{
    config_path, load_config, load_config_from, Config, ConfigError, DecoderConfig,
    ListenerConfig, DEFAULT_CONFIG_PATH,
};
pub use field_mappings::{
    parse_field_mappings, CustomField, DecodeKind, FieldMappingError, FieldMappings, MappingFile,
    MappingKey,
};
