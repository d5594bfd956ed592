//! Top-level configuration file for nflowd.

use super::{ConfigError, DecoderConfig, ListenerConfig};
use serde::{Deserialize, Serialize};

/// Top-level configuration file for nflowd.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// UDP socket and admission control
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Decoding and enrichment options
    #[serde(default)]
    pub decoder: DecoderConfig,
}

impl Config {
    /// Test is a configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        self.listener.socket_addr()?;
        if self.listener.allowed_pending_messages == 0 {
            return Err("allowed_pending_messages must be at least 1".to_string());
        }
        if !(1500..=65_535).contains(&self.listener.read_buffer_size) {
            return Err(format!(
                "read_buffer_size must be between 1500 and 65535, found {}",
                self.listener.read_buffer_size
            ));
        }
        if let Some(path) = &self.decoder.custom_field_mappings {
            if path.trim().is_empty() {
                return Err("custom_field_mappings may not be an empty path".to_string());
            }
        }
        if self
            .decoder
            .private_enterprise_number_files
            .iter()
            .any(|p| p.trim().is_empty())
        {
            return Err("private_enterprise_number_files may not contain an empty path".to_string());
        }
        Ok(())
    }

    /// Loads a config file from a string
    pub fn load_from_string(s: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml_edit::de::from_str(s).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FULL_CONFIG: &str = r#"
[listener]
service_address = "udp://:9995"
allowed_pending_messages = 500
read_buffer_size = 9000

[decoder]
resolve_application_name_by_id = true
resolve_ifname_by_ifindex = true
emit_option_records = false
custom_field_mappings = "/etc/nflowd/fields.csv"
private_enterprise_number_files = ["/etc/nflowd/pen_a.csv", "/etc/nflowd/pen_b.csv"]
"#;

    #[test]
    fn load_full_config() {
        let config = Config::load_from_string(FULL_CONFIG).unwrap();
        assert_eq!(config.listener.allowed_pending_messages, 500);
        assert_eq!(config.listener.read_buffer_size, 9000);
        assert!(config.decoder.resolve_application_name_by_id);
        assert!(config.decoder.resolve_ifname_by_ifindex);
        assert!(!config.decoder.emit_option_records);
        assert!(!config.decoder.dump_packets);
        assert_eq!(config.decoder.private_enterprise_number_files.len(), 2);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::load_from_string("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.listener.allowed_pending_messages, 10_000);
        assert!(config.decoder.emit_option_records);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = Config::load_from_string("[listener]\nallowed_pending_messages = 3\n").unwrap();
        assert_eq!(config.listener.allowed_pending_messages, 3);
        assert_eq!(config.listener.service_address, "0.0.0.0:2055");
    }

    #[test]
    fn reject_zero_pending() {
        let result = Config::load_from_string("[listener]\nallowed_pending_messages = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reject_bad_address() {
        let result = Config::load_from_string("[listener]\nservice_address = \"nowhere\"\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reject_bad_toml() {
        let result = Config::load_from_string("[listener\n");
        assert!(matches!(result, Err(ConfigError::CannotParseToml(_))));
    }
}
