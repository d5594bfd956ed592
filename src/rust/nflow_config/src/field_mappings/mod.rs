//! Custom field mapping files.
//!
//! Operators can teach the decoder about vendor-specific elements with
//! small CSV files of `key,name,kind` rows:
//!
//! ```text
//! # id,name,kind
//! 95,app_id,uint
//! 0x81a0,vendor_flags,hex
//! ```
//!
//! Enterprise (PEN) files use `<PEN>.<element-id>` keys instead. Both
//! are read once at start-up; any problem is fatal.

mod mapping_row;

use crate::DecoderConfig;
use csv::ReaderBuilder;
use mapping_row::MappingRow;
pub use mapping_row::{DecodeKind, MappingKey};
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;
use tracing::{debug, error, info};

/// Which kind of mapping file is being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingFile {
    /// Overrides for standard element ids.
    Custom,
    /// Private Enterprise Number element definitions.
    Enterprise,
}

impl MappingFile {
    fn pattern(self) -> &'static str {
        match self {
            MappingFile::Custom => "<element-id>",
            MappingFile::Enterprise => "<PEN>.<element-id>",
        }
    }
}

/// Name and decoder kind for one custom element.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomField {
    pub name: String,
    pub kind: DecodeKind,
}

/// Every custom mapping known to the collector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMappings {
    /// Overrides keyed by standard element id.
    pub elements: HashMap<u16, CustomField>,
    /// Enterprise elements keyed by `(PEN, element id)`.
    pub enterprise: HashMap<(u32, u16), CustomField>,
}

impl FieldMappings {
    /// Loads the override file and every PEN file named in the decoder
    /// configuration.
    pub fn load(config: &DecoderConfig) -> Result<Self, FieldMappingError> {
        let mut result = Self::default();
        if let Some(path) = &config.custom_field_mappings {
            debug!("Loading custom field mapping file {path:?}");
            result.merge(load_file(path, MappingFile::Custom)?, path)?;
        }
        for path in config.private_enterprise_number_files.iter() {
            debug!("Loading PEN mapping file {path:?}");
            result.merge(load_file(path, MappingFile::Enterprise)?, path)?;
        }
        info!(
            "Loaded {} custom field mappings and {} PEN mappings",
            result.elements.len(),
            result.enterprise.len()
        );
        Ok(result)
    }

    /// Adds parsed rows, rejecting any key that is already known.
    pub fn merge(
        &mut self,
        rows: Vec<(MappingKey, CustomField)>,
        file: &str,
    ) -> Result<(), FieldMappingError> {
        for (key, field) in rows {
            let duplicate = match key {
                MappingKey::Element(id) => self.elements.insert(id, field).is_some(),
                MappingKey::Enterprise { pen, element } => {
                    self.enterprise.insert((pen, element), field).is_some()
                }
            };
            if duplicate {
                return Err(FieldMappingError::Duplicate {
                    file: file.to_string(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.enterprise.is_empty()
    }
}

fn load_file(path: &str, expected: MappingFile) -> Result<Vec<(MappingKey, CustomField)>, FieldMappingError> {
    let file = std::fs::File::open(path).map_err(|e| {
        error!("Unable to open field mapping file {path}: {e:?}");
        FieldMappingError::OpenFail(path.to_string())
    })?;
    parse_field_mappings(file, path, expected)
}

/// Parses `key,name,kind` rows from any reader. `file` is only used to
/// label errors.
pub fn parse_field_mappings<R: Read>(
    reader: R,
    file: &str,
    expected: MappingFile,
) -> Result<Vec<(MappingKey, CustomField)>, FieldMappingError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for result in reader.records() {
        let record = result.map_err(|e| FieldMappingError::Csv {
            file: file.to_string(),
            message: e.to_string(),
        })?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let row = MappingRow::from_csv(&record, file, expected)?;
        if !seen.insert(row.key) {
            return Err(FieldMappingError::Duplicate {
                file: file.to_string(),
                key: row.key.to_string(),
            });
        }
        rows.push((
            row.key,
            CustomField {
                name: row.name,
                kind: row.kind,
            },
        ));
    }
    Ok(rows)
}

#[derive(Error, Debug)]
pub enum FieldMappingError {
    #[error("Unable to open/read field mapping file {0}")]
    OpenFail(String),
    #[error("CSV error in {file}: {message}")]
    Csv { file: String, message: String },
    #[error("{file} line {line}: expected 3 entries (key,name,kind), found {found}")]
    ColumnCount { file: String, line: u64, found: usize },
    #[error("{file} line {line}: key {key:?} does not match pattern {expected}; maybe wrong file")]
    BadKey {
        file: String,
        line: u64,
        key: String,
        expected: &'static str,
    },
    #[error("{file} line {line}: unknown decode kind {kind:?}")]
    UnknownKind { file: String, line: u64, kind: String },
    #[error("{file} line {line}: field name may not be empty")]
    EmptyName { file: String, line: u64 },
    #[error("Duplicate entries for ID {key:?} in {file}")]
    Duplicate { file: String, key: String },
}

#[cfg(test)]
mod test {
    use super::*;

    const CUSTOM: &str = "# id,name,kind\n95, app_id ,uint\n\n0x81a0,vendor_flags,hex\n";
    const PEN: &str = "29305.12,subscriber,string\n29305.13,nat_ip,ip\n";

    #[test]
    fn parse_custom_file() {
        let rows = parse_field_mappings(CUSTOM.as_bytes(), "custom.csv", MappingFile::Custom).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, MappingKey::Element(95));
        assert_eq!(rows[0].1.name, "app_id");
        assert_eq!(rows[1].0, MappingKey::Element(0x81a0));
        assert_eq!(rows[1].1.kind, DecodeKind::Hex);
    }

    #[test]
    fn merge_custom_and_pen() {
        let mut mappings = FieldMappings::default();
        let custom = parse_field_mappings(CUSTOM.as_bytes(), "custom.csv", MappingFile::Custom).unwrap();
        let pen = parse_field_mappings(PEN.as_bytes(), "pen.csv", MappingFile::Enterprise).unwrap();
        mappings.merge(custom, "custom.csv").unwrap();
        mappings.merge(pen, "pen.csv").unwrap();
        assert_eq!(mappings.elements.len(), 2);
        assert_eq!(mappings.enterprise[&(29305, 13)].kind, DecodeKind::Ip);
    }

    #[test]
    fn duplicates_are_fatal() {
        let doubled = "1,a,uint\n1,b,uint\n";
        let result = parse_field_mappings(doubled.as_bytes(), "dup.csv", MappingFile::Custom);
        assert!(matches!(result, Err(FieldMappingError::Duplicate { .. })));

        let mut mappings = FieldMappings::default();
        let pen = parse_field_mappings(PEN.as_bytes(), "pen.csv", MappingFile::Enterprise).unwrap();
        mappings.merge(pen.clone(), "pen_a.csv").unwrap();
        assert!(mappings.merge(pen, "pen_b.csv").is_err());
    }

    #[test]
    fn wrong_column_count() {
        let result = parse_field_mappings("1,a\n".as_bytes(), "short.csv", MappingFile::Custom);
        assert!(matches!(result, Err(FieldMappingError::ColumnCount { .. })));
    }

    #[test]
    fn missing_file_is_reported() {
        let config = DecoderConfig {
            custom_field_mappings: Some("/nonexistent/nflowd/fields.csv".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            FieldMappings::load(&config),
            Err(FieldMappingError::OpenFail(_))
        ));
    }

    #[test]
    fn no_files_means_empty() {
        let mappings = FieldMappings::load(&DecoderConfig::default()).unwrap();
        assert!(mappings.is_empty());
    }
}
