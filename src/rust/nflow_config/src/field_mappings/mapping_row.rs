use super::{FieldMappingError, MappingFile};
use csv::StringRecord;
use nflow_utils::hex_string::read_hex_string;
use std::fmt;
use std::str::FromStr;

/// How the raw bytes of a custom field are turned into a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeKind {
    Uint,
    Int,
    Float,
    Bool,
    Hex,
    String,
    Ip,
    Mac,
    Proto,
}

impl FromStr for DecodeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uint" => Ok(Self::Uint),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "bool" => Ok(Self::Bool),
            "hex" => Ok(Self::Hex),
            "string" => Ok(Self::String),
            "ip" => Ok(Self::Ip),
            "mac" => Ok(Self::Mac),
            "proto" => Ok(Self::Proto),
            _ => Err(()),
        }
    }
}

/// Identifies the element a mapping row applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MappingKey {
    /// A standard element id, written `<id>`.
    Element(u16),
    /// An enterprise-specific element, written `<PEN>.<id>`.
    Enterprise { pen: u32, element: u16 },
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingKey::Element(id) => write!(f, "{id}"),
            MappingKey::Enterprise { pen, element } => write!(f, "{pen}.{element}"),
        }
    }
}

/// A single `key,name,kind` row.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MappingRow {
    pub(crate) key: MappingKey,
    pub(crate) name: String,
    pub(crate) kind: DecodeKind,
}

impl MappingRow {
    pub(crate) fn from_csv(
        record: &StringRecord,
        file: &str,
        expected: MappingFile,
    ) -> Result<Self, FieldMappingError> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != 3 {
            return Err(FieldMappingError::ColumnCount {
                file: file.to_string(),
                line,
                found: record.len(),
            });
        }

        let bad_key = || FieldMappingError::BadKey {
            file: file.to_string(),
            line,
            key: record[0].to_string(),
            expected: expected.pattern(),
        };
        let key = match expected {
            MappingFile::Custom => {
                MappingKey::Element(parse_element_id(&record[0]).ok_or_else(bad_key)?)
            }
            MappingFile::Enterprise => {
                let (pen, element) = record[0].split_once('.').ok_or_else(bad_key)?;
                MappingKey::Enterprise {
                    pen: pen.parse().map_err(|_| bad_key())?,
                    element: parse_element_id(element).ok_or_else(bad_key)?,
                }
            }
        };

        let name = record[1].to_string();
        if name.is_empty() {
            return Err(FieldMappingError::EmptyName {
                file: file.to_string(),
                line,
            });
        }

        let kind = record[2]
            .parse::<DecodeKind>()
            .map_err(|_| FieldMappingError::UnknownKind {
                file: file.to_string(),
                line,
                kind: record[2].to_string(),
            })?;

        Ok(Self { key, name, kind })
    }
}

/// Element ids may be written in decimal or as `0x`-prefixed hex.
fn parse_element_id(raw: &str) -> Option<u16> {
    let value = if raw.starts_with("0x") || raw.starts_with("0X") {
        read_hex_string(raw).ok()?
    } else {
        raw.parse::<u32>().ok()?
    };
    u16::try_from(value).ok()
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn parse_custom_row() {
        let row = MappingRow::from_csv(&record(&["95", "app_id", "uint"]), "x.csv", MappingFile::Custom)
            .unwrap();
        assert_eq!(row.key, MappingKey::Element(95));
        assert_eq!(row.name, "app_id");
        assert_eq!(row.kind, DecodeKind::Uint);
    }

    #[test]
    fn parse_hex_element_id() {
        let row = MappingRow::from_csv(&record(&["0x81A0", "vendor", "hex"]), "x.csv", MappingFile::Custom)
            .unwrap();
        assert_eq!(row.key, MappingKey::Element(0x81A0));
    }

    #[test]
    fn parse_enterprise_row() {
        let row = MappingRow::from_csv(
            &record(&["29305.12", "subscriber", "string"]),
            "pen.csv",
            MappingFile::Enterprise,
        )
        .unwrap();
        assert_eq!(
            row.key,
            MappingKey::Enterprise {
                pen: 29305,
                element: 12
            }
        );
        assert_eq!(row.key.to_string(), "29305.12");
    }

    #[test]
    fn reject_wrong_key_shape() {
        let result = MappingRow::from_csv(&record(&["12", "x", "uint"]), "pen.csv", MappingFile::Enterprise);
        assert!(matches!(result, Err(FieldMappingError::BadKey { .. })));
        let result = MappingRow::from_csv(&record(&["1.2", "x", "uint"]), "x.csv", MappingFile::Custom);
        assert!(matches!(result, Err(FieldMappingError::BadKey { .. })));
        let result = MappingRow::from_csv(&record(&["70000", "x", "uint"]), "x.csv", MappingFile::Custom);
        assert!(matches!(result, Err(FieldMappingError::BadKey { .. })));
    }

    #[test]
    fn reject_unknown_kind() {
        let result = MappingRow::from_csv(&record(&["1", "x", "blob"]), "x.csv", MappingFile::Custom);
        assert!(matches!(result, Err(FieldMappingError::UnknownKind { .. })));
    }
}
