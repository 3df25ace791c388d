//! Extracted field types
//!
//! Each document kind carries its own fixed field set, so "which fields exist
//! for which card" is decided by the type rather than by map lookups.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Value reported for a field whose pattern did not match
pub const NOT_FOUND: &str = "Not found";

/// Display names, in display order
pub const ID_TYPE: &str = "ID Type";
pub const PAN: &str = "PAN";
pub const AADHAAR_NUMBER: &str = "Aadhaar Number";
pub const NAME: &str = "Name";
pub const FATHER_NAME: &str = "Father Name";
pub const DATE_OF_BIRTH: &str = "Date of Birth";
pub const SEX: &str = "Sex";

/// Document template detected from the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Permanent Account Number card (Income Tax Department)
    Pan,
    /// Aadhaar card (Government of India)
    Aadhaar,
    /// Neither keyword set matched
    Unknown,
}

impl DocumentKind {
    /// Value shown under `ID Type`, if the kind was recognized
    pub fn label(&self) -> Option<&'static str> {
        match self {
            DocumentKind::Pan => Some("PAN"),
            DocumentKind::Aadhaar => Some("Aadhaar"),
            DocumentKind::Unknown => None,
        }
    }
}

/// Sex printed on an Aadhaar card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Fields read from a PAN card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanFields {
    pub pan: String,
    pub name: String,
    pub father_name: String,
    pub date_of_birth: String,
}

/// Fields read from an Aadhaar card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AadhaarFields {
    pub aadhaar_number: String,
    pub name: String,
    pub date_of_birth: String,
    pub sex: Sex,
}

/// Result of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedFields {
    Pan(PanFields),
    Aadhaar(AadhaarFields),
    /// Classification failed; displays as an empty map
    Unknown,
}

impl ExtractedFields {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ExtractedFields::Pan(_) => DocumentKind::Pan,
            ExtractedFields::Aadhaar(_) => DocumentKind::Aadhaar,
            ExtractedFields::Unknown => DocumentKind::Unknown,
        }
    }

    /// True when nothing was extracted
    pub fn is_empty(&self) -> bool {
        matches!(self, ExtractedFields::Unknown)
    }

    /// Ordered `(field name, value)` pairs for display, `ID Type` first
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        match self {
            ExtractedFields::Pan(fields) => vec![
                (ID_TYPE, "PAN"),
                (PAN, fields.pan.as_str()),
                (NAME, fields.name.as_str()),
                (FATHER_NAME, fields.father_name.as_str()),
                (DATE_OF_BIRTH, fields.date_of_birth.as_str()),
            ],
            ExtractedFields::Aadhaar(fields) => vec![
                (ID_TYPE, "Aadhaar"),
                (AADHAAR_NUMBER, fields.aadhaar_number.as_str()),
                (NAME, fields.name.as_str()),
                (DATE_OF_BIRTH, fields.date_of_birth.as_str()),
                (SEX, fields.sex.as_str()),
            ],
            ExtractedFields::Unknown => Vec::new(),
        }
    }

    /// Look up a single field by display name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

impl Serialize for ExtractedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Collapse an optional match into a display value: trimmed match or `"Not found"`
pub fn normalize(raw: Option<&str>) -> String {
    match raw {
        Some(value) => value.trim().to_string(),
        None => NOT_FOUND.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_aadhaar() -> ExtractedFields {
        ExtractedFields::Aadhaar(AadhaarFields {
            aadhaar_number: "1234 5678 9012".to_string(),
            name: "John Smith".to_string(),
            date_of_birth: NOT_FOUND.to_string(),
            sex: Sex::Female,
        })
    }

    #[test]
    fn test_normalize_trims_match() {
        assert_eq!(normalize(Some("  ABCDE1234F\t")), "ABCDE1234F");
        assert_eq!(normalize(Some("Jane Doe")), "Jane Doe");
    }

    #[test]
    fn test_normalize_missing_is_sentinel() {
        assert_eq!(normalize(None), NOT_FOUND);
    }

    #[test]
    fn test_entries_order_aadhaar() {
        let fields = sample_aadhaar();
        let keys: Vec<&str> = fields.entries().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![ID_TYPE, AADHAAR_NUMBER, NAME, DATE_OF_BIRTH, SEX]);
        assert_eq!(fields.get(SEX), Some("Female"));
        assert_eq!(fields.get(FATHER_NAME), None);
    }

    #[test]
    fn test_unknown_is_empty() {
        let fields = ExtractedFields::Unknown;
        assert!(fields.is_empty());
        assert!(fields.entries().is_empty());
        assert_eq!(fields.get(ID_TYPE), None);
        assert_eq!(fields.kind().label(), None);
    }

    #[test]
    fn test_json_keeps_display_order() {
        let json = serde_json::to_string(&sample_aadhaar()).unwrap();
        assert!(json.starts_with(r#"{"ID Type":"Aadhaar","Aadhaar Number":"1234 5678 9012""#));
        assert!(json.ends_with(r#""Sex":"Female"}"#));

        let empty = serde_json::to_string(&ExtractedFields::Unknown).unwrap();
        assert_eq!(empty, "{}");
    }
}
