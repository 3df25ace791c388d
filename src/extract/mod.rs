//! Document field extraction
//!
//! Classifies an OCR transcript as a PAN or Aadhaar card with a keyword gate,
//! then pulls fields out with regular expressions anchored on nearby labels.
//! Transcripts are the comma-joined recognizer output, so every fragment is
//! treated as its own line.

pub mod fields;

pub use fields::{
    normalize, AadhaarFields, DocumentKind, ExtractedFields, PanFields, Sex, NOT_FOUND,
};

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Checked first; any hit classifies the transcript as PAN
const PAN_KEYWORDS: &[&str] = &["income", "tax", "department"];

/// Checked only when no PAN keyword matched
const AADHAAR_KEYWORDS: &[&str] = &["male", "female", "government of india"];

static PAN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{5}[0-9]{4}[A-Z]").expect("failed to compile regex"));

// A value runs to the end of its line: newline, fragment separator or end of text.
static PAN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Name\s([^\n,]+)").expect("failed to compile regex"));

static PAN_FATHER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Father's Name\s([^\n,]+)").expect("failed to compile regex")
});

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}").expect("failed to compile regex"));

static AADHAAR_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}\s\d{4}\s\d{4}").expect("failed to compile regex"));

// Any two adjacent title-case words. A leading "Name" label is consumed, not captured.
static AADHAAR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Name\s+)?([A-Z][a-z]+ [A-Z][a-z]+)").expect("failed to compile regex")
});

static AADHAAR_DOB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:DOB|Date of Birth)?\s*:?\s*(\d{2}/\d{2}/\d{4})")
        .expect("failed to compile regex")
});

/// Decide which card template a transcript belongs to.
///
/// First match wins: PAN keywords are tested before Aadhaar keywords, so a
/// transcript containing both is always PAN.
pub fn classify(text: &str) -> DocumentKind {
    let lower = text.to_lowercase();

    if PAN_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        DocumentKind::Pan
    } else if AADHAAR_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        DocumentKind::Aadhaar
    } else {
        DocumentKind::Unknown
    }
}

/// Classify a transcript and extract the fields for its document kind.
///
/// Pure function of its input; calling it twice on the same text yields
/// identical output.
pub fn extract_fields(text: &str) -> ExtractedFields {
    let kind = classify(text);
    debug!("Classified transcript ({} chars) as {:?}", text.len(), kind);

    match kind {
        DocumentKind::Pan => ExtractedFields::Pan(extract_pan(text)),
        DocumentKind::Aadhaar => ExtractedFields::Aadhaar(extract_aadhaar(text)),
        DocumentKind::Unknown => ExtractedFields::Unknown,
    }
}

fn extract_pan(text: &str) -> PanFields {
    PanFields {
        pan: normalize(first_match(&PAN_NUMBER, text)),
        name: normalize(first_capture(&PAN_NAME, text)),
        father_name: normalize(first_capture(&PAN_FATHER_NAME, text)),
        date_of_birth: normalize(first_match(&DATE, text)),
    }
}

fn extract_aadhaar(text: &str) -> AadhaarFields {
    AadhaarFields {
        aadhaar_number: normalize(first_match(&AADHAAR_NUMBER, text)),
        name: normalize(first_capture(&AADHAAR_NAME, text)),
        date_of_birth: normalize(first_capture(&AADHAAR_DOB, text)),
        sex: detect_sex(text),
    }
}

/// `Female` iff "female" appears anywhere, otherwise `Male`
fn detect_sex(text: &str) -> Sex {
    if text.to_lowercase().contains("female") {
        Sex::Female
    } else {
        Sex::Male
    }
}

fn first_match<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern.find(text).map(|m| m.as_str())
}

fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::fields::{
        AADHAAR_NUMBER as AADHAAR_NUMBER_KEY, DATE_OF_BIRTH, FATHER_NAME, ID_TYPE, NAME, PAN, SEX,
    };
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("INCOME TAX DEPARTMENT"), DocumentKind::Pan);
        assert_eq!(classify("Government of India"), DocumentKind::Aadhaar);
        assert_eq!(classify("FEMALE"), DocumentKind::Aadhaar);
        // PAN keywords win even when Aadhaar keywords are present
        assert_eq!(classify("Government of India,Tax,Male"), DocumentKind::Pan);
        assert_eq!(classify("hello world"), DocumentKind::Unknown);
        assert_eq!(classify(""), DocumentKind::Unknown);
    }

    #[test]
    fn test_pan_number_extracted() {
        let fields = extract_fields("income tax department,ABCDE1234F");
        assert_eq!(fields.get(ID_TYPE), Some("PAN"));
        assert_eq!(fields.get(PAN), Some("ABCDE1234F"));
    }

    #[test]
    fn test_pan_example_fully_populated() {
        let text = "INCOME TAX DEPARTMENT,Name Jane Doe,Father's Name John Doe,ABCDE1234F,01/01/1990";
        let fields = extract_fields(text);

        assert_eq!(
            fields,
            ExtractedFields::Pan(PanFields {
                pan: "ABCDE1234F".to_string(),
                name: "Jane Doe".to_string(),
                father_name: "John Doe".to_string(),
                date_of_birth: "01/01/1990".to_string(),
            })
        );
        assert!(fields.entries().iter().all(|(_, value)| *value != NOT_FOUND));
    }

    #[test]
    fn test_pan_name_stops_at_line_break() {
        let text = "Income Tax Department\nNAME  RAHUL KUMAR\nFATHER'S NAME SURESH KUMAR\n";
        let fields = extract_fields(text);
        assert_eq!(fields.get(NAME), Some("RAHUL KUMAR"));
        assert_eq!(fields.get(FATHER_NAME), Some("SURESH KUMAR"));
    }

    #[test]
    fn test_pan_missing_fields_are_sentinel() {
        let fields = extract_fields("INCOME TAX DEPARTMENT,GOVT. OF INDIA");
        assert_eq!(fields.get(ID_TYPE), Some("PAN"));
        assert_eq!(fields.get(PAN), Some(NOT_FOUND));
        assert_eq!(fields.get(NAME), Some(NOT_FOUND));
        assert_eq!(fields.get(FATHER_NAME), Some(NOT_FOUND));
        assert_eq!(fields.get(DATE_OF_BIRTH), Some(NOT_FOUND));
    }

    #[test]
    fn test_pan_number_is_case_sensitive() {
        let fields = extract_fields("income tax,abcde1234f");
        assert_eq!(fields.get(PAN), Some(NOT_FOUND));
    }

    #[test]
    fn test_aadhaar_number_extracted() {
        let fields = extract_fields("Government of India,1234 5678 9012");
        assert_eq!(fields.get(ID_TYPE), Some("Aadhaar"));
        assert_eq!(fields.get(AADHAAR_NUMBER_KEY), Some("1234 5678 9012"));
    }

    #[test]
    fn test_aadhaar_example() {
        let text = "GOVERNMENT OF INDIA,Name John Smith,1234 5678 9012,Male,DOB: 01/01/1990";
        let fields = extract_fields(text);

        assert_eq!(
            fields,
            ExtractedFields::Aadhaar(AadhaarFields {
                aadhaar_number: "1234 5678 9012".to_string(),
                name: "John Smith".to_string(),
                date_of_birth: "01/01/1990".to_string(),
                sex: Sex::Male,
            })
        );
        assert_eq!(
            fields.entries(),
            vec![
                (ID_TYPE, "Aadhaar"),
                (AADHAAR_NUMBER_KEY, "1234 5678 9012"),
                (NAME, "John Smith"),
                (DATE_OF_BIRTH, "01/01/1990"),
                (SEX, "Male"),
            ]
        );
    }

    #[test]
    fn test_aadhaar_sex_is_total() {
        for (text, expected) in [
            ("Government of India", "Male"),
            ("Government of India,FEMALE", "Female"),
            ("female", "Female"),
            ("MALE", "Male"),
            ("Government of India,Female,Male", "Female"),
        ] {
            let fields = extract_fields(text);
            assert_eq!(fields.get(SEX), Some(expected), "transcript: {text}");
        }
    }

    #[test]
    fn test_aadhaar_name_bigram_heuristic() {
        // Without a label, the first capitalized bigram wins, whatever it is
        let fields = extract_fields("Government of India,Uttar Pradesh,Priya Sharma,Female");
        assert_eq!(fields.get(NAME), Some("Uttar Pradesh"));

        let fields = extract_fields("GOVERNMENT OF INDIA,PRIYA SHARMA,FEMALE");
        assert_eq!(fields.get(NAME), Some(NOT_FOUND));
    }

    #[test]
    fn test_aadhaar_dob_label_variants() {
        for text in [
            "Male,DOB: 15/08/1985",
            "Male,Date of Birth 15/08/1985",
            "Male,dob:15/08/1985",
            "Male,15/08/1985",
        ] {
            let fields = extract_fields(text);
            assert_eq!(fields.get(DATE_OF_BIRTH), Some("15/08/1985"), "transcript: {text}");
        }
    }

    #[test]
    fn test_unknown_transcript_is_empty() {
        assert_eq!(extract_fields(""), ExtractedFields::Unknown);
        assert!(extract_fields("Driving Licence,Union of Somewhere").entries().is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "GOVERNMENT OF INDIA,Name John Smith,1234 5678 9012,Male,DOB: 01/01/1990";
        assert_eq!(extract_fields(text), extract_fields(text));

        let text = "INCOME TAX DEPARTMENT,Name Jane Doe,ABCDE1234F";
        assert_eq!(extract_fields(text), extract_fields(text));
    }

    #[test]
    fn test_matched_values_are_trimmed() {
        let fields = extract_fields("INCOME TAX DEPARTMENT,Name \t Jane Doe \t,Father's Name  John Doe ");
        assert_eq!(fields.get(NAME), Some("Jane Doe"));
        assert_eq!(fields.get(FATHER_NAME), Some("John Doe"));
    }
}
