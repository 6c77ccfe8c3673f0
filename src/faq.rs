//! FAQ corpus loading
//!
//! The FAQ document is read once at startup. Its records are opaque JSON
//! values rendered verbatim into the system prompt, so no schema is enforced.

use std::path::Path;

use serde_json::Value;

use crate::Result;

/// FAQ document loaded at startup
///
/// The parsed document is kept as is and rendered unchanged into the prompt.
/// A top-level array is also viewed as its records; any other document is a
/// single record.
#[derive(Debug, Clone, PartialEq)]
pub struct Faq {
    document: Value,
}

impl Faq {
    /// Build a corpus from already-parsed records
    #[must_use]
    pub const fn new(records: Vec<Value>) -> Self {
        Self {
            document: Value::Array(records),
        }
    }

    /// The document as parsed
    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.document
    }

    /// Records in document order
    #[must_use]
    pub fn records(&self) -> &[Value] {
        match &self.document {
            Value::Array(records) => records,
            other => std::slice::from_ref(other),
        }
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Whether the corpus is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Serialize the document as two-space indented JSON
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.document).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for Faq {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Value> for Faq {
    fn from(document: Value) -> Self {
        Self { document }
    }
}

/// Read and parse the FAQ document
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid JSON
pub fn try_load(path: &Path) -> Result<Faq> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    Ok(Faq::from(value))
}

/// Load the FAQ document, falling back to an empty corpus on any failure
///
/// A missing or malformed file never prevents startup; the relay simply
/// answers with less context.
#[must_use]
pub fn load(path: &Path) -> Faq {
    match try_load(path) {
        Ok(faq) => {
            tracing::info!(path = %path.display(), records = faq.len(), "loaded FAQ data");
            faq
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load FAQ data, continuing with empty corpus"
            );
            Faq::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_array_preserves_order() {
        let file = write_temp(
            r#"[{"question": "Do you deliver?", "answer": "Yes"}, {"question": "Prices?", "answer": "Varies"}]"#,
        );
        let faq = load(file.path());

        assert_eq!(faq.len(), 2);
        assert_eq!(faq.records()[0]["question"], "Do you deliver?");
        assert_eq!(faq.records()[1]["question"], "Prices?");
    }

    #[test]
    fn test_load_object_becomes_single_record() {
        let file = write_temp(r#"{"faqs": []}"#);
        let faq = load(file.path());
        assert_eq!(faq.records(), &[json!({"faqs": []})]);
        assert_eq!(faq.len(), 1);
    }

    #[test]
    fn test_object_document_renders_unchanged() {
        let document = json!({"faqs": [{"q": "a"}]});
        let faq = Faq::from(document.clone());

        assert_eq!(faq.document(), &document);
        assert_eq!(
            faq.to_pretty_json(),
            serde_json::to_string_pretty(&document).unwrap()
        );
        assert!(faq.to_pretty_json().starts_with("{\n  \"faqs\""));
    }

    #[test]
    fn test_missing_file_yields_empty() {
        let faq = load(Path::new("/nonexistent/faq.json"));
        assert!(faq.is_empty());
    }

    #[test]
    fn test_malformed_file_yields_empty() {
        let file = write_temp("{ not json");
        assert!(try_load(file.path()).is_err());
        assert!(load(file.path()).is_empty());
    }

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let faq = Faq::new(vec![json!({"q": "a"})]);
        assert_eq!(faq.to_pretty_json(), "[\n  {\n    \"q\": \"a\"\n  }\n]");
        assert_eq!(Faq::default().to_pretty_json(), "[]");
    }
}
