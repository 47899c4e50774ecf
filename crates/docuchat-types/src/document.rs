//! Uploaded-document metadata as listed by the backend.

use serde::{Deserialize, Serialize};

/// A document available for question answering.
///
/// The backend identifies documents by filename; `id` and `name` are
/// usually the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    /// File kind reported by the backend (e.g. "pdf").
    pub kind: String,
    /// Processing status (e.g. "Ready").
    pub status: String,
}

impl Document {
    /// Build a document entry from a bare filename, as returned by the
    /// legacy `pdfs` list shape.
    pub fn from_filename(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            kind: "pdf".to_string(),
            status: "Ready".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filename() {
        let doc = Document::from_filename("report.pdf");
        assert_eq!(doc.id, "report.pdf");
        assert_eq!(doc.name, "report.pdf");
        assert_eq!(doc.kind, "pdf");
        assert_eq!(doc.status, "Ready");
    }
}
