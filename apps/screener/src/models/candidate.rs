use bytes::Bytes;

/// One résumé as submitted by the caller, before text extraction.
#[derive(Debug, Clone)]
pub struct CandidateSubmission {
    pub name: String,
    pub source: CandidateSource,
}

#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// An uploaded file; text is extracted by the document extractor.
    Document { file_name: String, bytes: Bytes },
    /// Text that was already extracted upstream.
    Text(String),
}

impl CandidateSubmission {
    pub fn document(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        Self {
            name: file_name.clone(),
            source: CandidateSource::Document {
                file_name,
                bytes: bytes.into(),
            },
        }
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: CandidateSource::Text(text.into()),
        }
    }
}

/// A candidate whose text has been extracted successfully.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub name: String,
    pub text: String,
}
