use thiserror::Error;

use crate::document::Document;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available — build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
/// Implementations accept raw PNG/JPEG image bytes and return the recognized
/// page → block → line → word hierarchy. Backends are constructed once at
/// startup and shared read-only across all submissions.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Document, OcrError>;
}

impl<T: OcrBackend + ?Sized> OcrBackend for Box<T> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Document, OcrError> {
        (**self).recognize(image_bytes)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set document — useful for exercising the extraction and
/// verification pipeline without an OCR engine installed.
pub struct MockRecognizer {
    result: Result<Document, String>,
}

impl MockRecognizer {
    pub fn new(document: Document) -> Self {
        Self { result: Ok(document) }
    }

    /// Canned recognizer built from flat text (one page, one block).
    pub fn from_text(text: &str) -> Self {
        Self::new(Document::from_plain_text(text))
    }

    /// A recognizer whose every call fails with an engine error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { result: Err(message.into()) }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Document, OcrError> {
        match &self.result {
            Ok(doc) => Ok(doc.clone()),
            Err(msg) => Err(OcrError::Engine(msg.clone())),
        }
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{Document, OcrBackend, OcrError};
    use leptess::LepTess;

    /// Tesseract emits flat UTF-8 text; we fold it into a single-page
    /// document so callers only ever deal with the hierarchy.
    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<Document, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let text = lt
                .get_utf8_text()
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(Document::from_plain_text(&text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_document() {
        let r = MockRecognizer::from_text("Transaction Number AB0123");
        let doc = r.recognize(b"fake image data").unwrap();
        assert_eq!(doc.linearize(), "Transaction Number AB0123\n");
    }

    #[test]
    fn mock_ignores_image_content() {
        let r = MockRecognizer::from_text("hello");
        assert_eq!(r.recognize(b"anything").unwrap(), r.recognize(b"").unwrap());
    }

    #[test]
    fn failing_mock_reports_engine_error() {
        let r = MockRecognizer::failing("model exploded");
        let err = r.recognize(b"img").unwrap_err();
        assert!(matches!(err, OcrError::Engine(_)));
    }

    #[test]
    fn boxed_backend_delegates() {
        let boxed: Box<dyn OcrBackend> = Box::new(MockRecognizer::from_text("boxed"));
        assert_eq!(boxed.recognize(b"x").unwrap().linearize(), "boxed\n");
    }
}
