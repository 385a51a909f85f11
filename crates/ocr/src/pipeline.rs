use std::path::Path;

use thiserror::Error;

use crate::preprocess::{self, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("OCR produced no text")]
    NoText,
}

/// Turns a receipt photo into one linearized text blob:
/// read → preprocess → recognize → linearize.
///
/// Every failure mode — unreadable file, undecodable image, engine error,
/// empty or all-whitespace recognition — comes back as an `ExtractError`;
/// callers treat them all as "OCR failed", the variants exist so the log can
/// say which one it was.
pub struct TextExtractor<R: OcrBackend> {
    recognizer: R,
}

impl<R: OcrBackend> TextExtractor<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    /// Process a receipt image on disk. Does not modify the file.
    pub async fn extract_file(&self, path: &Path) -> Result<String, ExtractError> {
        tracing::info!(path = %path.display(), "running OCR on receipt image");
        let bytes = tokio::fs::read(path).await?;
        self.extract_bytes(&bytes)
    }

    /// Process raw image bytes already in memory.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<String, ExtractError> {
        let normalized = preprocess::prepare_for_ocr_from_bytes(data)?;
        let document = self.recognizer.recognize(&normalized)?;

        if document.is_empty() {
            tracing::warn!("OCR returned no pages");
            return Err(ExtractError::NoText);
        }

        let text = document.linearize();
        if text.trim().is_empty() {
            tracing::warn!("OCR recognized only whitespace");
            return Err(ExtractError::NoText);
        }

        tracing::debug!(chars = text.len(), "extracted receipt text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::recognizer::MockRecognizer;
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([200u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn extract_bytes_returns_linearized_text() {
        let extractor =
            TextExtractor::new(MockRecognizer::from_text("Transaction Number AB0123"));
        let text = extractor.extract_bytes(&tiny_png()).unwrap();
        assert_eq!(text, "Transaction Number AB0123\n");
    }

    #[test]
    fn empty_document_is_no_text() {
        let extractor = TextExtractor::new(MockRecognizer::new(Document::default()));
        assert!(matches!(
            extractor.extract_bytes(&tiny_png()),
            Err(ExtractError::NoText)
        ));
    }

    #[test]
    fn engine_failure_surfaces_as_ocr_error() {
        let extractor = TextExtractor::new(MockRecognizer::failing("model crashed"));
        assert!(matches!(
            extractor.extract_bytes(&tiny_png()),
            Err(ExtractError::Ocr(_))
        ));
    }

    #[test]
    fn corrupt_image_surfaces_as_preprocess_error() {
        let extractor = TextExtractor::new(MockRecognizer::from_text("unreached"));
        assert!(matches!(
            extractor.extract_bytes(b"definitely not an image"),
            Err(ExtractError::Preprocess(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_surfaces_as_io_error() {
        let extractor = TextExtractor::new(MockRecognizer::from_text("unreached"));
        let missing = std::path::Path::new("/nonexistent/receipt.jpg");
        assert!(matches!(
            extractor.extract_file(missing).await,
            Err(ExtractError::Io(_))
        ));
    }

    #[tokio::test]
    async fn extract_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.png");
        std::fs::write(&path, tiny_png()).unwrap();

        let extractor = TextExtractor::new(MockRecognizer::from_text("hello receipt"));
        let text = extractor.extract_file(&path).await.unwrap();
        assert_eq!(text, "hello receipt\n");
        // The input image is left untouched.
        assert!(path.exists());
    }
}
