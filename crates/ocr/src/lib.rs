pub mod document;
pub mod extract;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use document::{Block, Document, Line, Page, Word};
pub use extract::find_transaction_number;
pub use pipeline::{ExtractError, TextExtractor};
pub use preprocess::{prepare_for_ocr, prepare_for_ocr_from_bytes, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
