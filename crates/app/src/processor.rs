use std::path::Path;

use birrcheck_ocr::{find_transaction_number, OcrBackend, TextExtractor};
use birrcheck_verify::{ReceiptGateway, ReceiptOutcome, ReceiptVerifier, VerifierConfig};

/// Drives one receipt image through the whole flow:
/// OCR → transaction-number extraction → candidate verification → outcome.
///
/// Constructed once; the OCR backend inside is loaded a single time and
/// reused for every image. No state carries over between images.
pub struct ReceiptProcessor<R: OcrBackend, G: ReceiptGateway> {
    extractor: TextExtractor<R>,
    verifier: ReceiptVerifier<G>,
}

impl<R: OcrBackend, G: ReceiptGateway> ReceiptProcessor<R, G> {
    pub fn new(recognizer: R, gateway: G, config: VerifierConfig) -> Self {
        Self {
            extractor: TextExtractor::new(recognizer),
            verifier: ReceiptVerifier::new(gateway, config),
        }
    }

    /// Process one image, then delete it (unless `keep`) no matter how
    /// processing ended. The submitted file is never needed again: on
    /// success the lookup URL is the durable record, on failure the user
    /// must submit a fresh photo anyway.
    pub async fn process_and_cleanup(&self, path: &Path, keep: bool) -> ReceiptOutcome {
        let outcome = self.process_image(path).await;
        if !keep {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), "failed to remove processed image: {e}");
            }
        }
        outcome
    }

    pub async fn process_image(&self, path: &Path) -> ReceiptOutcome {
        let text = match self.extractor.extract_file(path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), "text extraction failed: {e}");
                return ReceiptOutcome::NoTransactionId;
            }
        };

        let Some(tx_id) = find_transaction_number(&text) else {
            tracing::warn!(path = %path.display(), "no transaction number in extracted text");
            return ReceiptOutcome::NoTransactionId;
        };
        tracing::info!(tx_id = %tx_id, "transaction number extracted");

        match self.verifier.verify(&tx_id).await {
            Ok(verification) => ReceiptOutcome::from_verification(verification),
            Err(e) => {
                tracing::error!(tx_id = %tx_id, "verification aborted: {e}");
                ReceiptOutcome::TransportError { reason: e.to_string() }
            }
        }
    }
}
