use serde::Serialize;

use crate::verifier::Verification;

/// Terminal state of one receipt submission. Every processing run ends in
/// exactly one of these, and each maps to one user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReceiptOutcome {
    /// The raw OCR'd transaction number validated as-is.
    Verified { tx_id: String, url: String },
    /// A character-substituted variant validated; `original` is the raw id.
    VerifiedAfterCorrection { tx_id: String, original: String, url: String },
    /// Every candidate was rejected by the lookup service.
    NotVerified,
    /// OCR failed, the label was missing, or nothing followed it.
    NoTransactionId,
    /// A network-level failure cut the verification short. Retryable.
    TransportError { reason: String },
}

impl ReceiptOutcome {
    pub fn from_verification(verification: Verification) -> Self {
        match verification {
            Verification::Verified(receipt) => match receipt.corrected_from {
                Some(original) => ReceiptOutcome::VerifiedAfterCorrection {
                    tx_id: receipt.tx_id,
                    original,
                    url: receipt.url,
                },
                None => ReceiptOutcome::Verified { tx_id: receipt.tx_id, url: receipt.url },
            },
            Verification::NotVerified => ReceiptOutcome::NotVerified,
        }
    }

    /// Whether submitting the same image again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReceiptOutcome::TransportError { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            ReceiptOutcome::Verified { url, .. } => {
                format!("✅ The receipt is valid. View the full receipt here: {url}")
            }
            ReceiptOutcome::VerifiedAfterCorrection { tx_id, original, url } => format!(
                "✅ The receipt is valid after correcting an OCR error ({original} → {tx_id}). \
                 View the full receipt here: {url}"
            ),
            ReceiptOutcome::NotVerified => {
                "❌ The receipt could not be verified. It appears to be invalid or there was an OCR error."
                    .to_string()
            }
            ReceiptOutcome::NoTransactionId => {
                "Could not find a transaction number in the receipt. Please try again with a clearer image."
                    .to_string()
            }
            ReceiptOutcome::TransportError { .. } => {
                "An error occurred while trying to verify the receipt. Please try again later."
                    .to_string()
            }
        }
    }
}
