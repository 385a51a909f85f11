use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::gateway::{GatewayError, ReceiptGateway};

/// Receipt-lookup page for a given transaction number.
pub const DEFAULT_BASE_URL: &str = "https://transactioninfo.ethiotelecom.et/receipt";

/// Substring present in the lookup page body iff the receipt is genuine.
pub const SUCCESS_MARKER: &str = "የቴሌብር ክፍያ መረጃ/telebirr Transaction information";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub base_url: String,
    pub success_marker: String,
    pub timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            success_marker: SUCCESS_MARKER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Ordered lookup candidates for a raw OCR'd transaction number.
///
/// The raw identifier comes first, then the O→0 swap when it contains 'O',
/// then the 0→O swap when it contains '0'. Each swap applies to the raw
/// identifier independently — variants are never chained and no candidate
/// ever has both characters swapped at once. A narrow OCR-confusion
/// heuristic, not fuzzy matching.
pub fn candidates(raw: &str) -> Vec<String> {
    let mut list = vec![raw.to_string()];
    if raw.contains('O') {
        list.push(raw.replace('O', "0"));
    }
    if raw.contains('0') {
        list.push(raw.replace('0', "O"));
    }
    list
}

/// A transaction number accepted by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedReceipt {
    /// The identifier the service accepted (possibly a corrected variant).
    pub tx_id: String,
    /// The lookup URL that validated.
    pub url: String,
    /// The raw identifier as OCR'd, when a corrected variant succeeded.
    pub corrected_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    Verified(VerifiedReceipt),
    NotVerified,
}

/// Probes the lookup service with each candidate in order, returning on the
/// first success. A transport failure on any attempt aborts the whole
/// verification — remaining candidates are not tried.
pub struct ReceiptVerifier<G: ReceiptGateway> {
    gateway: G,
    config: VerifierConfig,
}

impl<G: ReceiptGateway> ReceiptVerifier<G> {
    pub fn new(gateway: G, config: VerifierConfig) -> Self {
        Self { gateway, config }
    }

    pub fn receipt_url(&self, tx_id: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), tx_id)
    }

    pub async fn verify(&self, raw_id: &str) -> Result<Verification, GatewayError> {
        for candidate in candidates(raw_id) {
            let url = self.receipt_url(&candidate);
            tracing::info!(tx_id = %candidate, "probing receipt lookup");

            let response = self.gateway.fetch(&url).await?;

            if response.status == 200 && response.body.contains(&self.config.success_marker) {
                let corrected_from = (candidate != raw_id).then(|| raw_id.to_string());
                if corrected_from.is_some() {
                    tracing::info!(raw = raw_id, accepted = %candidate, "receipt valid after OCR correction");
                } else {
                    tracing::info!(tx_id = %candidate, "receipt valid");
                }
                return Ok(Verification::Verified(VerifiedReceipt {
                    tx_id: candidate,
                    url,
                    corrected_from,
                }));
            }

            tracing::debug!(tx_id = %candidate, status = response.status, "lookup rejected candidate");
        }

        tracing::info!(tx_id = raw_id, "all candidates rejected");
        Ok(Verification::NotVerified)
    }
}
