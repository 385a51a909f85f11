pub mod gateway;
pub mod outcome;
pub mod verifier;

pub use gateway::{GatewayError, HttpGateway, MockGateway, ProbeResponse, ReceiptGateway};
pub use outcome::ReceiptOutcome;
pub use verifier::{
    candidates, ReceiptVerifier, Verification, VerifiedReceipt, VerifierConfig,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, SUCCESS_MARKER,
};
