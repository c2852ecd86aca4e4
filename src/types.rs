use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of handing raw scan text to the wallet-side URI parser.
///
/// Optional fields stand in for the several payload kinds a payment URI can
/// carry; `classifier::classify` decides which kind wins when more than one
/// is present. Empty strings count as absent, matching the wallet SDK's
/// loosely-populated records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedUri {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_address: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_protocol_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenInfo>,
    /// Requested amount in base units, decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Token metadata embedded in an add-token URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub contract_address: String,
    pub currency_code: String,
    pub currency_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<String>,
}

/// The wallet a scan session is bound to. Stamped into add-token requests so
/// the receiving flow knows which wallet to attach the token to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub id: String,
    pub name: String,
    pub currency_code: String,
    pub fiat_currency_code: String,
}

/// Payload of `ScanEvent::AddTokenRequested`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTokenRequest {
    pub contract_address: String,
    /// Always upper-cased, whatever case the URI carried.
    pub currency_code: String,
    pub currency_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<String>,
    pub decimal_places: u32,
    pub wallet_id: String,
    pub wallet: WalletSummary,
}

/// Outbound events the intake pipeline emits. Consumers (a navigation
/// router, a modal host) subscribe to these; the pipeline itself never
/// navigates or renders anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScanEvent {
    AddTokenRequested(AddTokenRequest),
    LegacyAddressConfirmationRequested,
    PrivateKeyConfirmationRequested,
    PaymentProtocolReceived(ParsedUri),
    SendConfirmationOpened(ParsedUri),
    ScanErrorShown { message: String },
    LoginRequested { uri: String },
}

/// Instructions the pure state machine hands back to its driver.
///
/// `Emit` fires immediately, `EmitDelayed` after the given delay (the driver
/// schedules it as a cancellable task), and `ParseUri` asks the driver to run
/// the external parser and feed the result back in.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanDirective {
    Emit(ScanEvent),
    EmitDelayed { delay: Duration, event: ScanEvent },
    ParseUri { text: String },
}
