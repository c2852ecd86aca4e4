//! Scan intake state machine.
//!
//! Owns the per-screen scan state and sequences raw text -> parse ->
//! classification -> follow-up. The machine is pure and synchronous: every
//! input returns a list of [`ScanDirective`]s for the driver
//! ([`crate::session::ScanSession`]) to carry out. It never touches a
//! dispatcher, a clock, or the parser directly, which is what makes the
//! transition table testable in isolation.
//!
//! Lifecycle: one machine per scan screen, created on mount, `reset` on
//! unmount.

use std::time::Duration;

use crate::amount;
use crate::classifier::{classify, UriKind};
use crate::login;
use crate::types::{AddTokenRequest, ParsedUri, ScanDirective, ScanEvent, WalletSummary};

/// Delay before a legacy-address / private-key confirmation modal is
/// requested, so a preceding screen transition can finish animating.
pub const CONFIRMATION_MODAL_DELAY: Duration = Duration::from_millis(500);

/// Delay before the invalid-URI alert is requested after a parse failure.
pub const SCAN_ERROR_DELAY: Duration = Duration::from_millis(500);

/// Decimal places assumed for a token whose URI carries no multiplier.
pub const DEFAULT_TOKEN_DECIMALS: u32 = 18;

const INVALID_URI_MESSAGE: &str = "The scanned code is not a valid address or payment request.";

/// Where the intake currently is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanStage {
    /// Ready for input (scanning may still be disabled after a hand-off;
    /// the destination screen owns re-enabling it).
    Idle,
    /// A parse is in flight. The scan guard keeps it the only one.
    Processing,
    /// A legacy-address or private-key payload is parked, waiting for the
    /// user to confirm or cancel.
    AwaitingConfirmation,
}

pub struct ScanMachine {
    stage: ScanStage,
    scan_enabled: bool,
    torch_enabled: bool,
    parsed_uri: Option<ParsedUri>,
    wallet: WalletSummary,
}

impl ScanMachine {
    pub fn new(wallet: WalletSummary) -> Self {
        Self {
            stage: ScanStage::Idle,
            scan_enabled: true,
            torch_enabled: false,
            parsed_uri: None,
            wallet,
        }
    }

    pub fn stage(&self) -> ScanStage {
        self.stage
    }

    pub fn scan_enabled(&self) -> bool {
        self.scan_enabled
    }

    pub fn torch_enabled(&self) -> bool {
        self.torch_enabled
    }

    /// Camera torch toggle; independent of the intake transitions.
    pub fn toggle_torch(&mut self) {
        self.torch_enabled = !self.torch_enabled;
    }

    pub fn parsed_uri(&self) -> Option<&ParsedUri> {
        self.parsed_uri.as_ref()
    }

    /// Raw text arrived from the scanner or manual entry.
    ///
    /// A scan while scanning is disabled is a silent no-op, as is empty
    /// input. Login links bypass the pipeline entirely: no transition, no
    /// parse, just the login side effect.
    pub fn on_scan(&mut self, text: &str) -> Vec<ScanDirective> {
        if text.is_empty() {
            return Vec::new();
        }
        if !self.scan_enabled {
            log::debug!("scan ignored, scanning disabled");
            return Vec::new();
        }
        if login::is_login_uri(text) {
            return vec![ScanDirective::Emit(ScanEvent::LoginRequested {
                uri: text.to_string(),
            })];
        }
        self.stage = ScanStage::Processing;
        self.scan_enabled = false;
        vec![ScanDirective::ParseUri {
            text: text.to_string(),
        }]
    }

    /// The parser produced a result for the in-flight scan.
    pub fn on_parse_success(&mut self, parsed: ParsedUri) -> Vec<ScanDirective> {
        if self.stage != ScanStage::Processing {
            log::warn!("parse result arrived outside Processing, dropped");
            return Vec::new();
        }
        match classify(&parsed) {
            UriKind::Token => match parsed.token.as_ref() {
                Some(token) => {
                    let request = AddTokenRequest {
                        contract_address: token.contract_address.clone(),
                        currency_code: token.currency_code.to_uppercase(),
                        currency_name: token.currency_name.clone(),
                        multiplier: token.multiplier.clone(),
                        decimal_places: token
                            .multiplier
                            .as_deref()
                            .map(amount::decimal_places)
                            .unwrap_or(DEFAULT_TOKEN_DECIMALS),
                        wallet_id: self.wallet.id.clone(),
                        wallet: self.wallet.clone(),
                    };
                    self.stage = ScanStage::Idle;
                    vec![ScanDirective::Emit(ScanEvent::AddTokenRequested(request))]
                }
                None => self.open_send_confirmation(parsed),
            },
            UriKind::LegacyAddress => {
                self.park_for_confirmation(parsed, ScanEvent::LegacyAddressConfirmationRequested)
            }
            UriKind::PrivateKey => {
                self.park_for_confirmation(parsed, ScanEvent::PrivateKeyConfirmationRequested)
            }
            UriKind::PaymentProtocol => {
                self.stage = ScanStage::Idle;
                vec![ScanDirective::Emit(ScanEvent::PaymentProtocolReceived(
                    parsed,
                ))]
            }
            UriKind::PublicAddress => self.open_send_confirmation(parsed),
        }
    }

    /// The parser rejected the scanned text. Scanning is re-enabled in this
    /// same transition; the user-visible alert follows after a delay.
    pub fn on_parse_failure(&mut self) -> Vec<ScanDirective> {
        if self.stage != ScanStage::Processing {
            return Vec::new();
        }
        self.stage = ScanStage::Idle;
        self.scan_enabled = true;
        vec![ScanDirective::EmitDelayed {
            delay: SCAN_ERROR_DELAY,
            event: ScanEvent::ScanErrorShown {
                message: INVALID_URI_MESSAGE.to_string(),
            },
        }]
    }

    /// User confirmed the parked legacy-address / private-key payload.
    /// With nothing parked (the modal outlived a reset), just re-enable
    /// scanning.
    pub fn on_confirm(&mut self) -> Vec<ScanDirective> {
        if self.stage != ScanStage::AwaitingConfirmation {
            return Vec::new();
        }
        self.stage = ScanStage::Idle;
        match self.parsed_uri.take() {
            Some(parsed) => vec![ScanDirective::Emit(ScanEvent::SendConfirmationOpened(
                parsed,
            ))],
            None => {
                self.scan_enabled = true;
                Vec::new()
            }
        }
    }

    /// User dismissed the confirmation modal: discard and rearm.
    pub fn on_cancel(&mut self) -> Vec<ScanDirective> {
        if self.stage != ScanStage::AwaitingConfirmation {
            return Vec::new();
        }
        self.stage = ScanStage::Idle;
        self.scan_enabled = true;
        self.parsed_uri = None;
        Vec::new()
    }

    /// Back to the mount state. Re-enabling an already-enabled scanner is a
    /// no-op by construction.
    pub fn reset(&mut self) {
        self.stage = ScanStage::Idle;
        self.scan_enabled = true;
        self.torch_enabled = false;
        self.parsed_uri = None;
    }

    fn park_for_confirmation(
        &mut self,
        parsed: ParsedUri,
        event: ScanEvent,
    ) -> Vec<ScanDirective> {
        self.stage = ScanStage::AwaitingConfirmation;
        self.parsed_uri = Some(parsed);
        vec![ScanDirective::EmitDelayed {
            delay: CONFIRMATION_MODAL_DELAY,
            event,
        }]
    }

    // Hand-off to the send screen leaves scanning disabled; that screen
    // re-enables it when it tears down.
    fn open_send_confirmation(&mut self, parsed: ParsedUri) -> Vec<ScanDirective> {
        self.stage = ScanStage::Idle;
        vec![ScanDirective::Emit(ScanEvent::SendConfirmationOpened(
            parsed,
        ))]
    }
}
