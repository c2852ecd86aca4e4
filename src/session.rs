//! Async driver for the scan intake machine.
//!
//! [`ScanSession`] wires the pure [`ScanMachine`] to the outside world: the
//! wallet's URI parser behind [`UriParser`], an unbounded event channel the
//! host drains, and tokio timers for the delayed modal/alert events. Delayed
//! events are real tasks with handles, aborted on [`ScanSession::reset`] or
//! drop, so a torn-down screen can never receive a stale modal request.
//!
//! Everything is single-threaded and event-at-a-time: `scan` awaits the
//! parser inline, and the machine's guard rejects scans that arrive while a
//! parse is in flight, so at most one parse ever runs per session.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::scan::{ScanMachine, ScanStage};
use crate::types::{ParsedUri, ScanDirective, ScanEvent, WalletSummary};

/// The wallet SDK's URI-parsing capability. One implementor per wallet;
/// rejections are treated as parse failures, never as fatal errors.
#[async_trait]
pub trait UriParser: Send + Sync {
    async fn parse_uri(&self, text: &str) -> Result<ParsedUri>;
}

pub struct ScanSession {
    machine: ScanMachine,
    parser: Arc<dyn UriParser>,
    events: UnboundedSender<ScanEvent>,
    timers: Vec<JoinHandle<()>>,
}

impl ScanSession {
    pub fn new(
        wallet: WalletSummary,
        parser: Arc<dyn UriParser>,
        events: UnboundedSender<ScanEvent>,
    ) -> Self {
        Self {
            machine: ScanMachine::new(wallet),
            parser,
            events,
            timers: Vec::new(),
        }
    }

    /// Current machine state, for hosts that render from it.
    pub fn machine(&self) -> &ScanMachine {
        &self.machine
    }

    pub fn scan_enabled(&self) -> bool {
        self.machine.scan_enabled()
    }

    pub fn stage(&self) -> ScanStage {
        self.machine.stage()
    }

    /// Feed scanned or typed text through the pipeline. Returns once the
    /// parse (if any) has completed and all immediate events are emitted;
    /// delayed events keep running on their timers.
    pub async fn scan(&mut self, text: &str) {
        let directives = self.machine.on_scan(text);
        if let Some(parse_text) = self.dispatch(directives) {
            let followups = match self.parser.parse_uri(&parse_text).await {
                Ok(parsed) => self.machine.on_parse_success(parsed),
                Err(err) => {
                    log::warn!("uri parse failed: {err:#}");
                    self.machine.on_parse_failure()
                }
            };
            self.dispatch(followups);
        }
    }

    /// User confirmed the legacy-address / private-key modal.
    pub fn confirm(&mut self) {
        let directives = self.machine.on_confirm();
        self.dispatch(directives);
    }

    /// User dismissed the confirmation modal.
    pub fn cancel(&mut self) {
        let directives = self.machine.on_cancel();
        self.dispatch(directives);
    }

    /// Screen teardown: cancel pending delayed events and return the machine
    /// to its mount state.
    pub fn reset(&mut self) {
        for timer in self.timers.drain(..) {
            timer.abort();
        }
        self.machine.reset();
    }

    /// Carry out directives; a `ParseUri` request is returned to the caller
    /// (only `scan` can produce one, and it runs the parse itself).
    fn dispatch(&mut self, directives: Vec<ScanDirective>) -> Option<String> {
        self.timers.retain(|t| !t.is_finished());
        let mut parse_request = None;
        for directive in directives {
            match directive {
                ScanDirective::Emit(event) => self.emit(event),
                ScanDirective::EmitDelayed { delay, event } => {
                    let events = self.events.clone();
                    self.timers.push(tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        if events.send(event).is_err() {
                            log::debug!("delayed scan event dropped, receiver gone");
                        }
                    }));
                }
                ScanDirective::ParseUri { text } => parse_request = Some(text),
            }
        }
        parse_request
    }

    fn emit(&self, event: ScanEvent) {
        if self.events.send(event).is_err() {
            log::debug!("scan event dropped, receiver gone");
        }
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        for timer in self.timers.drain(..) {
            timer.abort();
        }
    }
}
