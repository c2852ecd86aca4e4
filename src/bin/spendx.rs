// Demo binary: feed one payment URI through the scan intake pipeline and
// print every emitted event as a JSON line.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc::unbounded_channel;

use spendx::config;
use spendx::fee::{format_network_fee, CurrencyConverter};
use spendx::scan::ScanStage;
use spendx::session::ScanSession;
use spendx::types::ScanEvent;
use spendx::uri::BasicUriParser;

/// Fixed-rate stand-in for the wallet SDK's exchange-rate capability.
struct FixedRateConverter {
    rate: f64,
}

impl CurrencyConverter for FixedRateConverter {
    fn convert_currency(&self, _from: &str, _to: &str, amount: f64) -> Result<f64> {
        Ok(amount * self.rate)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cfg = config::load().context("Failed to load configuration")?;

    let (events_tx, mut events_rx) = unbounded_channel::<ScanEvent>();
    let parser = Arc::new(BasicUriParser::new(cfg.profile.clone()));
    let mut session = ScanSession::new(cfg.wallet.clone(), parser, events_tx);

    session.scan(&cfg.uri).await;

    if session.stage() == ScanStage::AwaitingConfirmation {
        // Let the delayed confirmation request fire before acting on it.
        tokio::time::sleep(Duration::from_millis(600)).await;
        if cfg.confirm {
            log::info!("auto-confirming");
            session.confirm();
        } else if cfg.cancel {
            log::info!("auto-cancelling");
            session.cancel();
        }
    } else {
        // Give the delayed error alert (if any) time to fire.
        tokio::time::sleep(Duration::from_millis(600)).await;
    }

    log::info!(
        "final state: stage={:?} scan_enabled={}",
        session.stage(),
        session.scan_enabled()
    );

    let converter = FixedRateConverter { rate: cfg.fiat_rate };
    drop(session); // closes the channel once pending timers are cancelled

    while let Some(event) = events_rx.recv().await {
        println!("{}", serde_json::to_string(&event)?);
        if let ScanEvent::SendConfirmationOpened(parsed) = &event {
            if let Some(native_amount) = &parsed.native_amount {
                // Demo the fee line with the requested amount standing in
                // for a computed network fee.
                let line = format_network_fee(
                    Some(native_amount),
                    None,
                    &cfg.primary,
                    &cfg.primary,
                    &cfg.fiat,
                    &converter,
                );
                if !line.is_empty() {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
