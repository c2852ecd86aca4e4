//! Demo binary configuration.
//!
//! Priority: CLI args > environment variables > defaults.

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::amount;
use crate::fee::{CurrencyInfo, Denomination};
use crate::types::WalletSummary;
use crate::uri::CurrencyProfile;

/// Spendx - wallet scan-to-send pipeline demo
///
/// Feeds a payment URI through the intake pipeline and prints the events it
/// emits as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "spendx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wallet scan-to-send pipeline demo", long_about = None)]
pub struct CliArgs {
    /// Payment URI, address, or key to scan
    pub uri: String,

    /// Wallet identifier stamped into add-token requests
    #[arg(long, env = "SPENDX_WALLET_ID", default_value = "demo-wallet")]
    pub wallet_id: String,

    /// Wallet display name
    #[arg(long, env = "SPENDX_WALLET_NAME", default_value = "Demo Wallet")]
    pub wallet_name: String,

    /// URI scheme of the wallet's currency
    #[arg(long, env = "SPENDX_SCHEME", default_value = "bitcoin")]
    pub scheme: String,

    /// Currency code of the wallet
    #[arg(long, env = "SPENDX_CURRENCY_CODE", default_value = "BTC")]
    pub currency_code: String,

    /// Denomination multiplier (base units per display unit, power of ten)
    #[arg(long, env = "SPENDX_MULTIPLIER", default_value = "100000000")]
    pub multiplier: String,

    /// Fiat currency code for fee display
    #[arg(long, env = "SPENDX_FIAT_CODE", default_value = "USD")]
    pub fiat_code: String,

    /// Fixed crypto->fiat rate used by the demo converter
    #[arg(long, env = "SPENDX_FIAT_RATE", default_value_t = 65000.0)]
    pub fiat_rate: f64,

    /// Auto-confirm a legacy-address / private-key confirmation request
    #[arg(long, conflicts_with = "cancel")]
    pub confirm: bool,

    /// Auto-cancel a legacy-address / private-key confirmation request
    #[arg(long)]
    pub cancel: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub uri: String,
    pub wallet: WalletSummary,
    pub profile: CurrencyProfile,
    pub primary: CurrencyInfo,
    pub fiat: CurrencyInfo,
    pub fiat_rate: f64,
    pub confirm: bool,
    pub cancel: bool,
}

/// Load configuration from CLI args and environment variables.
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

fn from_args(args: CliArgs) -> Result<Config> {
    if !amount::is_power_of_ten(&args.multiplier) {
        return Err(anyhow!(
            "SPENDX_MULTIPLIER must be a power of ten, got '{}'",
            args.multiplier
        ));
    }
    if !(0.0..=10_000_000.0).contains(&args.fiat_rate) {
        return Err(anyhow!(
            "SPENDX_FIAT_RATE must be in range [0, 10000000], got {}",
            args.fiat_rate
        ));
    }

    let currency_code = args.currency_code.to_uppercase();
    let fiat_code = args.fiat_code.to_uppercase();

    let profile = CurrencyProfile {
        scheme: args.scheme.to_lowercase(),
        currency_code: currency_code.clone(),
        multiplier: args.multiplier.clone(),
        ..CurrencyProfile::bitcoin()
    };

    let denom = Denomination {
        name: currency_code.clone(),
        symbol: None,
        multiplier: args.multiplier.clone(),
    };
    let primary = CurrencyInfo {
        currency_code: currency_code.clone(),
        display: denom.clone(),
        exchange: denom,
    };
    let fiat_denom = Denomination {
        name: fiat_code.clone(),
        symbol: Some("$".into()),
        multiplier: "100".into(),
    };
    let fiat = CurrencyInfo {
        currency_code: fiat_code.clone(),
        display: fiat_denom.clone(),
        exchange: fiat_denom,
    };

    Ok(Config {
        uri: args.uri,
        wallet: WalletSummary {
            id: args.wallet_id,
            name: args.wallet_name,
            currency_code,
            fiat_currency_code: fiat_code,
        },
        profile,
        primary,
        fiat,
        fiat_rate: args.fiat_rate,
        confirm: args.confirm,
        cancel: args.cancel,
    })
}
