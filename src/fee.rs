//! Network-fee display formatting.
//!
//! Stateless: recomputed from the finalized transaction's fee fields on every
//! render pass, never cached. A token spend pays its fee on the parent chain,
//! so a positive parent-chain fee takes precedence over the primary one.
//! Formatting failures degrade to an empty string; the send flow must never
//! be blocked by a display concern.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::amount;

/// A display unit for a currency, with the multiplier converting to/from
/// native amounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Denomination {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub multiplier: String,
}

/// The denomination pair the formatter needs for one currency: the display
/// denomination contributes the symbol, the exchange denomination the
/// multiplier used for both the crypto amount and the rate lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub currency_code: String,
    pub display: Denomination,
    pub exchange: Denomination,
}

/// Exchange-rate capability. Amounts cross this boundary in display units,
/// as floats; precision-critical native amounts never do.
pub trait CurrencyConverter {
    fn convert_currency(&self, from_code: &str, to_code: &str, amount: f64) -> Result<f64>;
}

/// Round a fiat amount to 2 decimals, half away from zero.
pub fn round_fiat(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format the network-fee line for the send-confirmation screen.
///
/// A parent-chain fee that is present and strictly positive (decimal-string
/// comparison) wins; a zero parent fee counts as absent. With neither fee
/// positive, or with the conversion capability unavailable, the result is an
/// empty string.
pub fn format_network_fee(
    network_fee: Option<&str>,
    parent_network_fee: Option<&str>,
    primary: &CurrencyInfo,
    parent: &CurrencyInfo,
    fiat: &CurrencyInfo,
    converter: &dyn CurrencyConverter,
) -> String {
    if let Some(fee) = parent_network_fee.filter(|f| amount::is_positive(f)) {
        return render(fee, parent, fiat, converter);
    }
    if let Some(fee) = network_fee.filter(|f| amount::is_positive(f)) {
        return render(fee, primary, fiat, converter);
    }
    String::new()
}

fn render(
    native_fee: &str,
    info: &CurrencyInfo,
    fiat: &CurrencyInfo,
    converter: &dyn CurrencyConverter,
) -> String {
    let crypto_amount = match amount::native_to_display(native_fee, &info.exchange.multiplier) {
        Ok(v) => v,
        Err(err) => {
            log::warn!("fee amount unrenderable: {err}");
            return String::new();
        }
    };

    let exchange_amount: f64 = match crypto_amount.parse() {
        Ok(v) => v,
        Err(_) => {
            log::warn!("fee amount '{crypto_amount}' not representable as f64");
            return String::new();
        }
    };
    let fiat_amount = match converter.convert_currency(
        &info.currency_code,
        &fiat.currency_code,
        exchange_amount,
    ) {
        Ok(v) => v,
        Err(err) => {
            log::debug!("fee conversion unavailable: {err:#}");
            return String::new();
        }
    };

    let crypto_str = with_symbol(info.display.symbol.as_deref(), &crypto_amount);
    let fiat_str = with_symbol(
        fiat.display.symbol.as_deref(),
        &format!("{:.2}", round_fiat(fiat_amount)),
    );
    format!("Fee: {crypto_str} ({fiat_str})")
}

fn with_symbol(symbol: Option<&str>, amount: &str) -> String {
    match symbol {
        Some(sym) if !sym.is_empty() => format!("{sym} {amount}"),
        _ => amount.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FixedRate(f64);

    impl CurrencyConverter for FixedRate {
        fn convert_currency(&self, _from: &str, _to: &str, amount: f64) -> Result<f64> {
            Ok(amount * self.0)
        }
    }

    struct Unavailable;

    impl CurrencyConverter for Unavailable {
        fn convert_currency(&self, _from: &str, _to: &str, _amount: f64) -> Result<f64> {
            Err(anyhow!("no exchange rate"))
        }
    }

    fn btc() -> CurrencyInfo {
        CurrencyInfo {
            currency_code: "BTC".into(),
            display: Denomination {
                name: "BTC".into(),
                symbol: Some("₿".into()),
                multiplier: "100000000".into(),
            },
            exchange: Denomination {
                name: "BTC".into(),
                symbol: Some("₿".into()),
                multiplier: "100000000".into(),
            },
        }
    }

    fn eth() -> CurrencyInfo {
        CurrencyInfo {
            currency_code: "ETH".into(),
            display: Denomination {
                name: "ETH".into(),
                symbol: Some("Ξ".into()),
                multiplier: "1000000000000000000".into(),
            },
            exchange: Denomination {
                name: "ETH".into(),
                symbol: Some("Ξ".into()),
                multiplier: "1000000000000000000".into(),
            },
        }
    }

    fn usd() -> CurrencyInfo {
        CurrencyInfo {
            currency_code: "USD".into(),
            display: Denomination {
                name: "USD".into(),
                symbol: Some("$".into()),
                multiplier: "100".into(),
            },
            exchange: Denomination {
                name: "USD".into(),
                symbol: Some("$".into()),
                multiplier: "100".into(),
            },
        }
    }

    #[test]
    fn primary_fee_formats_crypto_then_fiat() {
        let line = format_network_fee(
            Some("10000"),
            None,
            &btc(),
            &eth(),
            &usd(),
            &FixedRate(65000.0),
        );
        assert_eq!(line, "Fee: ₿ 0.0001 ($ 6.50)");
    }

    #[test]
    fn zero_parent_fee_falls_through_to_primary() {
        let line = format_network_fee(
            Some("10000"),
            Some("0"),
            &btc(),
            &eth(),
            &usd(),
            &FixedRate(65000.0),
        );
        assert!(line.starts_with("Fee: ₿ 0.0001"));
    }

    #[test]
    fn positive_parent_fee_wins() {
        let line = format_network_fee(
            Some("10000"),
            Some("2000000000000000"), // 0.002 ETH
            &btc(),
            &eth(),
            &usd(),
            &FixedRate(3000.0),
        );
        assert_eq!(line, "Fee: Ξ 0.002 ($ 6.00)");
    }

    #[test]
    fn no_positive_fee_means_no_line() {
        let none = format_network_fee(None, None, &btc(), &eth(), &usd(), &FixedRate(1.0));
        assert_eq!(none, "");
        let zeros =
            format_network_fee(Some("0"), Some("0"), &btc(), &eth(), &usd(), &FixedRate(1.0));
        assert_eq!(zeros, "");
    }

    #[test]
    fn conversion_failure_degrades_to_empty() {
        let line = format_network_fee(Some("10000"), None, &btc(), &eth(), &usd(), &Unavailable);
        assert_eq!(line, "");
    }

    #[test]
    fn missing_symbol_renders_bare_amount() {
        let mut info = btc();
        info.display.symbol = None;
        let line = format_network_fee(Some("10000"), None, &info, &eth(), &usd(), &FixedRate(1.0));
        assert_eq!(line, "Fee: 0.0001 ($ 0.00)");
    }

    #[test]
    fn fiat_rounds_half_away_from_zero() {
        // 0.125 is exactly representable, so this is a true half case
        assert_eq!(round_fiat(0.125), 0.13);
        assert_eq!(round_fiat(-0.125), -0.13);
        assert_eq!(round_fiat(1.234), 1.23);
        assert_eq!(round_fiat(1.236), 1.24);
        assert_eq!(round_fiat(0.0), 0.0);
    }
}
