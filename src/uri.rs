//! Built-in payment-URI splitter.
//!
//! [`BasicUriParser`] implements [`UriParser`] for the common
//! `scheme:address?amount=&label=&message=&r=` shape, parameterized by a
//! [`CurrencyProfile`]. It exists so the demo binary and the tests have a
//! real collaborator; production hosts plug their wallet SDK in behind the
//! same trait and the session never knows the difference.
//!
//! Accepted inputs:
//! - `bitcoin:<address>?amount=0.01&label=Alice` (amount in display units,
//!   converted to native with the profile's multiplier)
//! - `bitcoin:?r=https://merchant.example/i/abc` (payment-protocol request,
//!   no address)
//! - bare addresses and private keys, as typed into the manual-entry field
//!
//! Scheme matching is case-insensitive and tolerant of `:` vs `://`.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::amount::{self, AmountError};
use crate::session::UriParser;
use crate::types::ParsedUri;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized payment uri")]
    Unrecognized,
    #[error("bad amount parameter: {0}")]
    BadAmount(AmountError),
}

/// What the splitter needs to know about one currency.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyProfile {
    /// URI scheme, without the colon ("bitcoin").
    pub scheme: String,
    pub currency_code: String,
    /// Multiplier of the denomination the `amount` parameter is quoted in.
    pub multiplier: String,
    /// Address prefixes that mark the older encoding needing confirmation.
    pub legacy_prefixes: Vec<String>,
    /// Prefixes of raw private keys in wallet-import format.
    pub private_key_prefixes: Vec<String>,
}

impl CurrencyProfile {
    /// Bitcoin mainnet: bech32 addresses are current, base58 `1`/`3`
    /// addresses are legacy, WIF keys start with `5`, `K` or `L`.
    pub fn bitcoin() -> Self {
        Self {
            scheme: "bitcoin".into(),
            currency_code: "BTC".into(),
            multiplier: "100000000".into(),
            legacy_prefixes: vec!["1".into(), "3".into()],
            private_key_prefixes: vec!["5".into(), "K".into(), "L".into()],
        }
    }
}

pub struct BasicUriParser {
    profile: CurrencyProfile,
}

impl BasicUriParser {
    pub fn new(profile: CurrencyProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &CurrencyProfile {
        &self.profile
    }

    /// Split `text` into a [`ParsedUri`]. Never panics; anything it cannot
    /// place is an error for the intake machine to absorb.
    pub fn parse(&self, text: &str) -> Result<ParsedUri, ParseError> {
        let s = text.trim();
        if s.is_empty() {
            return Err(ParseError::Unrecognized);
        }

        if let Some(rest) = after_scheme(&self.profile.scheme, s) {
            let (payload, query) = match rest.split_once('?') {
                Some((p, q)) => (p, q),
                None => (rest, ""),
            };
            let mut parsed = self.place_address(payload)?;
            self.apply_query(&mut parsed, query)?;
            return Ok(parsed);
        }

        // Manual entry: bare keys and addresses arrive without a scheme.
        if self.looks_like_private_key(s) {
            return Ok(ParsedUri {
                private_keys: vec![s.to_string()],
                ..Default::default()
            });
        }
        if is_address_like(s) {
            return self.place_address(s);
        }
        Err(ParseError::Unrecognized)
    }

    /// An empty payload is fine (payment-protocol URIs carry no address).
    fn place_address(&self, payload: &str) -> Result<ParsedUri, ParseError> {
        if payload.is_empty() {
            return Ok(ParsedUri::default());
        }
        if !is_address_like(payload) {
            return Err(ParseError::Unrecognized);
        }
        let mut parsed = ParsedUri::default();
        if self
            .profile
            .legacy_prefixes
            .iter()
            .any(|p| payload.starts_with(p.as_str()))
        {
            parsed.legacy_address = Some(payload.to_string());
        } else {
            parsed.public_address = Some(payload.to_string());
        }
        Ok(parsed)
    }

    fn apply_query(&self, parsed: &mut ParsedUri, query: &str) -> Result<(), ParseError> {
        for (key, value) in parse_query(query) {
            match key.as_str() {
                "amount" => {
                    let native = amount::display_to_native(&value, &self.profile.multiplier)
                        .map_err(ParseError::BadAmount)?;
                    parsed.native_amount = Some(native);
                }
                "label" => parsed.label = Some(value),
                "message" => parsed.message = Some(value),
                "r" => parsed.payment_protocol_url = Some(value),
                _ => log::debug!("ignoring uri parameter '{key}'"),
            }
        }
        Ok(())
    }

    fn looks_like_private_key(&self, s: &str) -> bool {
        (50..=60).contains(&s.len())
            && is_address_like(s)
            && self
                .profile
                .private_key_prefixes
                .iter()
                .any(|p| s.starts_with(p.as_str()))
    }
}

#[async_trait]
impl UriParser for BasicUriParser {
    async fn parse_uri(&self, text: &str) -> Result<ParsedUri> {
        Ok(self.parse(text)?)
    }
}

/// Extract the part after `scheme:` / `scheme://`, case-insensitive, with
/// leading slashes stripped.
fn after_scheme<'a>(scheme: &str, raw: &'a str) -> Option<&'a str> {
    if let Some(pos) = raw.find("://") {
        if raw[..pos].eq_ignore_ascii_case(scheme) {
            return Some(raw[pos + 3..].trim_start_matches('/'));
        }
        return None;
    }
    let (candidate, rest) = raw.split_once(':')?;
    if candidate.eq_ignore_ascii_case(scheme) {
        Some(rest.trim_start_matches('/'))
    } else {
        None
    }
}

fn parse_query(qs: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for kv in qs.split('&').filter(|kv| !kv.is_empty()) {
        let mut it = kv.splitn(2, '=');
        let k = it.next().unwrap_or_default().trim().to_ascii_lowercase();
        let v = it.next().unwrap_or_default();
        let v = urlencoding::decode(v).unwrap_or_else(|_| v.into()).to_string();
        if !k.is_empty() {
            params.push((k, v));
        }
    }
    params
}

/// Loose base58/bech32-ish shape check: alphanumeric, plausibly long.
fn is_address_like(s: &str) -> bool {
    s.len() >= 20 && s.bytes().all(|b| b.is_ascii_alphanumeric())
}
