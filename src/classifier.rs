//! Payment-URI classification.
//!
//! A [`ParsedUri`] coming back from the wallet parser is a bag of optional
//! fields and can structurally satisfy several payload kinds at once. The
//! classifier resolves the ambiguity with a fixed precedence; first match
//! wins:
//!
//! 1. `Token` - token metadata present
//! 2. `LegacyAddress` - legacy address present
//! 3. `PrivateKey` - at least one private key present
//! 4. `PaymentProtocol` - payment-protocol URL present AND no public address
//! 5. `PublicAddress` - everything else (including a fully empty record,
//!    which downstream treats as a no-op)

use crate::types::ParsedUri;

/// The payload kind a parsed payment URI resolves to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UriKind {
    Token,
    LegacyAddress,
    PrivateKey,
    PaymentProtocol,
    PublicAddress,
}

fn has(field: &Option<String>) -> bool {
    matches!(field.as_deref(), Some(v) if !v.is_empty())
}

pub fn is_token_uri(uri: &ParsedUri) -> bool {
    uri.token.is_some()
}

pub fn is_legacy_address_uri(uri: &ParsedUri) -> bool {
    has(&uri.legacy_address)
}

pub fn is_private_key_uri(uri: &ParsedUri) -> bool {
    !uri.private_keys.is_empty()
}

pub fn is_payment_protocol_uri(uri: &ParsedUri) -> bool {
    has(&uri.payment_protocol_url) && !has(&uri.public_address)
}

/// Classify a parsed URI into exactly one [`UriKind`].
pub fn classify(uri: &ParsedUri) -> UriKind {
    if is_token_uri(uri) {
        UriKind::Token
    } else if is_legacy_address_uri(uri) {
        UriKind::LegacyAddress
    } else if is_private_key_uri(uri) {
        UriKind::PrivateKey
    } else if is_payment_protocol_uri(uri) {
        UriKind::PaymentProtocol
    } else {
        UriKind::PublicAddress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenInfo;

    fn token() -> TokenInfo {
        TokenInfo {
            contract_address: "0xdac17f958d2ee523a2206206994597c13d831ec7".into(),
            currency_code: "usdt".into(),
            currency_name: "Tether".into(),
            multiplier: Some("1000000".into()),
        }
    }

    #[test]
    fn empty_record_is_public_address() {
        assert_eq!(classify(&ParsedUri::default()), UriKind::PublicAddress);
    }

    #[test]
    fn plain_address_is_public_address() {
        let uri = ParsedUri {
            public_address: Some("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2".into()),
            ..Default::default()
        };
        assert_eq!(classify(&uri), UriKind::PublicAddress);
    }

    #[test]
    fn token_beats_legacy_address() {
        let uri = ParsedUri {
            token: Some(token()),
            legacy_address: Some("1abc".into()),
            ..Default::default()
        };
        assert_eq!(classify(&uri), UriKind::Token);
    }

    #[test]
    fn legacy_beats_private_key() {
        let uri = ParsedUri {
            legacy_address: Some("1abc".into()),
            private_keys: vec!["5Hw...".into()],
            ..Default::default()
        };
        assert_eq!(classify(&uri), UriKind::LegacyAddress);
    }

    #[test]
    fn private_key_requires_nonempty_list() {
        let uri = ParsedUri {
            private_keys: vec!["5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ".into()],
            ..Default::default()
        };
        assert_eq!(classify(&uri), UriKind::PrivateKey);
    }

    #[test]
    fn payment_protocol_requires_absent_public_address() {
        let bare = ParsedUri {
            payment_protocol_url: Some("https://merchant.example/i/abc".into()),
            ..Default::default()
        };
        assert_eq!(classify(&bare), UriKind::PaymentProtocol);

        let with_address = ParsedUri {
            payment_protocol_url: Some("https://merchant.example/i/abc".into()),
            public_address: Some("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2".into()),
            ..Default::default()
        };
        assert_eq!(classify(&with_address), UriKind::PublicAddress);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let uri = ParsedUri {
            legacy_address: Some(String::new()),
            payment_protocol_url: Some("https://merchant.example/i/abc".into()),
            public_address: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(classify(&uri), UriKind::PaymentProtocol);
    }
}
