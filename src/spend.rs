//! Spend-request normalization.
//!
//! A spend is constructed fresh per attempt by merging caller-supplied
//! overrides over the persisted defaults record. The merge is shallow per
//! top-level field, except `metadata` and `custom_network_fee`, which merge
//! one level deeper. The resolved amount/address pair is always rebuilt into
//! a single spend target.
//!
//! Normalization is deterministic and idempotent: re-normalizing a result
//! (via `SpendDefaults::from`) with empty overrides yields an equal record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::amount;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpendError {
    /// Neither the overrides nor the defaults supply a spend amount.
    #[error("no spend amount available")]
    MissingAmount,
    /// The resolved amount is not a non-negative base-unit decimal integer.
    #[error("invalid native amount '{0}'")]
    InvalidAmount(String),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkFeeOption {
    #[default]
    Standard,
    Low,
    High,
    Custom,
}

/// One `(amount, destination)` pair within a spend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendTarget {
    pub native_amount: String,
    pub public_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendMetadata {
    pub payee_name: String,
    pub category: String,
    pub notes: String,
    pub amount_fiat: f64,
    pub biz_id: u64,
    pub misc_json: String,
}

impl Default for SpendMetadata {
    fn default() -> Self {
        Self {
            payee_name: String::new(),
            category: String::new(),
            notes: String::new(),
            amount_fiat: 0.0,
            biz_id: 0,
            misc_json: String::new(),
        }
    }
}

/// Field-wise patch for [`SpendMetadata`]: set fields replace, unset fields
/// keep the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_fiat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biz_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc_json: Option<String>,
}

impl MetadataPatch {
    fn apply(&self, base: &SpendMetadata) -> SpendMetadata {
        SpendMetadata {
            payee_name: self.payee_name.clone().unwrap_or_else(|| base.payee_name.clone()),
            category: self.category.clone().unwrap_or_else(|| base.category.clone()),
            notes: self.notes.clone().unwrap_or_else(|| base.notes.clone()),
            amount_fiat: self.amount_fiat.unwrap_or(base.amount_fiat),
            biz_id: self.biz_id.unwrap_or(base.biz_id),
            misc_json: self.misc_json.clone().unwrap_or_else(|| base.misc_json.clone()),
        }
    }
}

/// The persisted defaults record a spend is merged against. The caller fills
/// `currency_code` with the selected wallet's code; everything else defaults
/// to the empty send screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendDefaults {
    pub currency_code: String,
    pub native_amount: Option<String>,
    pub public_address: String,
    pub network_fee_option: NetworkFeeOption,
    pub custom_network_fee: BTreeMap<String, String>,
    pub metadata: SpendMetadata,
    pub spend_targets: Vec<SpendTarget>,
}

impl Default for SpendDefaults {
    fn default() -> Self {
        Self {
            currency_code: String::new(),
            native_amount: Some("0".to_string()),
            public_address: String::new(),
            network_fee_option: NetworkFeeOption::Standard,
            custom_network_fee: BTreeMap::new(),
            metadata: SpendMetadata::default(),
            spend_targets: Vec::new(),
        }
    }
}

impl From<&SpendRequest> for SpendDefaults {
    /// Re-seed defaults from an already-normalized request. The amount lives
    /// in the spend target, where resolution finds it again.
    fn from(request: &SpendRequest) -> Self {
        Self {
            currency_code: request.currency_code.clone(),
            native_amount: None,
            public_address: request
                .spend_targets
                .first()
                .map(|t| t.public_address.clone())
                .unwrap_or_default(),
            network_fee_option: request.network_fee_option,
            custom_network_fee: request.custom_network_fee.clone(),
            metadata: request.metadata.clone(),
            spend_targets: request.spend_targets.clone(),
        }
    }
}

/// Request-scoped overrides; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_fee_option: Option<NetworkFeeOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_network_fee: Option<BTreeMap<String, String>>,
}

/// A complete, validated spend request ready for the wallet SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendRequest {
    pub currency_code: String,
    /// Always at least one entry after normalization.
    pub spend_targets: Vec<SpendTarget>,
    pub network_fee_option: NetworkFeeOption,
    pub custom_network_fee: BTreeMap<String, String>,
    pub metadata: SpendMetadata,
}

fn nonempty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

/// Merge `overrides` over `defaults` into a complete [`SpendRequest`].
///
/// Amount resolution: override amount, else the defaults' own amount, else
/// the defaults' first spend target. Empty strings do not count. Fails with
/// [`SpendError::MissingAmount`] when nothing supplies one.
pub fn normalize(
    defaults: &SpendDefaults,
    overrides: &SpendOverrides,
) -> Result<SpendRequest, SpendError> {
    let native_amount = nonempty(overrides.native_amount.as_ref())
        .or_else(|| nonempty(defaults.native_amount.as_ref()))
        .or_else(|| {
            defaults
                .spend_targets
                .first()
                .and_then(|t| nonempty(Some(&t.native_amount)))
        })
        .ok_or(SpendError::MissingAmount)?;
    amount::validate_native(&native_amount)
        .map_err(|_| SpendError::InvalidAmount(native_amount.clone()))?;

    let public_address = nonempty(overrides.public_address.as_ref())
        .unwrap_or_else(|| defaults.public_address.clone());

    let custom_network_fee = match &overrides.custom_network_fee {
        Some(patch) => {
            let mut merged = defaults.custom_network_fee.clone();
            merged.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
            merged
        }
        None => defaults.custom_network_fee.clone(),
    };

    let metadata = match &overrides.metadata {
        Some(patch) => patch.apply(&defaults.metadata),
        None => defaults.metadata.clone(),
    };

    Ok(SpendRequest {
        currency_code: nonempty(overrides.currency_code.as_ref())
            .unwrap_or_else(|| defaults.currency_code.clone()),
        spend_targets: vec![SpendTarget {
            native_amount,
            public_address,
        }],
        network_fee_option: overrides
            .network_fee_option
            .unwrap_or(defaults.network_fee_option),
        custom_network_fee,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SpendDefaults {
        SpendDefaults {
            currency_code: "BTC".into(),
            ..Default::default()
        }
    }

    #[test]
    fn overrides_win_over_defaults() {
        let overrides = SpendOverrides {
            native_amount: Some("500000".into()),
            public_address: Some("1xyz".into()),
            ..Default::default()
        };
        let request = normalize(&defaults(), &overrides).unwrap();
        assert_eq!(
            request.spend_targets,
            vec![SpendTarget {
                native_amount: "500000".into(),
                public_address: "1xyz".into(),
            }]
        );
        assert_eq!(request.currency_code, "BTC");
        assert_eq!(request.network_fee_option, NetworkFeeOption::Standard);
    }

    #[test]
    fn default_zero_amount_is_used_when_nothing_overrides() {
        let request = normalize(&defaults(), &SpendOverrides::default()).unwrap();
        assert_eq!(request.spend_targets[0].native_amount, "0");
        assert_eq!(request.spend_targets[0].public_address, "");
    }

    #[test]
    fn amount_falls_back_to_first_spend_target() {
        let d = SpendDefaults {
            native_amount: None,
            spend_targets: vec![
                SpendTarget {
                    native_amount: "250".into(),
                    public_address: "1first".into(),
                },
                SpendTarget {
                    native_amount: "999".into(),
                    public_address: "1second".into(),
                },
            ],
            ..defaults()
        };
        let request = normalize(&d, &SpendOverrides::default()).unwrap();
        // Only the first target feeds resolution; the address still comes
        // from the top-level default.
        assert_eq!(request.spend_targets.len(), 1);
        assert_eq!(request.spend_targets[0].native_amount, "250");
        assert_eq!(request.spend_targets[0].public_address, "");
    }

    #[test]
    fn missing_amount_everywhere_is_an_error() {
        let d = SpendDefaults {
            native_amount: None,
            ..defaults()
        };
        assert_eq!(
            normalize(&d, &SpendOverrides::default()),
            Err(SpendError::MissingAmount)
        );
    }

    #[test]
    fn empty_string_amounts_do_not_count() {
        let d = SpendDefaults {
            native_amount: Some(String::new()),
            ..defaults()
        };
        let overrides = SpendOverrides {
            native_amount: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(normalize(&d, &overrides), Err(SpendError::MissingAmount));
    }

    #[test]
    fn malformed_amounts_are_rejected() {
        let overrides = SpendOverrides {
            native_amount: Some("1.5".into()),
            ..Default::default()
        };
        assert_eq!(
            normalize(&defaults(), &overrides),
            Err(SpendError::InvalidAmount("1.5".into()))
        );
    }

    #[test]
    fn metadata_merges_field_wise() {
        let d = SpendDefaults {
            metadata: SpendMetadata {
                payee_name: "Coffee Shop".into(),
                category: "Food".into(),
                notes: "espresso".into(),
                ..Default::default()
            },
            ..defaults()
        };
        let overrides = SpendOverrides {
            native_amount: Some("100".into()),
            metadata: Some(MetadataPatch {
                category: Some("Drinks".into()),
                amount_fiat: Some(4.5),
                ..Default::default()
            }),
            ..Default::default()
        };
        let request = normalize(&d, &overrides).unwrap();
        assert_eq!(request.metadata.payee_name, "Coffee Shop");
        assert_eq!(request.metadata.category, "Drinks");
        assert_eq!(request.metadata.notes, "espresso");
        assert_eq!(request.metadata.amount_fiat, 4.5);
    }

    #[test]
    fn custom_fee_merges_entry_wise() {
        let d = SpendDefaults {
            custom_network_fee: BTreeMap::from([
                ("satPerByte".to_string(), "10".to_string()),
                ("gasLimit".to_string(), "21000".to_string()),
            ]),
            ..defaults()
        };
        let overrides = SpendOverrides {
            native_amount: Some("100".into()),
            custom_network_fee: Some(BTreeMap::from([(
                "satPerByte".to_string(),
                "25".to_string(),
            )])),
            ..Default::default()
        };
        let request = normalize(&d, &overrides).unwrap();
        assert_eq!(request.custom_network_fee["satPerByte"], "25");
        assert_eq!(request.custom_network_fee["gasLimit"], "21000");
    }

    #[test]
    fn normalization_is_idempotent() {
        let d = SpendDefaults {
            metadata: SpendMetadata {
                payee_name: "Alice".into(),
                ..Default::default()
            },
            ..defaults()
        };
        let overrides = SpendOverrides {
            native_amount: Some("500000".into()),
            public_address: Some("1xyz".into()),
            network_fee_option: Some(NetworkFeeOption::High),
            custom_network_fee: Some(BTreeMap::from([(
                "satPerByte".to_string(),
                "25".to_string(),
            )])),
            ..Default::default()
        };
        let once = normalize(&d, &overrides).unwrap();
        let twice = normalize(&SpendDefaults::from(&once), &SpendOverrides::default()).unwrap();
        assert_eq!(once, twice);
    }
}
