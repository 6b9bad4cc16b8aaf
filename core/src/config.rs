//! Scoring constants.
//!
//! `ImpactConfig::default()` carries the production point table. A JSON
//! file may override any subset of it; omitted fields keep their defaults.

use crate::{
    error::{ImpactError, ImpactResult},
    types::Points,
};
use serde::{Deserialize, Serialize};

/// A `(threshold_pct, points)` step: applies when the value is strictly above
/// `threshold_pct`. Tiers are listed highest threshold first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Tier {
    pub above:  f64,
    pub points: Points,
}

impl Tier {
    pub const fn new(above: f64, points: Points) -> Self {
        Self { above, points }
    }
}

/// First tier whose threshold `value` exceeds, else `floor`.
pub fn tiered_points(value: f64, tiers: &[Tier], floor: Points) -> Points {
    tiers
        .iter()
        .find(|t| value > t.above)
        .map(|t| t.points)
        .unwrap_or(floor)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DerogatoryConfig {
    pub charge_off:            Points,
    pub collection:            Points,
    pub past_due_large:        Points,
    pub past_due_small:        Points,
    /// Past-due amounts above this are "large".
    pub past_due_large_above:  i64,
    pub serious_delinquency:   Points,
    pub late_90:               Points,
    pub late_60:               Points,
    pub late_30:               Points,
    pub late_payment_fallback: Points,
}

impl Default for DerogatoryConfig {
    fn default() -> Self {
        Self {
            charge_off:            12,
            collection:            10,
            past_due_large:        8,
            past_due_small:        5,
            past_due_large_above:  1000,
            serious_delinquency:   10,
            late_90:               8,
            late_60:               6,
            late_30:               4,
            late_payment_fallback: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UtilizationConfig {
    /// Utilization percentage above which an account (or the aggregate) counts.
    pub high_above_pct:     f64,
    pub account_tiers:      Vec<Tier>,
    pub account_floor:      Points,
    pub aggregate_tiers:    Vec<Tier>,
    pub aggregate_floor:    Points,
    pub high_level_above:   Points,
    pub medium_level_above: Points,
}

impl Default for UtilizationConfig {
    fn default() -> Self {
        Self {
            high_above_pct:     30.0,
            account_tiers:      vec![Tier::new(90.0, 8), Tier::new(70.0, 6), Tier::new(50.0, 4)],
            account_floor:      2,
            aggregate_tiers:    vec![Tier::new(90.0, 10), Tier::new(70.0, 7), Tier::new(50.0, 5)],
            aggregate_floor:    3,
            high_level_above:   15,
            medium_level_above: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InquiryConfig {
    /// Inquiries newer than this many months before the report date are recent.
    pub lookback_months:    u32,
    pub single:             Points,
    pub pair:               Points,
    pub per_inquiry:        Points,
    pub cap:                Points,
    pub medium_level_above: Points,
}

impl Default for InquiryConfig {
    fn default() -> Self {
        Self {
            lookback_months:    24,
            single:             1,
            pair:               2,
            per_inquiry:        2,
            cap:                8,
            medium_level_above: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CreditAgeConfig {
    /// Average age (years) below which the file counts as thin.
    pub thin_below_years:      f64,
    /// Average age (years) below which the higher base applies.
    pub very_thin_below_years: f64,
    /// Accounts younger than this (years) are new.
    pub new_below_years:       f64,
    /// More new accounts than this triggers the category on its own.
    pub new_accounts_trigger:  u32,
    pub very_thin_base:        Points,
    pub thin_base:             Points,
    pub per_new_account:       Points,
    pub cap:                   Points,
    pub medium_level_above:    Points,
}

impl Default for CreditAgeConfig {
    fn default() -> Self {
        Self {
            thin_below_years:      4.0,
            very_thin_below_years: 2.0,
            new_below_years:       1.0,
            new_accounts_trigger:  2,
            very_thin_base:        6,
            thin_base:             4,
            per_new_account:       2,
            cap:                   10,
            medium_level_above:    6,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImpactConfig {
    pub derogatory:  DerogatoryConfig,
    pub utilization: UtilizationConfig,
    pub inquiries:   InquiryConfig,
    pub credit_age:  CreditAgeConfig,
}

impl ImpactConfig {
    /// Load overrides from a JSON file and validate them.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)
            .map_err(|e| anyhow::anyhow!("Cannot load {path}: {e}"))?;
        log::info!("Loaded impact config from {path}");
        Ok(config)
    }

    pub fn from_json(content: &str) -> ImpactResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ImpactResult<()> {
        let u = &self.utilization;
        check_tiers("utilization.account_tiers", &u.account_tiers)?;
        check_tiers("utilization.aggregate_tiers", &u.aggregate_tiers)?;
        if u.account_tiers.iter().any(|t| t.above < u.high_above_pct)
            || u.aggregate_tiers.iter().any(|t| t.above < u.high_above_pct)
        {
            return Err(invalid("utilization tiers must sit above high_above_pct"));
        }
        if self.inquiries.lookback_months == 0 {
            return Err(invalid("inquiries.lookback_months must be positive"));
        }
        let age = &self.credit_age;
        if age.very_thin_below_years > age.thin_below_years {
            return Err(invalid(
                "credit_age.very_thin_below_years must not exceed thin_below_years",
            ));
        }
        Ok(())
    }
}

fn check_tiers(name: &str, tiers: &[Tier]) -> ImpactResult<()> {
    if tiers.windows(2).any(|w| w[0].above <= w[1].above) {
        return Err(invalid(&format!("{name} must be listed in strictly descending order")));
    }
    Ok(())
}

fn invalid(reason: &str) -> ImpactError {
    ImpactError::InvalidConfig {
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_pick_first_exceeded_threshold() {
        let tiers = UtilizationConfig::default().account_tiers;
        assert_eq!(tiered_points(95.0, &tiers, 2), 8);
        assert_eq!(tiered_points(90.0, &tiers, 2), 6);
        assert_eq!(tiered_points(71.0, &tiers, 2), 6);
        assert_eq!(tiered_points(50.5, &tiers, 2), 4);
        assert_eq!(tiered_points(31.0, &tiers, 2), 2);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ImpactConfig::default().validate().is_ok());
    }
}
