//! Impact categories and the per-run category map.
//!
//! RULES:
//!   - One entry per category per run; later contributions merge.
//!   - Levels only move up: Low -> Medium -> High. High is sticky.
//!   - total_impact is always derived from impacts, never stored.

use crate::types::Points;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImpactCategory {
    #[serde(rename = "Charge-offs")]
    ChargeOffs,
    #[serde(rename = "Collections")]
    Collections,
    #[serde(rename = "Past Due Accounts")]
    PastDueAccounts,
    #[serde(rename = "Serious Delinquencies")]
    SeriousDelinquencies,
    #[serde(rename = "90+ Day Lates")]
    Late90,
    #[serde(rename = "60+ Day Lates")]
    Late60,
    #[serde(rename = "30+ Day Lates")]
    Late30,
    #[serde(rename = "Late Payments")]
    LatePayments,
    #[serde(rename = "High Credit Utilization")]
    HighUtilization,
    #[serde(rename = "Hard Inquiries")]
    HardInquiries,
    #[serde(rename = "Limited Credit History")]
    LimitedHistory,
}

impl ImpactCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::ChargeOffs           => "Charge-offs",
            Self::Collections          => "Collections",
            Self::PastDueAccounts      => "Past Due Accounts",
            Self::SeriousDelinquencies => "Serious Delinquencies",
            Self::Late90               => "90+ Day Lates",
            Self::Late60               => "60+ Day Lates",
            Self::Late30               => "30+ Day Lates",
            Self::LatePayments         => "Late Payments",
            Self::HighUtilization      => "High Credit Utilization",
            Self::HardInquiries        => "Hard Inquiries",
            Self::LimitedHistory       => "Limited Credit History",
        }
    }

    /// Compact label for narrow layouts.
    pub fn short_label(self) -> &'static str {
        match self {
            Self::PastDueAccounts => "Past Due",
            Self::HighUtilization => "High Utilization",
            other                 => other.label(),
        }
    }
}

impl std::fmt::Display for ImpactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

/// One row of the analyzer's output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category:     ImpactCategory,
    pub count:        u32,
    pub impacts:      Vec<Points>,
    pub avg_impact:   Points,
    pub total_impact: Points,
    pub impact_level: ImpactLevel,
}

#[derive(Debug, Clone)]
struct Accumulator {
    count:   u32,
    impacts: Vec<Points>,
    level:   ImpactLevel,
}

/// Insertion-ordered map from category to its running accumulator.
/// Built fresh for every analysis call.
#[derive(Debug, Default)]
pub struct CategoryMap {
    entries: Vec<(ImpactCategory, Accumulator)>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fold one signal into `category`: `count` more items, one impact entry,
    /// and a level that can only raise the stored one. Counts saturate.
    pub fn record(&mut self, category: ImpactCategory, count: u32, impact: Points, level: ImpactLevel) {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, acc)) => {
                acc.count = acc.count.saturating_add(count);
                acc.impacts.push(impact);
                acc.level = acc.level.max(level);
            }
            None => self.entries.push((
                category,
                Accumulator {
                    count,
                    impacts: vec![impact],
                    level,
                },
            )),
        }
    }

    /// Stored level for `category`, if any signal has landed there.
    pub fn level_of(&self, category: ImpactCategory) -> Option<ImpactLevel> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, acc)| acc.level)
    }

    /// Summaries sorted by total impact, highest first. Equal totals keep
    /// discovery order.
    pub fn into_summaries(self) -> Vec<CategorySummary> {
        let mut summaries: Vec<CategorySummary> = self
            .entries
            .into_iter()
            .map(|(category, acc)| {
                let exact: u64 = acc.impacts.iter().map(|&p| u64::from(p)).sum();
                let total = Points::try_from(exact).unwrap_or(Points::MAX);
                let avg = (exact as f64 / acc.impacts.len() as f64).round() as Points;
                CategorySummary {
                    category,
                    count: acc.count,
                    impacts: acc.impacts,
                    avg_impact: avg,
                    total_impact: total,
                    impact_level: acc.level,
                }
            })
            .collect();
        // sort_by is stable
        summaries.sort_by(|a, b| b.total_impact.cmp(&a.total_impact));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_into_existing_entry() {
        let mut map = CategoryMap::new();
        map.record(ImpactCategory::Collections, 1, 10, ImpactLevel::High);
        map.record(ImpactCategory::Collections, 1, 10, ImpactLevel::High);
        assert_eq!(map.len(), 1);

        let out = map.into_summaries();
        assert_eq!(out[0].count, 2);
        assert_eq!(out[0].impacts, vec![10, 10]);
        assert_eq!(out[0].total_impact, 20);
        assert_eq!(out[0].avg_impact, 10);
    }

    #[test]
    fn level_never_downgrades() {
        let mut map = CategoryMap::new();
        map.record(ImpactCategory::PastDueAccounts, 1, 5, ImpactLevel::Low);
        assert_eq!(map.level_of(ImpactCategory::PastDueAccounts), Some(ImpactLevel::Low));

        map.record(ImpactCategory::PastDueAccounts, 1, 8, ImpactLevel::Medium);
        assert_eq!(map.level_of(ImpactCategory::PastDueAccounts), Some(ImpactLevel::Medium));

        map.record(ImpactCategory::PastDueAccounts, 1, 5, ImpactLevel::Low);
        assert_eq!(map.level_of(ImpactCategory::PastDueAccounts), Some(ImpactLevel::Medium));
    }

    #[test]
    fn average_is_rounded() {
        let mut map = CategoryMap::new();
        map.record(ImpactCategory::PastDueAccounts, 1, 8, ImpactLevel::Medium);
        map.record(ImpactCategory::PastDueAccounts, 1, 5, ImpactLevel::Low);
        let out = map.into_summaries();
        // 13 / 2 = 6.5 rounds half away from zero
        assert_eq!(out[0].avg_impact, 7);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut map = CategoryMap::new();
        map.record(ImpactCategory::Late30, 1, 4, ImpactLevel::Low);
        map.record(ImpactCategory::ChargeOffs, 1, 12, ImpactLevel::High);
        map.record(ImpactCategory::HardInquiries, 2, 4, ImpactLevel::Low);

        let order: Vec<_> = map.into_summaries().into_iter().map(|s| s.category).collect();
        assert_eq!(
            order,
            vec![
                ImpactCategory::ChargeOffs,
                ImpactCategory::Late30,
                ImpactCategory::HardInquiries,
            ]
        );
    }

    #[test]
    fn huge_impacts_saturate_instead_of_wrapping() {
        let mut map = CategoryMap::new();
        map.record(ImpactCategory::ChargeOffs, u32::MAX, 4_000_000_000, ImpactLevel::High);
        map.record(ImpactCategory::ChargeOffs, 1, 4_000_000_000, ImpactLevel::High);

        let out = map.into_summaries();
        assert_eq!(out[0].count, u32::MAX);
        assert_eq!(out[0].total_impact, Points::MAX);
        assert_eq!(out[0].avg_impact, 4_000_000_000);
    }

    #[test]
    fn short_labels() {
        assert_eq!(ImpactCategory::PastDueAccounts.short_label(), "Past Due");
        assert_eq!(ImpactCategory::HighUtilization.short_label(), "High Utilization");
        assert_eq!(ImpactCategory::Collections.short_label(), "Collections");
        assert_eq!(ImpactCategory::Late90.to_string(), "90+ Day Lates");
    }
}
