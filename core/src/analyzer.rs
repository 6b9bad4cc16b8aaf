//! Derogatory-impact analyzer.
//!
//! PASSES (fixed order, each folding into one per-call CategoryMap):
//!   1. Derogatory accounts:   one sub-category per qualifying account
//!   2. Revolving utilization: one combined "High Credit Utilization" entry
//!   3. Hard inquiries:        recent inquiries across all bureaus
//!   4. Credit age:            thin file or a burst of new accounts;
//!                             undated accounts count as age zero only when
//!                             no account carries an open date
//!   5. Finalize:              averages, totals, stable sort by total
//!
//! Point sums saturate at `Points::MAX` instead of wrapping.
//!
//! The analyzer holds only its config. It never mutates its input and keeps
//! no state between calls, so one instance can serve any number of threads.

use crate::{
    category::{CategoryMap, CategorySummary, ImpactCategory, ImpactLevel},
    config::{tiered_points, ImpactConfig},
    document::ReportDocument,
    report::{Account, CreditReport},
    types::{Points, DAYS_PER_YEAR},
};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// At least one category was found.
    Findings,
    /// The report was analyzed and nothing affects the score.
    NoImpact,
    /// No report was available to analyze.
    ReportUnavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImpactReport {
    pub status:               AnalysisStatus,
    pub categories:           Vec<CategorySummary>,
    pub total_potential_gain: Points,
}

impl ImpactReport {
    pub fn unavailable() -> Self {
        Self {
            status: AnalysisStatus::ReportUnavailable,
            categories: Vec::new(),
            total_potential_gain: 0,
        }
    }

    fn from_summaries(categories: Vec<CategorySummary>) -> Self {
        let total_potential_gain = categories
            .iter()
            .fold(0, |sum: Points, c| sum.saturating_add(c.total_impact));
        let status = if categories.is_empty() {
            AnalysisStatus::NoImpact
        } else {
            AnalysisStatus::Findings
        };
        Self {
            status,
            categories,
            total_potential_gain,
        }
    }

    pub fn category(&self, category: ImpactCategory) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.category == category)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImpactAnalyzer {
    config: ImpactConfig,
}

impl ImpactAnalyzer {
    pub fn new(config: ImpactConfig) -> Self {
        Self { config }
    }

    /// Analyze a report. `None` means the report never loaded and yields
    /// `AnalysisStatus::ReportUnavailable`.
    pub fn analyze(&self, report: Option<&CreditReport>) -> ImpactReport {
        let Some(report) = report else {
            log::info!("No credit report available; skipping impact analysis");
            return ImpactReport::unavailable();
        };

        let mut map = CategoryMap::new();
        self.score_derogatory_accounts(report, &mut map);
        self.score_utilization(report, &mut map);
        self.score_inquiries(report, &mut map);
        self.score_credit_age(report, &mut map);

        let result = ImpactReport::from_summaries(map.into_summaries());
        log::info!(
            "Impact analysis as of {}: {} categories, +{} potential points",
            report.as_of,
            result.categories.len(),
            result.total_potential_gain
        );
        result
    }

    /// Normalize a bureau document and analyze it in one step.
    pub fn analyze_document(&self, document: &ReportDocument, fallback_as_of: NaiveDate) -> ImpactReport {
        self.analyze(document.to_report(fallback_as_of).as_ref())
    }

    // ── Pass 1: derogatory accounts ────────────────────────────────

    fn score_derogatory_accounts(&self, report: &CreditReport, map: &mut CategoryMap) {
        let mut qualifying: u32 = 0;
        for account in report.accounts.iter().filter(|a| is_derogatory(a)) {
            let (category, impact, level) = self.classify_derogatory(account);
            map.record(category, 1, impact, level);
            qualifying = qualifying.saturating_add(1);
        }
        log::debug!("Derogatory pass: {qualifying} qualifying accounts");
    }

    /// First match wins: charge-off, collection, past due, then rating grade.
    fn classify_derogatory(&self, account: &Account) -> (ImpactCategory, Points, ImpactLevel) {
        let cfg = &self.config.derogatory;

        if account.charge_off {
            return (ImpactCategory::ChargeOffs, cfg.charge_off, ImpactLevel::High);
        }
        if account.collection {
            return (ImpactCategory::Collections, cfg.collection, ImpactLevel::High);
        }
        if account.past_due > 0 {
            return if account.past_due > cfg.past_due_large_above {
                (ImpactCategory::PastDueAccounts, cfg.past_due_large, ImpactLevel::Medium)
            } else {
                (ImpactCategory::PastDueAccounts, cfg.past_due_small, ImpactLevel::Low)
            };
        }
        match account.delinquency_rating() {
            Some(8..=9) => (ImpactCategory::SeriousDelinquencies, cfg.serious_delinquency, ImpactLevel::High),
            Some(6..=7) => (ImpactCategory::Late90, cfg.late_90, ImpactLevel::High),
            Some(4..=5) => (ImpactCategory::Late60, cfg.late_60, ImpactLevel::Medium),
            Some(2..=3) => (ImpactCategory::Late30, cfg.late_30, ImpactLevel::Low),
            _ => (ImpactCategory::LatePayments, cfg.late_payment_fallback, ImpactLevel::Low),
        }
    }

    // ── Pass 2: revolving utilization ──────────────────────────────

    fn score_utilization(&self, report: &CreditReport, map: &mut CategoryMap) {
        let cfg = &self.config.utilization;

        let mut high_count: u32 = 0;
        let mut total_points: Points = 0;
        let mut total_balance: f64 = 0.0;
        let mut total_limit: f64 = 0.0;

        for account in report
            .accounts
            .iter()
            .filter(|a| a.is_revolving() && a.is_open() && a.credit_limit > 0)
        {
            let balance = account.balance as f64;
            let limit = account.credit_limit as f64;
            total_balance += balance;
            total_limit += limit;

            let utilization = balance / limit * 100.0;
            if utilization > cfg.high_above_pct {
                high_count = high_count.saturating_add(1);
                total_points = total_points
                    .saturating_add(tiered_points(utilization, &cfg.account_tiers, cfg.account_floor));
            }
        }

        if total_limit > 0.0 {
            let overall = total_balance / total_limit * 100.0;
            if overall > cfg.high_above_pct {
                total_points = total_points
                    .saturating_add(tiered_points(overall, &cfg.aggregate_tiers, cfg.aggregate_floor));
            }
            log::debug!("Utilization pass: overall {overall:.1}%, {high_count} high accounts");
        }

        if total_points > 0 {
            let level = if total_points > cfg.high_level_above {
                ImpactLevel::High
            } else if total_points > cfg.medium_level_above {
                ImpactLevel::Medium
            } else {
                ImpactLevel::Low
            };
            map.record(ImpactCategory::HighUtilization, high_count.max(1), total_points, level);
        }
    }

    // ── Pass 3: hard inquiries ─────────────────────────────────────

    fn score_inquiries(&self, report: &CreditReport, map: &mut CategoryMap) {
        let cfg = &self.config.inquiries;
        let cutoff = report
            .as_of
            .checked_sub_months(Months::new(cfg.lookback_months))
            .unwrap_or(NaiveDate::MIN);

        let recent: u32 = report
            .inquiries
            .iter()
            .filter(|i| i.inquired_on.is_some_and(|d| d > cutoff))
            .count()
            .try_into()
            .unwrap_or(u32::MAX);
        log::debug!("Inquiry pass: {recent} of {} inquiries after {cutoff}", report.inquiries.len());

        if recent == 0 {
            return;
        }
        let impact = match recent {
            1 => cfg.single,
            2 => cfg.pair,
            n => n.saturating_mul(cfg.per_inquiry).min(cfg.cap),
        };
        let level = if impact > cfg.medium_level_above {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        };
        map.record(ImpactCategory::HardInquiries, recent, impact, level);
    }

    // ── Pass 4: credit age ─────────────────────────────────────────

    fn score_credit_age(&self, report: &CreditReport, map: &mut CategoryMap) {
        let cfg = &self.config.credit_age;

        let ages: Vec<f64> = report
            .accounts
            .iter()
            .filter_map(|a| a.opened_on)
            .map(|opened| (report.as_of - opened).num_days() as f64 / DAYS_PER_YEAR)
            .collect();

        if report.accounts.is_empty() {
            log::debug!("Credit age pass: no accounts");
            return;
        }
        // With no open dates at all the file has no provable age.
        let avg_age = if ages.is_empty() {
            0.0
        } else {
            ages.iter().sum::<f64>() / ages.len() as f64
        };
        let new_accounts: u32 = ages
            .iter()
            .filter(|&&age| age < cfg.new_below_years)
            .count()
            .try_into()
            .unwrap_or(u32::MAX);
        log::debug!("Credit age pass: average {avg_age:.2} years, {new_accounts} new accounts");

        if avg_age >= cfg.thin_below_years && new_accounts <= cfg.new_accounts_trigger {
            return;
        }
        let base = if avg_age < cfg.very_thin_below_years {
            cfg.very_thin_base
        } else {
            cfg.thin_base
        };
        let impact = base
            .saturating_add(new_accounts.saturating_mul(cfg.per_new_account))
            .min(cfg.cap);
        let level = if impact > cfg.medium_level_above {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        };
        map.record(ImpactCategory::LimitedHistory, new_accounts.max(1), impact, level);
    }
}

/// Any negative marker: a flag, a past-due balance, a late rating grade, or
/// a recorded charge-off date.
fn is_derogatory(account: &Account) -> bool {
    account.derogatory
        || account.collection
        || account.charge_off
        || account.past_due > 0
        || account.delinquency_rating().is_some()
        || account.has_charge_off_date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::AccountType;

    #[test]
    fn clean_account_is_not_derogatory() {
        let mut a = Account::new("a-1", AccountType::Installment);
        a.current_rating = Some("1".into());
        assert!(!is_derogatory(&a));

        a.charged_off_on = NaiveDate::from_ymd_opt(2022, 3, 1);
        assert!(is_derogatory(&a));
    }

    #[test]
    fn reported_but_unparsed_charge_off_date_is_derogatory() {
        let mut a = Account::new("a-1", AccountType::Installment);
        a.charge_off_dated = true;
        assert!(is_derogatory(&a));
        assert_eq!(
            ImpactAnalyzer::default().classify_derogatory(&a),
            (ImpactCategory::LatePayments, 8, ImpactLevel::Low)
        );
    }

    #[test]
    fn collection_outranks_past_due() {
        let analyzer = ImpactAnalyzer::default();
        let mut a = Account::new("a-1", AccountType::Open);
        a.collection = true;
        a.past_due = 5_000;
        let (category, impact, level) = analyzer.classify_derogatory(&a);
        assert_eq!(category, ImpactCategory::Collections);
        assert_eq!(impact, 10);
        assert_eq!(level, ImpactLevel::High);
    }

    #[test]
    fn flag_without_narrower_signal_is_late_payment() {
        let analyzer = ImpactAnalyzer::default();
        let mut a = Account::new("a-1", AccountType::Installment);
        a.derogatory = true;
        a.current_rating = Some("1".into());
        assert_eq!(
            analyzer.classify_derogatory(&a),
            (ImpactCategory::LatePayments, 8, ImpactLevel::Low)
        );
    }
}
