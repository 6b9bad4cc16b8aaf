//! Loading scoring overrides and running the analyzer with them.

use chrono::NaiveDate;
use credit_impact_core::{
    Account, AccountType, Bureau, CreditReport, ImpactAnalyzer, ImpactCategory, ImpactConfig,
    ImpactError, Inquiry,
};

fn report_with_inquiries(n: usize) -> CreditReport {
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let mut report = CreditReport::new(as_of);
    report.inquiries = (0..n)
        .map(|i| Inquiry::new(Bureau::Experian, format!("Lender {i}"), NaiveDate::from_ymd_opt(2024, 5, 1)))
        .collect();
    report
}

fn charged_off(id: &str) -> Account {
    let mut a = Account::new(id, AccountType::Installment);
    a.charge_off = true;
    a.opened_on = NaiveDate::from_ymd_opt(2012, 1, 1);
    a
}

#[test]
fn partial_override_keeps_other_defaults() {
    let config = ImpactConfig::from_json(r#"{"inquiries": {"cap": 5}}"#).unwrap();
    assert_eq!(config.inquiries.cap, 5);
    assert_eq!(config.inquiries.per_inquiry, 2);
    assert_eq!(config.derogatory, ImpactConfig::default().derogatory);

    let result = ImpactAnalyzer::new(config).analyze(Some(&report_with_inquiries(4)));
    let c = result.category(ImpactCategory::HardInquiries).unwrap();
    assert_eq!(c.impacts, vec![5]);
}

#[test]
fn derogatory_points_are_configurable() {
    let config = ImpactConfig::from_json(r#"{"derogatory": {"charge_off": 20}}"#).unwrap();

    let mut report = report_with_inquiries(0);
    report.accounts.push(charged_off("co"));

    let result = ImpactAnalyzer::new(config).analyze(Some(&report));
    assert_eq!(result.total_potential_gain, 20);
}

#[test]
fn oversized_points_saturate_instead_of_overflowing() {
    let config =
        ImpactConfig::from_json(r#"{"derogatory": {"charge_off": 4000000000}}"#).unwrap();

    let mut report = report_with_inquiries(3);
    report.accounts.push(charged_off("co-1"));
    report.accounts.push(charged_off("co-2"));

    let result = ImpactAnalyzer::new(config).analyze(Some(&report));
    let c = result.category(ImpactCategory::ChargeOffs).unwrap();
    assert_eq!(c.impacts, vec![4_000_000_000, 4_000_000_000]);
    assert_eq!(c.total_impact, u32::MAX);
    assert_eq!(c.avg_impact, 4_000_000_000);
    assert_eq!(result.total_potential_gain, u32::MAX);
}

#[test]
fn rejects_unordered_tiers() {
    let err = ImpactConfig::from_json(
        r#"{"utilization": {"account_tiers": [{"above": 50.0, "points": 4}, {"above": 90.0, "points": 8}]}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ImpactError::InvalidConfig { .. }), "got {err}");
}

#[test]
fn rejects_zero_lookback() {
    let err = ImpactConfig::from_json(r#"{"inquiries": {"lookback_months": 0}}"#).unwrap_err();
    assert!(err.to_string().contains("lookback_months"));
}

#[test]
fn load_reads_file_and_reports_missing_path() {
    let dir = std::env::temp_dir().join(format!("impact-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("impact.json");
    std::fs::write(&path, r#"{"credit_age": {"cap": 8}}"#).unwrap();

    let config = ImpactConfig::load(path.to_str().unwrap()).unwrap();
    assert_eq!(config.credit_age.cap, 8);

    let missing = dir.join("absent.json");
    let err = ImpactConfig::load(missing.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("absent.json"));

    std::fs::remove_dir_all(&dir).ok();
}
