//! impact-runner: headless score-impact analysis of a bureau report file.
//!
//! Usage:
//!   impact-runner --report report.json
//!   impact-runner --report report.json --config impact.json --as-of 2023-07-06 --json

use anyhow::{Context, Result};
use chrono::NaiveDate;
use credit_impact_core::{AnalysisStatus, ImpactAnalyzer, ImpactConfig, ImpactReport, ReportDocument};
use std::env;

#[derive(serde::Serialize)]
struct JsonOut<'a> {
    report_path: &'a str,
    as_of:       NaiveDate,
    #[serde(flatten)]
    impact:      &'a ImpactReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let report_path = parse_arg(&args, "--report")
        .context("missing --report <file.json>")?;
    let config_path = parse_arg(&args, "--config");
    let json_mode = args.iter().any(|a| a == "--json");
    let as_of = match parse_arg(&args, "--as-of") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("--as-of expects YYYY-MM-DD, got {raw}"))?,
        None => chrono::Local::now().date_naive(),
    };

    let config = match config_path {
        Some(path) => ImpactConfig::load(path)?,
        None => ImpactConfig::default(),
    };

    let content = std::fs::read_to_string(report_path)
        .with_context(|| format!("Cannot read {report_path}"))?;
    let document = ReportDocument::from_json(&content)
        .with_context(|| format!("Cannot parse {report_path}"))?;

    let analyzer = ImpactAnalyzer::new(config);
    let impact = analyzer.analyze_document(&document, as_of);

    if json_mode {
        let out = JsonOut {
            report_path,
            as_of,
            impact: &impact,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_summary(report_path, &impact);
    }

    Ok(())
}

fn print_summary(report_path: &str, impact: &ImpactReport) {
    println!("=== SCORE IMPACT ===");
    println!("  report: {report_path}");
    match impact.status {
        AnalysisStatus::ReportUnavailable => {
            println!("  (Report not loaded: no liability section found)");
            return;
        }
        AnalysisStatus::NoImpact => {
            println!("  No Major Credit Score Impact");
            println!("  No significant derogatory items affecting credit scores.");
            return;
        }
        AnalysisStatus::Findings => {}
    }

    println!("  potential gain: +{} points", impact.total_potential_gain);
    println!();
    for c in &impact.categories {
        let noun = if c.count == 1 { "item" } else { "items" };
        println!(
            "  {:<24} {:>3} {:<5} +{:<3} ({:?})",
            c.category.label(),
            c.count,
            noun,
            c.total_impact,
            c.impact_level
        );
    }
}

fn parse_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
