//! Derogatory-impact scoring for normalized credit reports.
//!
//! Data flow:
//!   ReportDocument (bureau JSON) -> CreditReport -> ImpactAnalyzer -> ImpactReport
//!
//! The analyzer is a pure function of its input. Every call builds its own
//! category map; nothing is shared between calls.

pub mod analyzer;
pub mod category;
pub mod config;
pub mod document;
pub mod error;
pub mod payment_pattern;
pub mod report;
pub mod types;

pub use analyzer::{AnalysisStatus, ImpactAnalyzer, ImpactReport};
pub use category::{CategorySummary, ImpactCategory, ImpactLevel};
pub use config::ImpactConfig;
pub use document::ReportDocument;
pub use error::{ImpactError, ImpactResult};
pub use report::{Account, AccountStatus, AccountType, Bureau, CreditReport, Inquiry};
