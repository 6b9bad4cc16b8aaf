//! Normalized credit report: the analyzer's only input.
//!
//! Built by `document::ReportDocument::to_report` from the bureau JSON,
//! or directly by callers that already hold normalized data.

use crate::{
    payment_pattern::PaymentHistory,
    types::Amount,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditReport {
    /// Report issue date. Ages and inquiry recency are measured from here.
    pub as_of:     NaiveDate,
    pub accounts:  Vec<Account>,
    pub inquiries: Vec<Inquiry>,
}

impl CreditReport {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            accounts:  Vec::new(),
            inquiries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.inquiries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Revolving,
    Installment,
    Mortgage,
    Open,
    Other,
}

impl AccountType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Revolving"   => Self::Revolving,
            "Installment" => Self::Installment,
            "Mortgage"    => Self::Mortgage,
            "Open"        => Self::Open,
            _             => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Open,
    Closed,
    Paid,
    Other,
}

impl AccountStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Open"   => Self::Open,
            "Closed" => Self::Closed,
            "Paid"   => Self::Paid,
            _        => Self::Other,
        }
    }
}

/// One tradeline. Missing numeric fields are zero, missing dates are `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub account_id:      String,
    pub creditor:        String,
    pub account_type:    AccountType,
    pub status:          Option<AccountStatus>,
    #[serde(default)]
    pub derogatory:      bool,
    #[serde(default)]
    pub collection:      bool,
    #[serde(default)]
    pub charge_off:      bool,
    #[serde(default)]
    pub closed:          bool,
    #[serde(default)]
    pub past_due:        Amount,
    #[serde(default)]
    pub balance:         Amount,
    #[serde(default)]
    pub credit_limit:    Amount,
    pub current_rating:  Option<String>,
    pub opened_on:       Option<NaiveDate>,
    pub charged_off_on:  Option<NaiveDate>,
    /// A charge-off date was reported, whether or not it could be parsed.
    #[serde(default)]
    pub charge_off_dated: bool,
    pub payment_pattern: Option<String>,
}

impl Account {
    /// A blank tradeline of the given type: no flags, no amounts, no dates.
    pub fn new(account_id: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            account_id: account_id.into(),
            creditor: String::new(),
            account_type,
            status: None,
            derogatory: false,
            collection: false,
            charge_off: false,
            closed: false,
            past_due: 0,
            balance: 0,
            credit_limit: 0,
            current_rating: None,
            opened_on: None,
            charged_off_on: None,
            charge_off_dated: false,
            payment_pattern: None,
        }
    }

    /// Open when the status says so, or when the closed flag is not set.
    pub fn is_open(&self) -> bool {
        self.status == Some(AccountStatus::Open) || !self.closed
    }

    pub fn is_revolving(&self) -> bool {
        self.account_type == AccountType::Revolving
    }

    /// Current rating as a delinquency grade, only for single-digit codes 2..=9.
    /// "1" (current) and non-numeric codes such as "X" yield `None`.
    pub fn delinquency_rating(&self) -> Option<u8> {
        let code = self.current_rating.as_deref()?.trim();
        match code.as_bytes() {
            [b @ b'2'..=b'9'] => Some(b - b'0'),
            _ => None,
        }
    }

    pub fn has_charge_off_date(&self) -> bool {
        self.charge_off_dated || self.charged_off_on.is_some()
    }

    pub fn payment_history(&self) -> PaymentHistory {
        PaymentHistory::parse(self.payment_pattern.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Bureau {
    Equifax,
    Experian,
    TransUnion,
}

impl Bureau {
    /// Bureau order used when gathering inquiries.
    pub const ALL: [Bureau; 3] = [Bureau::Equifax, Bureau::Experian, Bureau::TransUnion];

    /// Credit file id the bureau's records carry in the source document.
    pub fn file_id(self) -> &'static str {
        match self {
            Bureau::Equifax    => "EA01",
            Bureau::Experian   => "RA01",
            Bureau::TransUnion => "TA01",
        }
    }

    pub fn from_file_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.file_id() == id.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Inquiry {
    pub bureau:        Bureau,
    pub requester:     String,
    pub inquired_on:   Option<NaiveDate>,
    pub business_type: String,
}

impl Inquiry {
    pub fn new(bureau: Bureau, requester: impl Into<String>, inquired_on: Option<NaiveDate>) -> Self {
        Self {
            bureau,
            requester: requester.into(),
            inquired_on,
            business_type: "Unknown".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_rating(code: &str) -> Account {
        let mut a = Account::new("a-1", AccountType::Installment);
        a.current_rating = Some(code.into());
        a
    }

    #[test]
    fn delinquency_rating_accepts_only_grades_two_through_nine() {
        assert_eq!(with_rating("2").delinquency_rating(), Some(2));
        assert_eq!(with_rating("9").delinquency_rating(), Some(9));
        assert_eq!(with_rating("1").delinquency_rating(), None);
        assert_eq!(with_rating("X").delinquency_rating(), None);
        assert_eq!(with_rating("22").delinquency_rating(), None);
        assert_eq!(Account::new("a-2", AccountType::Open).delinquency_rating(), None);
    }

    #[test]
    fn open_unless_flagged_closed() {
        let mut a = Account::new("a-1", AccountType::Revolving);
        assert!(a.is_open());

        a.closed = true;
        assert!(!a.is_open());

        a.status = Some(AccountStatus::Open);
        assert!(a.is_open(), "explicit Open status wins over the closed flag");
    }

    #[test]
    fn bureau_file_ids_round_trip() {
        for b in Bureau::ALL {
            assert_eq!(Bureau::from_file_id(b.file_id()), Some(b));
        }
        assert_eq!(Bureau::from_file_id("ZZ99"), None);
    }
}
