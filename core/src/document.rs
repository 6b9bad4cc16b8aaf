//! Bureau credit-response document and its normalization into `CreditReport`.
//!
//! The document is the merged tri-bureau JSON the report loader hands us.
//! Attribute names keep the source's `@`-prefixed spelling. Every scalar is
//! read as a loose JSON value: strings and numbers are both accepted, and
//! anything malformed degrades to zero or absent rather than failing.

use crate::{
    error::ImpactResult,
    report::{Account, AccountStatus, AccountType, Bureau, CreditReport, Inquiry},
    types::Amount,
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportDocument {
    #[serde(rename = "CREDIT_RESPONSE", default, deserialize_with = "lenient_object")]
    pub credit_response: Option<CreditResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditResponse {
    #[serde(rename = "@CreditReportFirstIssuedDate")]
    pub first_issued: Option<Value>,
    #[serde(rename = "CREDIT_LIABILITY", default, deserialize_with = "one_or_many")]
    pub liabilities: Option<Vec<LiabilityRecord>>,
    #[serde(rename = "CREDIT_INQUIRY", default, deserialize_with = "one_or_many")]
    pub inquiries: Option<Vec<InquiryRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LiabilityRecord {
    #[serde(rename = "@_AccountIdentifier")]
    pub account_identifier: Option<Value>,
    #[serde(rename = "_CREDITOR")]
    pub creditor: Option<Value>,
    #[serde(rename = "@_AccountType")]
    pub account_type: Option<Value>,
    #[serde(rename = "@_AccountStatusType")]
    pub account_status: Option<Value>,
    #[serde(rename = "@_DerogatoryDataIndicator")]
    pub derogatory: Option<Value>,
    #[serde(rename = "@IsCollectionIndicator")]
    pub collection: Option<Value>,
    #[serde(rename = "@IsChargeoffIndicator")]
    pub charge_off: Option<Value>,
    #[serde(rename = "@IsClosedIndicator")]
    pub closed: Option<Value>,
    #[serde(rename = "@_PastDueAmount")]
    pub past_due: Option<Value>,
    #[serde(rename = "_CURRENT_RATING")]
    pub current_rating: Option<Value>,
    #[serde(rename = "BalanceAmount")]
    pub balance: Option<Value>,
    #[serde(rename = "@_CreditLimitAmount")]
    pub credit_limit: Option<Value>,
    #[serde(rename = "AccountOpenedDate")]
    pub opened: Option<Value>,
    #[serde(rename = "@_ChargeOffDate")]
    pub charged_off: Option<Value>,
    #[serde(rename = "_PAYMENT_PATTERN")]
    pub payment_pattern: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryRecord {
    #[serde(rename = "@CreditFileID")]
    pub credit_file_id: Option<Value>,
    #[serde(rename = "@_Name")]
    pub name: Option<Value>,
    #[serde(rename = "@_Date")]
    pub date: Option<Value>,
    #[serde(rename = "@CreditBusinessType")]
    pub business_type: Option<Value>,
}

impl ReportDocument {
    pub fn from_json(content: &str) -> ImpactResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Normalize into a `CreditReport`.
    ///
    /// Returns `None` when the response or its liability section is missing:
    /// such a document was never loaded, which is not the same as a clean one.
    /// `fallback_as_of` is used when the issue date is absent or unreadable.
    pub fn to_report(&self, fallback_as_of: NaiveDate) -> Option<CreditReport> {
        let response = self.credit_response.as_ref()?;
        let liabilities = response.liabilities.as_ref()?;

        let as_of = match response.first_issued.as_ref().and_then(loose_date) {
            Some(d) => d,
            None => {
                log::warn!("Report issue date missing or unreadable; using {fallback_as_of}");
                fallback_as_of
            }
        };

        let accounts = liabilities
            .iter()
            .enumerate()
            .map(|(i, rec)| rec.to_account(i))
            .collect();

        let records = response.inquiries.as_deref().unwrap_or_default();
        for rec in records {
            let id = rec.credit_file_id.as_ref().and_then(loose_text);
            if id.as_deref().and_then(Bureau::from_file_id).is_none() {
                log::warn!("Dropping inquiry with unknown credit file id {:?}", id);
            }
        }
        // Grouped by bureau in fixed order; source order kept within a bureau.
        let inquiries = Bureau::ALL
            .into_iter()
            .flat_map(move |bureau| {
                records
                    .iter()
                    .filter(move |rec| rec.bureau() == Some(bureau))
                    .map(move |rec| rec.to_inquiry(bureau))
            })
            .collect();

        Some(CreditReport {
            as_of,
            accounts,
            inquiries,
        })
    }
}

impl LiabilityRecord {
    fn to_account(&self, index: usize) -> Account {
        let account_id = self
            .account_identifier
            .as_ref()
            .and_then(loose_text)
            .unwrap_or_else(|| format!("liability-{index}"));
        let account_type = self
            .account_type
            .as_ref()
            .and_then(loose_text)
            .map(|t| AccountType::parse(&t))
            .unwrap_or(AccountType::Other);

        let mut account = Account::new(account_id, account_type);
        account.creditor = loose_attribute(self.creditor.as_ref(), "@_Name")
            .and_then(loose_text)
            .unwrap_or_default();
        account.status = self
            .account_status
            .as_ref()
            .and_then(loose_text)
            .map(|s| AccountStatus::parse(&s));
        account.derogatory = loose_flag(self.derogatory.as_ref());
        account.collection = loose_flag(self.collection.as_ref());
        account.charge_off = loose_flag(self.charge_off.as_ref());
        account.closed = loose_flag(self.closed.as_ref());
        account.past_due = loose_amount(self.past_due.as_ref());
        account.balance = loose_amount(self.balance.as_ref());
        account.credit_limit = loose_amount(self.credit_limit.as_ref());
        account.current_rating =
            loose_attribute(self.current_rating.as_ref(), "@_Code").and_then(loose_text);
        account.opened_on = self.opened.as_ref().and_then(loose_date);
        account.charged_off_on = self.charged_off.as_ref().and_then(loose_date);
        account.charge_off_dated = self.charged_off.as_ref().and_then(loose_text).is_some();
        account.payment_pattern =
            loose_attribute(self.payment_pattern.as_ref(), "@_Data").and_then(loose_text);
        account
    }
}

impl InquiryRecord {
    fn bureau(&self) -> Option<Bureau> {
        self.credit_file_id
            .as_ref()
            .and_then(loose_text)
            .and_then(|id| Bureau::from_file_id(&id))
    }

    fn to_inquiry(&self, bureau: Bureau) -> Inquiry {
        let requester = self
            .name
            .as_ref()
            .and_then(loose_text)
            .unwrap_or_else(|| "Unknown Company".into());
        let mut inquiry = Inquiry::new(bureau, requester, self.date.as_ref().and_then(loose_date));
        if let Some(t) = self.business_type.as_ref().and_then(loose_text) {
            inquiry.business_type = t;
        }
        inquiry
    }
}

/// Accept either a single object or an array of them. Entries that are not
/// objects are skipped, and so is a section holding a bare scalar.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let records = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Array(items) => items.into_iter().filter_map(record).collect(),
        other => record(other).into_iter().collect(),
    };
    Ok(Some(records))
}

/// An object-valued field, or `None` for anything else.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(record(Value::deserialize(deserializer)?))
}

fn record<T: DeserializeOwned>(value: Value) -> Option<T> {
    if !value.is_object() {
        if !value.is_null() {
            log::warn!("Skipping non-object record {value}");
        }
        return None;
    }
    serde_json::from_value(value)
        .map_err(|e| log::warn!("Skipping malformed record: {e}"))
        .ok()
}

/// Attribute of a nested element such as `_CREDITOR`. A scalar in place of
/// the element has no attributes.
fn loose_attribute<'a>(element: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    element?.as_object()?.get(key)
}

/// Non-empty text of a string or number value.
fn loose_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Indicator flags are set only by "Y".
fn loose_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("Y"),
        _ => false,
    }
}

/// Whole-dollar amount. Strings take their leading integer ("12.7" -> 12,
/// "abc" -> 0); numbers are truncated.
fn loose_amount(value: Option<&Value>) -> Amount {
    match value {
        Some(Value::String(s)) => leading_integer(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn leading_integer(raw: &str) -> Amount {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

/// `YYYY-MM-DD`, optionally followed by a time part, `MM/DD/YYYY`, or a
/// bare `YYYY-MM` read as the first of that month.
fn loose_date(value: &Value) -> Option<NaiveDate> {
    let text = loose_text(value)?;
    let parsed = text
        .get(..10)
        .and_then(|head| {
            NaiveDate::parse_from_str(head, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(head, "%m/%d/%Y"))
                .ok()
        })
        .or_else(|| {
            (text.len() == 7)
                .then(|| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d").ok())
                .flatten()
        });
    if parsed.is_none() {
        log::warn!("Ignoring unreadable date {text:?}");
    }
    parsed
}
