//! Payment pattern decoding.
//!
//! A tradeline's payment pattern is a string of one-character monthly
//! codes, oldest month first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    NoData,
    Current,
    Late30,
    Late60,
    Late90,
    Late120,
    Late150,
    Late180,
    Late210Plus,
}

impl PaymentStatus {
    pub fn from_code(code: char) -> Self {
        match code {
            'C' => Self::Current,
            '1' => Self::Late30,
            '2' => Self::Late60,
            '3' => Self::Late90,
            '4' => Self::Late120,
            '5' => Self::Late150,
            '6' => Self::Late180,
            '7' => Self::Late210Plus,
            _   => Self::NoData,
        }
    }

    pub fn is_late(self) -> bool {
        self > Self::Current
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoData      => "No data",
            Self::Current     => "Current",
            Self::Late30      => "30 days late",
            Self::Late60      => "60 days late",
            Self::Late90      => "90 days late",
            Self::Late120     => "120 days late",
            Self::Late150     => "150 days late",
            Self::Late180     => "180 days late",
            Self::Late210Plus => "210+ days late",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHistory {
    months: Vec<PaymentStatus>,
}

impl PaymentHistory {
    pub fn parse(pattern: &str) -> Self {
        Self {
            months: pattern.trim().chars().map(PaymentStatus::from_code).collect(),
        }
    }

    /// Monthly statuses, oldest first.
    pub fn months(&self) -> &[PaymentStatus] {
        &self.months
    }

    pub fn late_count(&self) -> usize {
        self.months.iter().filter(|s| s.is_late()).count()
    }

    /// Most severe status in the history, `None` when the pattern is empty.
    pub fn worst(&self) -> Option<PaymentStatus> {
        self.months.iter().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_code() {
        let h = PaymentHistory::parse("C1234567X");
        assert_eq!(
            h.months(),
            &[
                PaymentStatus::Current,
                PaymentStatus::Late30,
                PaymentStatus::Late60,
                PaymentStatus::Late90,
                PaymentStatus::Late120,
                PaymentStatus::Late150,
                PaymentStatus::Late180,
                PaymentStatus::Late210Plus,
                PaymentStatus::NoData,
            ]
        );
        assert_eq!(h.late_count(), 7);
        assert_eq!(h.worst(), Some(PaymentStatus::Late210Plus));
    }

    #[test]
    fn clean_history_has_no_lates() {
        let h = PaymentHistory::parse("CCCCCCCCCCCC");
        assert_eq!(h.months().len(), 12);
        assert_eq!(h.late_count(), 0);
        assert_eq!(h.worst(), Some(PaymentStatus::Current));
        assert_eq!(PaymentStatus::Current.label(), "Current");
    }

    #[test]
    fn empty_pattern_is_empty_history() {
        let h = PaymentHistory::parse("");
        assert!(h.months().is_empty());
        assert_eq!(h.worst(), None);
    }
}
