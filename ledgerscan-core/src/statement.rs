//! Statement record types recovered from an OCR transcript.
//!
//! Serialized shape (snake_case, header fields flattened next to `transactions`):
//!   { bank_address, account_number, statement_date,
//!     period_covered: { start_date, end_date },
//!     customer_name, customer_address, branch_name,
//!     opening_balance, total_credit_amount, total_debit_amount, closing_balance,
//!     account_type, number_of_transactions,
//!     transactions: [{ date, description, credit, debit, balance }] }
//!
//! A field that could not be located is `None` (serialized as `null`), except
//! dates, which fall back to [`MISSING_DATE`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder printed for a statement/period date whose anchor did not match.
pub const MISSING_DATE: &str = "mm/dd/yyyy";

/// Balance assigned to a row with no recoverable balance token.
pub const MISSING_BALANCE: &str = "0.00";

/// Date format the sample layout prints (01/15/2024).
const PRINTED_DATE_FORMAT: &str = "%m/%d/%Y";

fn parse_printed_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), PRINTED_DATE_FORMAT).ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCovered {
    pub start_date: String,
    pub end_date: String,
}

impl Default for PeriodCovered {
    fn default() -> Self {
        Self {
            start_date: MISSING_DATE.to_string(),
            end_date: MISSING_DATE.to_string(),
        }
    }
}

impl PeriodCovered {
    /// Both ends parsed as calendar dates, if both are real `MM/DD/YYYY` values.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((
            parse_printed_date(&self.start_date)?,
            parse_printed_date(&self.end_date)?,
        ))
    }
}

/// Scalar header fields. Every field degrades independently to its sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFields {
    pub bank_address: Option<String>,
    pub account_number: Option<String>,
    pub statement_date: String,
    pub period_covered: PeriodCovered,
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    pub branch_name: Option<String>,
    pub opening_balance: Option<String>,
    pub total_credit_amount: Option<String>,
    pub total_debit_amount: Option<String>,
    pub closing_balance: Option<String>,
    pub account_type: Option<String>,
    /// Advisory only; the reconstructed transaction list is authoritative.
    pub number_of_transactions: Option<u32>,
}

impl Default for HeaderFields {
    fn default() -> Self {
        Self {
            bank_address: None,
            account_number: None,
            statement_date: MISSING_DATE.to_string(),
            period_covered: PeriodCovered::default(),
            customer_name: None,
            customer_address: None,
            branch_name: None,
            opening_balance: None,
            total_credit_amount: None,
            total_debit_amount: None,
            closing_balance: None,
            account_type: None,
            number_of_transactions: None,
        }
    }
}

/// One reconstructed transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// As printed by the source; not validated.
    pub date: String,
    pub description: String,
    pub credit: Option<String>,
    pub debit: Option<String>,
    pub balance: String,
}

impl TransactionRecord {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_printed_date(&self.date)
    }

    /// Neither a credit nor a debit could be aligned to this row.
    pub fn is_unaligned(&self) -> bool {
        self.credit.is_none() && self.debit.is_none()
    }
}

/// Header plus transactions, in source order. Built once per transcript.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatementRecord {
    #[serde(flatten)]
    pub header: HeaderFields,
    pub transactions: Vec<TransactionRecord>,
}

impl StatementRecord {
    /// True when the printed transaction count disagrees with the rows recovered.
    pub fn count_mismatch(&self) -> bool {
        self.header
            .number_of_transactions
            .is_some_and(|n| n as usize != self.transactions.len())
    }

    /// Indices of rows whose printed date falls outside the period covered.
    ///
    /// Rows with unparseable dates, and statements without a parseable period,
    /// are never reported.
    pub fn rows_outside_period(&self) -> Vec<usize> {
        let Some((start, end)) = self.header.period_covered.range() else {
            return Vec::new();
        };
        self.transactions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.parsed_date().is_some_and(|d| d < start || d > end))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, credit: Option<&str>, debit: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            date: date.to_string(),
            description: "Coffee Shop".to_string(),
            credit: credit.map(str::to_string),
            debit: debit.map(str::to_string),
            balance: MISSING_BALANCE.to_string(),
        }
    }

    #[test]
    fn test_default_header_uses_sentinels() {
        let h = HeaderFields::default();
        assert_eq!(h.account_number, None);
        assert_eq!(h.statement_date, "mm/dd/yyyy");
        assert_eq!(h.period_covered.start_date, "mm/dd/yyyy");
        assert_eq!(h.period_covered.end_date, "mm/dd/yyyy");
        assert!(h.period_covered.range().is_none());
    }

    #[test]
    fn test_json_shape_matches_contract() {
        let record = StatementRecord {
            header: HeaderFields {
                account_number: Some("123-456-789-012".to_string()),
                ..HeaderFields::default()
            },
            transactions: vec![row("01/10/2024", None, Some("5.00"))],
        };

        let v = serde_json::to_value(&record).unwrap();
        let obj = v.as_object().unwrap();
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        for key in [
            "bank_address",
            "account_number",
            "statement_date",
            "period_covered",
            "customer_name",
            "customer_address",
            "branch_name",
            "opening_balance",
            "total_credit_amount",
            "total_debit_amount",
            "closing_balance",
            "account_type",
            "number_of_transactions",
            "transactions",
        ] {
            assert!(keys.contains(&key), "missing key {key}");
        }
        assert_eq!(obj.len(), 14);
        assert_eq!(v["period_covered"]["start_date"], "mm/dd/yyyy");
        assert_eq!(v["bank_address"], serde_json::Value::Null);
        assert_eq!(v["transactions"][0]["credit"], serde_json::Value::Null);
        assert_eq!(v["transactions"][0]["debit"], "5.00");
        assert_eq!(v["transactions"][0]["balance"], "0.00");

        let back: StatementRecord = serde_json::from_value(v).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_printed_dates_parse() {
        let t = row("01/12/2024", None, None);
        assert_eq!(t.parsed_date(), NaiveDate::from_ymd_opt(2024, 1, 12));
        assert!(t.is_unaligned());

        let p = PeriodCovered {
            start_date: "01/01/2024".to_string(),
            end_date: "01/31/2024".to_string(),
        };
        let (start, end) = p.range().unwrap();
        assert!(start < end);
    }

    #[test]
    fn test_rows_outside_period() {
        let mut record = StatementRecord {
            header: HeaderFields::default(),
            transactions: vec![
                row("01/10/2024", None, Some("5.00")),
                row("02/03/2024", None, Some("1.00")),
                row("O1/1O/2024", None, Some("2.00")),
                row("12/31/2023", Some("9.00"), None),
            ],
        };
        // No period recovered: nothing to compare against.
        assert!(record.rows_outside_period().is_empty());

        record.header.period_covered = PeriodCovered {
            start_date: "01/01/2024".to_string(),
            end_date: "01/31/2024".to_string(),
        };
        assert_eq!(record.rows_outside_period(), vec![1, 3]);
    }

    #[test]
    fn test_count_mismatch_is_advisory() {
        let mut record = StatementRecord::default();
        assert!(!record.count_mismatch());

        record.header.number_of_transactions = Some(2);
        record.transactions.push(row("01/10/2024", Some("1.00"), None));
        assert!(record.count_mismatch());

        record.transactions.push(row("01/11/2024", Some("2.00"), None));
        assert!(!record.count_mismatch());
    }
}
