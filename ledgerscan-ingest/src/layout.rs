//! Anchor set for one statement layout.
//!
//! The default is the single sample template the parsers were written against:
//!
//!   <bank name / address lines>
//!   Account Number: 123-456-789-012
//!   Statement Date: 01/31/2024
//!   Period Covered: 01/01/2024 to 01/31/2024
//!   ...
//!   Page 1 of 1
//!   <opening>  <total credit>  <total debit>  <closing>  <type> <count>
//!   Date Description
//!   01/10/2024 Coffee Shop
//!   --- End of Transactions --
//!
//!   Credit Debit
//!   ...
//!   Balance
//!   ...
//!
//! Another layout only needs a different `StatementLayout`; the reconstruction
//! passes never look at literal labels themselves.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementLayout {
    /// Group 1: everything before the account-number label.
    pub bank_address: String,
    pub account_number: String,
    pub statement_date: String,
    /// Groups 1 and 2: start and end date.
    pub period_covered: String,
    pub customer_name: String,
    /// Groups 1 and 2: street line and city/state/zip line.
    pub customer_address: String,
    /// Whole match, trimmed. The sample template prints a literal `<Branch Name>` placeholder.
    pub branch_name: String,
    /// Six groups: opening, total credit, total debit, closing, account type, transaction count.
    pub financial_summary: String,
    /// Group 1: date/description lines. Group 2: credit/debit run. Balances follow the match.
    pub transaction_block: String,
    /// One monetary token in the balance run.
    pub balance_token: String,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            bank_address: r"(?s)(.*?)\nAccount Number:".to_string(),
            account_number: r"Account Number:\s+(\d{3}-\d{3}-\d{3}-\d{3})".to_string(),
            statement_date: r"Statement Date:\s+(\d{2}/\d{2}/\d{4})".to_string(),
            period_covered: r"Period Covered:\s+(\d{2}/\d{2}/\d{4}) to (\d{2}/\d{2}/\d{4})"
                .to_string(),
            customer_name: r"\n(\w+\s\w+)\n".to_string(),
            customer_address: r"\n(\d+\s\w+\s\w+,\s\w+\s\d+)\n\n(\w+,\s\w+\s\d+)".to_string(),
            branch_name: r"\n<Branch Name>\n".to_string(),
            financial_summary:
                r"(?s)\nPage 1 of 1\n(.*?)\n\n(.*?)\n\n(.*?)\n\n(.*?)\n\n(.*?)\n(.*?)\n"
                    .to_string(),
            transaction_block: concat!(
                r"(?s)Date Description\n(.*?)--- End of Transactions --\n\n",
                r"Credit Debit(.*?)\nBalance\n"
            )
            .to_string(),
            balance_token: r"-?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}".to_string(),
        }
    }
}

impl StatementLayout {
    pub fn compile(&self) -> Result<CompiledLayout, LayoutError> {
        Ok(CompiledLayout {
            bank_address: anchor("bank_address", &self.bank_address, 1)?,
            account_number: anchor("account_number", &self.account_number, 1)?,
            statement_date: anchor("statement_date", &self.statement_date, 1)?,
            period_covered: anchor("period_covered", &self.period_covered, 2)?,
            customer_name: anchor("customer_name", &self.customer_name, 1)?,
            customer_address: anchor("customer_address", &self.customer_address, 2)?,
            branch_name: anchor("branch_name", &self.branch_name, 0)?,
            financial_summary: anchor("financial_summary", &self.financial_summary, 6)?,
            transaction_block: anchor("transaction_block", &self.transaction_block, 2)?,
            balance_token: anchor("balance_token", &self.balance_token, 0)?,
        })
    }
}

fn anchor(name: &'static str, pattern: &str, groups: usize) -> Result<Regex, LayoutError> {
    let re = Regex::new(pattern).map_err(|source| LayoutError::InvalidPattern {
        anchor: name,
        source,
    })?;
    // captures_len counts the implicit whole-match group
    let found = re.captures_len() - 1;
    if found < groups {
        return Err(LayoutError::GroupCount {
            anchor: name,
            expected: groups,
            found,
        });
    }
    Ok(re)
}

/// A [`StatementLayout`] with every anchor compiled. Read-only once built.
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    pub(crate) bank_address: Regex,
    pub(crate) account_number: Regex,
    pub(crate) statement_date: Regex,
    pub(crate) period_covered: Regex,
    pub(crate) customer_name: Regex,
    pub(crate) customer_address: Regex,
    pub(crate) branch_name: Regex,
    pub(crate) financial_summary: Regex,
    pub(crate) transaction_block: Regex,
    pub(crate) balance_token: Regex,
}

static SAMPLE: Lazy<CompiledLayout> = Lazy::new(|| {
    StatementLayout::default()
        .compile()
        .expect("built-in sample layout compiles")
});

impl CompiledLayout {
    /// The built-in sample template, compiled once.
    pub fn sample() -> &'static CompiledLayout {
        &SAMPLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_compiles() {
        assert!(StatementLayout::default().compile().is_ok());
        assert!(CompiledLayout::sample().balance_token.is_match("1,234.56"));
    }

    #[test]
    fn test_invalid_pattern_names_anchor() {
        let layout = StatementLayout {
            account_number: r"Account Number:\s+(\d{3}".to_string(),
            ..StatementLayout::default()
        };
        match layout.compile() {
            Err(LayoutError::InvalidPattern { anchor, .. }) => assert_eq!(anchor, "account_number"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_needs_six_groups() {
        let layout = StatementLayout {
            financial_summary: r"(?s)\nPage 1 of 1\n(.*?)\n\n(.*?)\n".to_string(),
            ..StatementLayout::default()
        };
        match layout.compile() {
            Err(LayoutError::GroupCount {
                anchor,
                expected,
                found,
            }) => {
                assert_eq!(anchor, "financial_summary");
                assert_eq!(expected, 6);
                assert_eq!(found, 2);
            }
            other => panic!("expected GroupCount, got {other:?}"),
        }
    }

    #[test]
    fn test_balance_token_shapes() {
        let re = &CompiledLayout::sample().balance_token;
        let found: Vec<&str> = re
            .find_iter("1,245.00 245.00 1000.00 -5.00 01/31/2024 12")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["1,245.00", "245.00", "1000.00", "-5.00"]);
    }
}
