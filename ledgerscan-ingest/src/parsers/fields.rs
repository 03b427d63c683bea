//! Header field extraction.
//!
//! Each field has its own anchor and is matched independently, so one miss never
//! blocks another. The six financial summary values are the exception: they come
//! from a single anchor and are found or missing together.

use ledgerscan_core::{HeaderFields, MISSING_DATE, PeriodCovered};
use regex::{Captures, Regex};
use tracing::debug;

use crate::layout::CompiledLayout;

fn find<'t>(re: &Regex, text: &'t str, field: &'static str) -> Option<Captures<'t>> {
    let caps = re.captures(text);
    if caps.is_none() {
        debug!(field, "anchor not found");
    }
    caps
}

fn group(caps: &Captures<'_>, i: usize) -> Option<String> {
    caps.get(i).map(|m| m.as_str().trim().to_string())
}

fn first_group(re: &Regex, text: &str, field: &'static str) -> Option<String> {
    find(re, text, field).and_then(|c| group(&c, 1))
}

/// Opening, total credit, total debit, closing, account type, transaction count.
fn financial_summary(layout: &CompiledLayout, text: &str) -> Option<[Option<String>; 6]> {
    let caps = find(&layout.financial_summary, text, "financial_summary")?;
    Some(std::array::from_fn(|i| group(&caps, i + 1)))
}

fn parse_count(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.replace(',', "").parse() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!(raw, "transaction count is not a number");
            None
        }
    }
}

/// Extract every header field; unmatched anchors yield their sentinel.
pub fn extract_header(layout: &CompiledLayout, text: &str) -> HeaderFields {
    let period_covered = find(&layout.period_covered, text, "period_covered")
        .and_then(|c| {
            Some(PeriodCovered {
                start_date: group(&c, 1)?,
                end_date: group(&c, 2)?,
            })
        })
        .unwrap_or_default();

    // Both lines or nothing.
    let customer_address = find(&layout.customer_address, text, "customer_address")
        .and_then(|c| Some(format!("{}, {}", group(&c, 1)?, group(&c, 2)?)));

    let branch_name = find(&layout.branch_name, text, "branch_name")
        .and_then(|c| group(&c, 0));

    let [
        opening_balance,
        total_credit_amount,
        total_debit_amount,
        closing_balance,
        account_type,
        count,
    ] = financial_summary(layout, text).unwrap_or_default();

    HeaderFields {
        bank_address: first_group(&layout.bank_address, text, "bank_address"),
        account_number: first_group(&layout.account_number, text, "account_number"),
        statement_date: first_group(&layout.statement_date, text, "statement_date")
            .unwrap_or_else(|| MISSING_DATE.to_string()),
        period_covered,
        customer_name: first_group(&layout.customer_name, text, "customer_name"),
        customer_address,
        branch_name,
        opening_balance,
        total_credit_amount,
        total_debit_amount,
        closing_balance,
        account_type,
        number_of_transactions: parse_count(count.as_deref()),
    }
}
