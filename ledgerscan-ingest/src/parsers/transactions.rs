//! Transaction table reconstruction.
//!
//! OCR emits the statement table as three separately ordered runs of text:
//!
//!   Date Description
//!   01/10/2024 Coffee Shop          <- column 1: one line per row
//!   01/12/2024 Rent
//!   --- End of Transactions --
//!
//!   Credit Debit
//!   5.00                            <- column 2: blank-line separated segments
//!
//!   1000.00
//!   Balance
//!   995.00  -5.00                   <- column 3: free-floating monetary tokens
//!
//! Each column is recovered by its own pass, then [`align_rows`] zips them by index.
//!
//! Column 2 is unlabeled. A one-line segment is a debit. In a multi-line segment the
//! first line is a debit and every further line becomes a credit for a following row,
//! with empty debits backfilled. Any remaining length difference is padded at the tail.
//! This misassigns rows when a statement's real segment structure differs from that
//! assumption; callers can spot such rows with `TransactionRecord::is_unaligned`.

use ledgerscan_core::{MISSING_BALANCE, TransactionRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::layout::CompiledLayout;

static BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap());

/// The three raw runs of one transaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionBlock<'a> {
    pub rows: &'a str,
    pub credit_debit: &'a str,
    /// Everything after the balance label.
    pub balances: &'a str,
}

pub fn locate_block<'a>(layout: &CompiledLayout, text: &'a str) -> Option<TransactionBlock<'a>> {
    let caps = layout.transaction_block.captures(text)?;
    let whole = caps.get(0)?;
    Some(TransactionBlock {
        rows: caps.get(1)?.as_str(),
        credit_debit: caps.get(2)?.as_str(),
        balances: &text[whole.end()..],
    })
}

/// Column 1: the non-blank lines between the start and end markers.
pub fn date_description_lines(rows: &str) -> Vec<&str> {
    rows.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Split one row into (date, description).
///
/// Delimiters are tried in order: `|`, em-dash, first whitespace run. A line with
/// none of them is all date. Non-ASCII OCR artifacts are dropped from the description
/// after the split.
pub fn split_date_description(line: &str) -> (String, String) {
    let line = line.trim();
    let (date, description) = line
        .split_once('|')
        .or_else(|| line.split_once('\u{2014}'))
        .or_else(|| line.split_once(char::is_whitespace))
        .unwrap_or((line, ""));

    let description: String = description.chars().filter(char::is_ascii).collect();
    (date.trim().to_string(), description.trim().to_string())
}

/// Column 2 as two equal-length sequences; `None` marks a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditDebitColumns {
    pub debits: Vec<Option<String>>,
    pub credits: Vec<Option<String>>,
}

impl CreditDebitColumns {
    pub fn len(&self) -> usize {
        self.debits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debits.is_empty()
    }
}

fn pad_to(col: &mut Vec<Option<String>>, len: usize) {
    if col.len() < len {
        col.resize(len, None);
    }
}

/// Column 2: assign segment lines to debits and credits.
pub fn credit_debit_columns(run: &str) -> CreditDebitColumns {
    let mut cols = CreditDebitColumns::default();

    for segment in BLANK_LINE.split(run) {
        let lines: Vec<&str> = segment
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        match lines.split_first() {
            None => {}
            Some((only, [])) => {
                cols.credits.push(None);
                cols.debits.push(Some(only.to_string()));
            }
            Some((first, rest)) => {
                cols.debits.push(Some(first.to_string()));
                pad_to(&mut cols.credits, cols.debits.len());
                cols.credits.extend(rest.iter().map(|l| Some(l.to_string())));
                cols.debits.extend(rest.iter().map(|_| None));
            }
        }
    }

    let len = cols.debits.len().max(cols.credits.len());
    pad_to(&mut cols.debits, len);
    pad_to(&mut cols.credits, len);
    cols
}

/// Column 3: every monetary token in the balance run, in order of appearance.
pub fn balance_tokens<'a>(layout: &CompiledLayout, run: &'a str) -> Vec<&'a str> {
    layout
        .balance_token
        .find_iter(run)
        .map(|m| m.as_str())
        .collect()
}

/// Zip the three columns by row index. Column 1 decides the row count; missing
/// credit/debit entries are absent and a missing balance is `"0.00"`.
pub fn align_rows(
    lines: &[&str],
    columns: &CreditDebitColumns,
    balances: &[&str],
) -> Vec<TransactionRecord> {
    if columns.len() != lines.len() || balances.len() != lines.len() {
        debug!(
            rows = lines.len(),
            credit_debit = columns.len(),
            balances = balances.len(),
            "transaction columns disagree in length"
        );
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let (date, description) = split_date_description(line);
            TransactionRecord {
                date,
                description,
                credit: columns.credits.get(i).cloned().flatten(),
                debit: columns.debits.get(i).cloned().flatten(),
                balance: balances
                    .get(i)
                    .map_or_else(|| MISSING_BALANCE.to_string(), |b| b.to_string()),
            }
        })
        .collect()
}

/// Rebuild the transaction list. No transaction block means no rows.
pub fn reconstruct_transactions(layout: &CompiledLayout, text: &str) -> Vec<TransactionRecord> {
    let Some(block) = locate_block(layout, text) else {
        debug!("transaction block not found");
        return Vec::new();
    };

    let lines = date_description_lines(block.rows);
    let columns = credit_debit_columns(block.credit_debit);
    let balances = balance_tokens(layout, block.balances);
    align_rows(&lines, &columns, &balances)
}
