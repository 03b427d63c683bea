//! ledgerscan-ingest: recover header fields and transaction rows from OCR'd statement text.
//!
//! Both parsers are pure functions of the input text and a [`CompiledLayout`];
//! an anchor that does not match degrades to the field's "not found" value.

pub mod error;
pub mod layout;
pub mod parsers;

pub use error::{IngestError, LayoutError};
pub use layout::{CompiledLayout, StatementLayout};
pub use parsers::fields::extract_header;
pub use parsers::transactions::reconstruct_transactions;

use ledgerscan_core::StatementRecord;

/// Extractor bound to one anchor set.
#[derive(Debug, Clone)]
pub struct StatementParser {
    layout: CompiledLayout,
}

impl Default for StatementParser {
    fn default() -> Self {
        Self {
            layout: CompiledLayout::sample().clone(),
        }
    }
}

impl StatementParser {
    pub fn new(layout: &StatementLayout) -> Result<Self, LayoutError> {
        Ok(Self {
            layout: layout.compile()?,
        })
    }

    /// Header and transactions are extracted independently and merged.
    pub fn extract(&self, text: &str) -> StatementRecord {
        StatementRecord {
            header: extract_header(&self.layout, text),
            transactions: reconstruct_transactions(&self.layout, text),
        }
    }

    /// Like [`StatementParser::extract`], but rejects input that is not UTF-8 text.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<StatementRecord, IngestError> {
        self.extract_pages([bytes])
    }

    /// Decode raw OCR pages, join them and extract. The first page that is not
    /// UTF-8 text fails the whole call.
    pub fn extract_pages<I, B>(&self, pages: I) -> Result<StatementRecord, IngestError>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut texts = Vec::new();
        for (page, bytes) in pages.into_iter().enumerate() {
            let text = std::str::from_utf8(bytes.as_ref())
                .map_err(|e| IngestError::NotText {
                    page,
                    valid_up_to: e.valid_up_to(),
                })?
                .to_string();
            texts.push(text);
        }
        Ok(self.extract(&join_pages(&texts)))
    }
}

/// Extract a statement using the built-in sample layout.
pub fn extract_statement(text: &str) -> StatementRecord {
    let layout = CompiledLayout::sample();
    StatementRecord {
        header: extract_header(layout, text),
        transactions: reconstruct_transactions(layout, text),
    }
}

/// Byte-level entry point; non-UTF-8 input is a caller error, not a missing field.
pub fn extract_statement_bytes(bytes: &[u8]) -> Result<StatementRecord, IngestError> {
    StatementParser::default().extract_bytes(bytes)
}

/// Join per-page OCR output into one transcript (pages separated by a single space).
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, page) in pages.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(page.as_ref());
    }
    out
}
