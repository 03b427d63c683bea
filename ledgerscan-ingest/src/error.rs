use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid pattern for anchor `{anchor}`: {source}")]
    InvalidPattern {
        anchor: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("anchor `{anchor}` needs at least {expected} capture group(s), pattern has {found}")]
    GroupCount {
        anchor: &'static str,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// The caller handed over something that is not text. Distinct from any field being absent.
    #[error("statement page {page} is not UTF-8 text (valid up to byte {valid_up_to})")]
    NotText { page: usize, valid_up_to: usize },
}
