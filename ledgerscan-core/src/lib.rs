//! ledgerscan-core: statement record types shared by the ingest, export and CLI crates

pub mod statement;

pub use statement::{
    HeaderFields, MISSING_BALANCE, MISSING_DATE, PeriodCovered, StatementRecord,
    TransactionRecord,
};
