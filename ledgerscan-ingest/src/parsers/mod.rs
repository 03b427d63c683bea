pub mod fields;
pub mod transactions;
