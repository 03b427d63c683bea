use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("table detection response has no `result` field")]
    MissingResult,
    #[error("table detection cell column {col} exceeds the supported grid width")]
    GridTooWide { col: usize },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("csv output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
