use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryChartError {
    #[error("One or more columns don't exist in the query result: {missing}. Available columns: {available}")]
    ColumnsNotFound { missing: String, available: String },

    #[error("maxUniqueXValues must be at least 1, got {0}")]
    InvalidMaxUniqueXValues(usize),

    #[error("Axis index {index} is out of range for a result with {column_count} columns")]
    AxisIndexOutOfRange { index: usize, column_count: usize },
}
