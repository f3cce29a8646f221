use querychart_common::column::Column;
use serde::{Deserialize, Serialize};

use crate::aggregation::AggregationType;
use crate::error::QueryChartError;

pub const DEFAULT_MAX_UNIQUE_X_VALUES: usize = 100;
pub const DEFAULT_OTHER_STR: &str = "Other";

/// Columns the chart plots, matched against the result by name and type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsSelection {
    pub x_axis: Column,
    pub y_axes: Vec<Column>,
    #[serde(default)]
    pub split_by: Vec<Column>,
}

impl ColumnsSelection {
    pub fn new(x_axis: Column, y_axes: Vec<Column>, split_by: Vec<Column>) -> Self {
        Self {
            x_axis,
            y_axes,
            split_by,
        }
    }
}

/// Options that control limiting and aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    pub aggregation_type: AggregationType,
    /// Upper bound on unique values kept for string-like X columns and for each split-by column
    pub max_unique_x_values: usize,
    /// Label of the row collecting values dropped by limiting
    pub other_str: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            aggregation_type: AggregationType::Sum,
            max_unique_x_values: DEFAULT_MAX_UNIQUE_X_VALUES,
            other_str: DEFAULT_OTHER_STR.to_string(),
        }
    }
}

impl TransformOptions {
    pub fn with_aggregation_type(mut self, aggregation_type: AggregationType) -> Self {
        self.aggregation_type = aggregation_type;
        self
    }

    pub fn with_max_unique_x_values(mut self, max_unique_x_values: usize) -> Self {
        self.max_unique_x_values = max_unique_x_values;
        self
    }

    pub fn with_other_str(mut self, other_str: impl Into<String>) -> Self {
        self.other_str = other_str.into();
        self
    }

    pub fn validate(&self) -> Result<(), QueryChartError> {
        if self.max_unique_x_values == 0 {
            return Err(QueryChartError::InvalidMaxUniqueXValues(
                self.max_unique_x_values,
            ));
        }
        Ok(())
    }
}
