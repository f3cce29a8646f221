//! End-to-end transformation from a query result to chart-ready rows.

use std::borrow::Cow;

use log::debug;
use querychart_common::column::Column;
use querychart_common::data::{find_column_index, AxesIndexes, QueryResultData};
use serde::{Deserialize, Serialize};

use crate::error::QueryChartError;
use crate::limit::{LimitAndAggregateEngine, LimitAndAggregateParams, LimitedResults};
use crate::options::{ColumnsSelection, TransformOptions};
use crate::series;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTransformationInfo {
    pub is_partial_data: bool,
    pub is_aggregation_applied: bool,
}

impl From<&LimitedResults> for DataTransformationInfo {
    fn from(value: &LimitedResults) -> Self {
        Self {
            is_partial_data: value.is_partial_data,
            is_aggregation_applied: value.is_aggregation_applied,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    /// Chart rows with columns ordered x, split-by, y
    pub data: QueryResultData,
    pub limited_results: LimitedResults,
    pub info: DataTransformationInfo,
    /// Number of plotted values (rows times y columns)
    pub number_of_data_points: usize,
    pub is_series_expanded: bool,
}

/// Runs series expansion, column resolution and limiting/aggregation in sequence
#[derive(Debug, Default, Clone, Copy)]
pub struct DataTransformer {
    engine: LimitAndAggregateEngine,
}

impl DataTransformer {
    pub fn new() -> Self {
        Self {
            engine: LimitAndAggregateEngine::new(),
        }
    }

    pub fn transform(
        &self,
        query_result_data: &QueryResultData,
        selection: &ColumnsSelection,
        options: &TransformOptions,
    ) -> Result<TransformResult, QueryChartError> {
        options.validate()?;

        let data = match series::expand(query_result_data) {
            Some(expanded) => Cow::Owned(expanded),
            None => Cow::Borrowed(query_result_data),
        };
        let is_series_expanded = matches!(data, Cow::Owned(_));

        let (axes_indexes, columns) = resolve_axes(&data, selection)?;

        let limited_results = self.engine.limit_and_aggregate(&LimitAndAggregateParams {
            query_result_data: &data,
            axes_indexes: &axes_indexes,
            x_column_type: selection.x_axis.column_type,
            aggregation_type: options.aggregation_type,
            max_unique_x_values: options.max_unique_x_values,
            other_str: &options.other_str,
        })?;

        debug!(
            "Transformed {} row(s) into {} chart row(s)",
            data.row_count(),
            limited_results.rows.len()
        );

        Ok(TransformResult {
            data: QueryResultData::new(limited_results.rows.clone(), columns),
            info: DataTransformationInfo::from(&limited_results),
            number_of_data_points: limited_results.rows.len() * axes_indexes.y_axes.len(),
            limited_results,
            is_series_expanded,
        })
    }
}

/// Transform with a default [`DataTransformer`]
pub fn transform(
    query_result_data: &QueryResultData,
    selection: &ColumnsSelection,
    options: &TransformOptions,
) -> Result<TransformResult, QueryChartError> {
    DataTransformer::new().transform(query_result_data, selection, options)
}

/// Resolve the selected columns to indexes.
///
/// Also returns the resolved columns in x, split-by, y order, which is the column order of
/// the transformed rows.
pub fn resolve_axes(
    data: &QueryResultData,
    selection: &ColumnsSelection,
) -> Result<(AxesIndexes, Vec<Column>), QueryChartError> {
    let mut missing = Vec::new();
    let mut resolve = |column: &Column| {
        let index = find_column_index(data, column);
        if index.is_none() {
            missing.push(column.to_string());
        }
        index
    };

    let x_axis = resolve(&selection.x_axis);
    let split_by: Vec<_> = selection.split_by.iter().map(&mut resolve).collect();
    let y_axes: Vec<_> = selection.y_axes.iter().map(&mut resolve).collect();

    if !missing.is_empty() {
        return Err(QueryChartError::ColumnsNotFound {
            missing: missing.join(", "),
            available: data
                .columns
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    let axes_indexes = AxesIndexes::new(
        x_axis.unwrap_or_default(),
        y_axes.into_iter().flatten().collect(),
        split_by.into_iter().flatten().collect(),
    );
    let columns = axes_indexes
        .iter()
        .map(|index| data.columns[index].clone())
        .collect();

    Ok((axes_indexes, columns))
}
