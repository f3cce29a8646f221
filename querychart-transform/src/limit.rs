//! Cardinality limiting and aggregation of chart rows.
//!
//! The engine runs four steps over a result set whose axes are already resolved to column
//! indexes:
//!
//! 1. Limit the unique X values (string-like X columns only), relabeling the rows of the
//!    lowest ranked values as "other" so step 3 folds them into one group.
//! 2. Limit each split-by column the same way, one after the other.
//! 3. Group rows by their escaped X and split-by values and aggregate the Y values.
//! 4. For date-like X columns, drop rows without an X value and sort by timestamp.

use std::cmp::Ordering;
use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use querychart_common::column::ColumnType;
use querychart_common::data::{cell, set_cell, AxesIndexes, QueryResultData, Row};
use querychart_common::value::{as_number, parse_timestamp, to_key_string, CellValue};
use serde::{Deserialize, Serialize};

use crate::aggregation::{resolve, AggregationFn, AggregationType};
use crate::error::QueryChartError;
use crate::escape::escape_value;

#[derive(Debug, Clone)]
pub struct LimitAndAggregateParams<'a> {
    pub query_result_data: &'a QueryResultData,
    pub axes_indexes: &'a AxesIndexes,
    pub x_column_type: ColumnType,
    pub aggregation_type: AggregationType,
    pub max_unique_x_values: usize,
    /// Label of the row that collects the values dropped by limiting
    pub other_str: &'a str,
}

/// Rows shaped for charting along with what the engine did to produce them.
///
/// Each row holds the X value, then the split-by values, then the aggregated Y values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitedResults {
    pub rows: Vec<Row>,
    pub is_aggregation_applied: bool,
    pub is_partial_data: bool,
    /// Raw X value of every row that entered aggregation, in traversal order
    pub ordered_x_values: Vec<CellValue>,
}

/// Stateless; a single instance can be shared freely
#[derive(Debug, Default, Clone, Copy)]
pub struct LimitAndAggregateEngine;

impl LimitAndAggregateEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn limit_and_aggregate(
        &self,
        params: &LimitAndAggregateParams<'_>,
    ) -> Result<LimitedResults, QueryChartError> {
        validate_params(params)?;

        let axes = params.axes_indexes;
        let aggregate = resolve(params.aggregation_type);
        let mut rows = params.query_result_data.rows.clone();
        let mut is_partial_data = false;

        // Numeric and date X values are plotted on continuous axes and never bucketed
        if !params.x_column_type.is_numeric() && !params.x_column_type.is_date_like() {
            is_partial_data |= limit_column(&mut rows, axes.x_axis, params, aggregate);
        }

        for &split_by_index in &axes.split_by {
            is_partial_data |= limit_column(&mut rows, split_by_index, params, aggregate);
        }

        let mut limited_results = aggregate_and_escape(rows, axes, aggregate);
        limited_results.is_partial_data = is_partial_data;

        if params.x_column_type.is_date_like() {
            sort_by_date(&mut limited_results.rows);
        }

        Ok(limited_results)
    }
}

fn validate_params(params: &LimitAndAggregateParams<'_>) -> Result<(), QueryChartError> {
    if params.max_unique_x_values == 0 {
        return Err(QueryChartError::InvalidMaxUniqueXValues(0));
    }
    let column_count = params.query_result_data.column_count();
    match params.axes_indexes.iter().find(|&index| index >= column_count) {
        Some(index) => Err(QueryChartError::AxisIndexOutOfRange {
            index,
            column_count,
        }),
        None => Ok(()),
    }
}

/// Bound the unique values of one column to `max_unique_x_values`.
///
/// Values are ranked by the aggregate of all their Y values (every Y column combined), the
/// top ones are kept and every other row has its cell in this column replaced by
/// `other_str`. Rows keep their position and every other cell, so relabeled rows are merged
/// per X and split-by combination when aggregated. Ties keep encounter order. Returns
/// whether any row was relabeled.
fn limit_column(
    rows: &mut [Row],
    axis_index: usize,
    params: &LimitAndAggregateParams<'_>,
    aggregate: AggregationFn,
) -> bool {
    let y_axes = &params.axes_indexes.y_axes;

    let mut groups: IndexMap<String, Vec<f64>> = IndexMap::new();
    let mut row_groups = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let entry = groups.entry(to_key_string(cell(row, axis_index)));
        row_groups.push(entry.index());
        entry
            .or_default()
            .extend(y_axes.iter().filter_map(|&y| as_number(cell(row, y))));
    }

    if groups.len() <= params.max_unique_x_values {
        return false;
    }

    let mut ranked: Vec<(usize, f64)> = groups
        .values()
        .enumerate()
        .map(|(group, y_values)| {
            let score = if y_values.is_empty() {
                0.0
            } else {
                aggregate(y_values)
            };
            (group, score)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    let kept: HashSet<usize> = ranked
        .iter()
        .take(params.max_unique_x_values)
        .map(|(group, _)| *group)
        .collect();

    let mut relabeled = 0;
    for (row, group) in rows.iter_mut().zip(row_groups) {
        if !kept.contains(&group) {
            set_cell(row, axis_index, CellValue::String(params.other_str.to_string()));
            relabeled += 1;
        }
    }

    debug!(
        "Limited column {} from {} to {} unique values, relabeling {} row(s) as '{}'",
        axis_index,
        groups.len(),
        params.max_unique_x_values,
        relabeled,
        params.other_str
    );

    true
}

fn aggregate_or_null(values: &[f64], aggregate: AggregationFn) -> CellValue {
    if values.is_empty() {
        CellValue::Null
    } else {
        CellValue::from(aggregate(values))
    }
}

#[derive(Debug)]
struct AggregatedRow {
    key_cells: Vec<CellValue>,
    y_values: Vec<Vec<f64>>,
}

/// Group rows by escaped X and split-by values, aggregating every Y column per group.
///
/// Output rows follow the first occurrence of each group.
fn aggregate_and_escape(
    rows: Vec<Row>,
    axes: &AxesIndexes,
    aggregate: AggregationFn,
) -> LimitedResults {
    let mut ordered_x_values = Vec::with_capacity(rows.len());
    let mut groups: IndexMap<Vec<String>, AggregatedRow> = IndexMap::new();

    for row in &rows {
        ordered_x_values.push(cell(row, axes.x_axis).clone());

        let key_cells: Vec<CellValue> = std::iter::once(axes.x_axis)
            .chain(axes.split_by.iter().copied())
            .map(|index| escape_value(cell(row, index)))
            .collect();
        let key: Vec<String> = key_cells.iter().map(to_key_string).collect();

        let group = groups.entry(key).or_insert_with(|| AggregatedRow {
            key_cells,
            y_values: vec![Vec::new(); axes.y_axes.len()],
        });
        for (values, &y) in group.y_values.iter_mut().zip(&axes.y_axes) {
            if let Some(value) = as_number(cell(row, y)) {
                values.push(value);
            }
        }
    }

    let mut is_aggregation_applied = false;
    let rows = groups
        .into_values()
        .map(|group| {
            let mut row = group.key_cells;
            for values in &group.y_values {
                is_aggregation_applied |= values.len() > 1;
                row.push(aggregate_or_null(values, aggregate));
            }
            row
        })
        .collect();

    LimitedResults {
        rows,
        is_aggregation_applied,
        is_partial_data: false,
        ordered_x_values,
    }
}

/// Drop rows without an X value and order the rest by timestamp.
///
/// Non-null X values that can't be read as a timestamp keep their relative order after
/// every dated row.
fn sort_by_date(rows: &mut Vec<Row>) {
    rows.retain(|row| !row[0].is_null());
    rows.sort_by(|a, b| {
        match (parse_timestamp(&a[0]), parse_timestamp(&b[0])) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
