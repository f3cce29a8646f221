//! Detection and expansion of series-shaped results.
//!
//! A series result holds JSON arrays in `dynamic` columns, typically one array of timestamps
//! and one or more parallel arrays of values per row. Expansion flattens every row into one
//! row per array index so the rest of the pipeline only ever sees scalar cells.

use log::{debug, trace};
use querychart_common::column::{Column, ColumnType};
use querychart_common::data::{cell, QueryResultData, Row};
use querychart_common::value::{is_date_value, CellValue};

/// Name of the segmentation column added when the result has no string column to split by
pub const SERIES_COLUMN_NAME: &str = "time_series";

const SERIES_LABEL_PREFIX: &str = "timeSeries_";

/// Element type of a series array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayItemType {
    Number,
    Date,
}

impl ArrayItemType {
    /// Column type an expanded column of this element type is declared as
    pub fn column_type(&self) -> ColumnType {
        match self {
            ArrayItemType::Number => ColumnType::Real,
            ArrayItemType::Date => ColumnType::DateTime,
        }
    }

    fn of(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Number(_) => Some(ArrayItemType::Number),
            v if is_date_value(v) => Some(ArrayItemType::Date),
            _ => None,
        }
    }
}

/// Result of interpreting a cell as a series array
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedArray {
    /// `item_type` is the type of the first non-null element, `None` when there is no such
    /// element or it is neither a number nor a date
    Array {
        item_type: Option<ArrayItemType>,
        values: Vec<CellValue>,
    },
    NotAnArray,
    ParseError,
}

impl ParsedArray {
    /// Whether every non-null element has type `item_type`
    fn is_homogeneous(values: &[CellValue], item_type: ArrayItemType) -> bool {
        values
            .iter()
            .filter(|v| !v.is_null())
            .all(|v| ArrayItemType::of(v) == Some(item_type))
    }
}

/// Interpret a dynamic cell as an array.
///
/// Strings are decoded as JSON; already-decoded arrays are used as is.
pub fn parse_array(value: &CellValue) -> ParsedArray {
    let values = match value {
        CellValue::String(s) => match serde_json::from_str::<CellValue>(s) {
            Ok(CellValue::Array(values)) => values,
            Ok(_) => return ParsedArray::NotAnArray,
            Err(_) => return ParsedArray::ParseError,
        },
        CellValue::Array(values) => values.clone(),
        _ => return ParsedArray::NotAnArray,
    };

    let item_type = values
        .iter()
        .find(|v| !v.is_null())
        .and_then(ArrayItemType::of);
    ParsedArray::Array { item_type, values }
}

/// A dynamic column considered for expansion during a single pass
#[derive(Debug)]
struct SeriesColumn {
    index: usize,
    array_items_type: ArrayItemType,
    array_items_length: usize,
    /// Parsed array of every row, aligned with the result rows
    values: Vec<Vec<CellValue>>,
    validated_for_series: bool,
}

/// Candidate dynamic columns, judged on the first row only
fn find_candidates(data: &QueryResultData, first_row: &Row) -> Vec<SeriesColumn> {
    data.columns
        .iter()
        .enumerate()
        .filter(|(_, column)| column.column_type == ColumnType::Dynamic)
        .filter_map(|(index, column)| match parse_array(cell(first_row, index)) {
            ParsedArray::Array {
                item_type: Some(array_items_type),
                values,
            } if !values.is_empty() => {
                trace!("Column '{}' is a {:?} array candidate", column.name, array_items_type);
                Some(SeriesColumn {
                    index,
                    array_items_type,
                    array_items_length: values.len(),
                    values: Vec::with_capacity(data.rows.len()),
                    validated_for_series: false,
                })
            }
            _ => None,
        })
        .collect()
}

/// Parse the candidate's cell in every row, returning false on the first violation
fn validate_candidate(data: &QueryResultData, candidate: &mut SeriesColumn) -> bool {
    for row in &data.rows {
        match parse_array(cell(row, candidate.index)) {
            ParsedArray::Array { values, .. }
                if !values.is_empty()
                    && values.len() == candidate.array_items_length
                    && ParsedArray::is_homogeneous(&values, candidate.array_items_type) =>
            {
                candidate.values.push(values);
            }
            _ => return false,
        }
    }
    true
}

/// Expand a series-shaped result into one row per array element.
///
/// Returns `None` when the result is not a series, in which case the caller keeps the
/// original data. The input is never modified.
pub fn expand(data: &QueryResultData) -> Option<QueryResultData> {
    let first_row = data.rows.first()?;

    let mut candidates = find_candidates(data, first_row);
    if candidates.is_empty() {
        return None;
    }

    candidates.retain_mut(|candidate| {
        let valid = validate_candidate(data, candidate);
        if !valid {
            trace!(
                "Column '{}' dropped from series candidates",
                data.columns[candidate.index].name
            );
        }
        valid
    });

    let reference_length = candidates
        .iter()
        .find(|c| c.array_items_type == ArrayItemType::Date)
        .or_else(|| candidates.first())
        .map(|c| c.array_items_length)?;

    for candidate in candidates.iter_mut() {
        candidate.validated_for_series = candidate.array_items_length == reference_length;
    }
    candidates.retain(|c| c.validated_for_series);

    if candidates.len() < 2 {
        debug!(
            "Series expansion declined: {} validated array column(s)",
            candidates.len()
        );
        return None;
    }

    Some(expand_rows(data, &candidates, reference_length))
}

fn expand_rows(
    data: &QueryResultData,
    series_columns: &[SeriesColumn],
    array_length: usize,
) -> QueryResultData {
    let series_at = |index: usize| series_columns.iter().find(|c| c.index == index);

    let mut columns: Vec<Column> = data
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| match series_at(index) {
            Some(series) => Column::new(column.name.clone(), series.array_items_type.column_type()),
            None => column.clone(),
        })
        .collect();

    let has_segmentation_column = data
        .columns
        .iter()
        .enumerate()
        .any(|(index, column)| column.column_type == ColumnType::String && series_at(index).is_none());
    let add_segmentation_column = !has_segmentation_column && data.rows.len() > 1;
    if add_segmentation_column {
        columns.push(Column::new(SERIES_COLUMN_NAME, ColumnType::String));
    }

    let mut rows = Vec::with_capacity(data.rows.len() * array_length);
    for (row_index, row) in data.rows.iter().enumerate() {
        for item_index in 0..array_length {
            let mut expanded: Row = (0..data.columns.len())
                .map(|index| match series_at(index) {
                    Some(series) => series.values[row_index][item_index].clone(),
                    None => cell(row, index).clone(),
                })
                .collect();
            if add_segmentation_column {
                expanded.push(CellValue::String(format!(
                    "{SERIES_LABEL_PREFIX}{}",
                    row_index + 1
                )));
            }
            rows.push(expanded);
        }
    }

    debug!(
        "Expanded {} series row(s) into {} row(s) across {} array column(s)",
        data.rows.len(),
        rows.len(),
        series_columns.len()
    );

    QueryResultData::new(rows, columns)
}
