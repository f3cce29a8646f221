use serde::{Deserialize, Serialize};

use crate::column::{columns_equal, Column};
use crate::value::CellValue;

/// One result row, positionally aligned with the owning result set's columns
pub type Row = Vec<CellValue>;

/// Tabular query result: rows plus typed columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResultData {
    pub rows: Vec<Row>,
    pub columns: Vec<Column>,
}

impl QueryResultData {
    pub fn new(rows: Vec<Row>, columns: Vec<Column>) -> Self {
        Self { rows, columns }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column equal (name and type) to `column`
    pub fn column_index(&self, column: &Column) -> Option<usize> {
        find_column_index(self, column)
    }
}

/// Positions of the chart axes within a specific result set's column list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxesIndexes {
    pub x_axis: usize,
    pub y_axes: Vec<usize>,
    #[serde(default)]
    pub split_by: Vec<usize>,
}

impl AxesIndexes {
    pub fn new(x_axis: usize, y_axes: Vec<usize>, split_by: Vec<usize>) -> Self {
        Self {
            x_axis,
            y_axes,
            split_by,
        }
    }

    /// All referenced indexes, x first, then split-by, then y
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.x_axis)
            .chain(self.split_by.iter().copied())
            .chain(self.y_axes.iter().copied())
    }
}

static NULL: CellValue = CellValue::Null;

/// Cell at `index`, reading cells missing from short rows as null
pub fn cell(row: &Row, index: usize) -> &CellValue {
    row.get(index).unwrap_or(&NULL)
}

/// Overwrite the cell at `index`, padding short rows with nulls first
pub fn set_cell(row: &mut Row, index: usize, value: CellValue) {
    if row.len() <= index {
        row.resize(index + 1, CellValue::Null);
    }
    row[index] = value;
}

/// Linear scan for the first column matching `column` by name and type
pub fn find_column_index(data: &QueryResultData, column: &Column) -> Option<usize> {
    data.columns.iter().position(|c| columns_equal(c, column))
}
