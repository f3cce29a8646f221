use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// Type tag attached to every column of a query result.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColumnType {
    Bool,
    DateTime,
    Decimal,
    Dynamic,
    Guid,
    Int,
    Long,
    Real,
    String,
    TimeSpan,
}

impl ColumnType {
    /// Whether values of this type are plotted on a continuous numeric axis
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Int | ColumnType::Long | ColumnType::Real | ColumnType::Decimal
        )
    }

    /// Whether values of this type are plotted on a time axis
    pub fn is_date_like(&self) -> bool {
        matches!(self, ColumnType::DateTime | ColumnType::TimeSpan)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.column_type)
    }
}

pub fn is_numeric(column_type: ColumnType) -> bool {
    column_type.is_numeric()
}

pub fn is_date_like(column_type: ColumnType) -> bool {
    column_type.is_date_like()
}

/// Columns are equal when both the (case-sensitive) name and the type match
pub fn columns_equal(a: &Column, b: &Column) -> bool {
    a.name == b.name && a.column_type == b.column_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(ColumnType::Int, true, false)]
    #[case(ColumnType::Long, true, false)]
    #[case(ColumnType::Real, true, false)]
    #[case(ColumnType::Decimal, true, false)]
    #[case(ColumnType::DateTime, false, true)]
    #[case(ColumnType::TimeSpan, false, true)]
    #[case(ColumnType::String, false, false)]
    #[case(ColumnType::Dynamic, false, false)]
    #[case(ColumnType::Bool, false, false)]
    #[case(ColumnType::Guid, false, false)]
    fn test_classification(
        #[case] column_type: ColumnType,
        #[case] numeric: bool,
        #[case] date_like: bool,
    ) {
        assert_eq!(is_numeric(column_type), numeric);
        assert_eq!(is_date_like(column_type), date_like);
    }

    #[test]
    fn test_columns_equal_is_case_sensitive() {
        let a = Column::new("Country", ColumnType::String);
        assert!(columns_equal(&a, &Column::new("Country", ColumnType::String)));
        assert!(!columns_equal(&a, &Column::new("country", ColumnType::String)));
        assert!(!columns_equal(&a, &Column::new("Country", ColumnType::Dynamic)));
    }

    #[test]
    fn test_type_tags_use_query_engine_names() {
        assert_eq!(ColumnType::DateTime.to_string(), "datetime");
        assert_eq!(ColumnType::from_str("timespan").unwrap(), ColumnType::TimeSpan);

        let column: Column =
            serde_json::from_str(r#"{"name": "Timestamp", "type": "datetime"}"#).unwrap();
        assert_eq!(column, Column::new("Timestamp", ColumnType::DateTime));
        assert_eq!(column.to_string(), "Timestamp (datetime)");
    }
}
