use serde::{Deserialize, Serialize};

/// Reduction applied to the Y values of rows that collapse into one chart point
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum AggregationType {
    #[default]
    Sum,
    Average,
    Min,
    Max,
}

/// Reduces a non-empty list of numbers to a single value
pub type AggregationFn = fn(&[f64]) -> f64;

impl AggregationType {
    /// Unknown names fall back to `Sum`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "average" | "avg" | "mean" => AggregationType::Average,
            "min" => AggregationType::Min,
            "max" => AggregationType::Max,
            _ => AggregationType::Sum,
        }
    }

    pub fn aggregation_fn(&self) -> AggregationFn {
        resolve(*self)
    }
}

impl From<String> for AggregationType {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<&str> for AggregationType {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

/// Map an aggregation kind to its reduction function.
///
/// Callers only invoke the returned function on non-empty slices.
pub fn resolve(kind: AggregationType) -> AggregationFn {
    match kind {
        AggregationType::Sum => sum,
        AggregationType::Average => average,
        AggregationType::Min => min,
        AggregationType::Max => max,
    }
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn average(values: &[f64]) -> f64 {
    sum(values) / values.len() as f64
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(AggregationType::Sum, 16.0)]
    #[case(AggregationType::Min, 1.0)]
    #[case(AggregationType::Max, 5.0)]
    fn test_reductions(#[case] kind: AggregationType, #[case] expected: f64) {
        let reduce = resolve(kind);
        assert_eq!(reduce(&[5.0, 5.0, 5.0, 1.0]), expected);
    }

    #[test]
    fn test_average() {
        let reduce = AggregationType::Average.aggregation_fn();
        assert_approx_eq!(f64, reduce(&[1.0, 2.0, 4.0]), 7.0 / 3.0);
    }

    #[test]
    fn test_negative_extrema() {
        assert_eq!(resolve(AggregationType::Min)(&[-3.0, -7.5, 2.0]), -7.5);
        assert_eq!(resolve(AggregationType::Max)(&[-3.0, -7.5]), -3.0);
    }

    #[rstest]
    #[case("sum", AggregationType::Sum)]
    #[case("Average", AggregationType::Average)]
    #[case("MIN", AggregationType::Min)]
    #[case("max", AggregationType::Max)]
    #[case("median", AggregationType::Sum)]
    #[case("", AggregationType::Sum)]
    fn test_unknown_names_fall_back_to_sum(#[case] name: &str, #[case] expected: AggregationType) {
        assert_eq!(AggregationType::from_name(name), expected);
        let parsed: AggregationType = serde_json::from_value(serde_json::json!(name)).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(AggregationType::Average).unwrap(),
            serde_json::json!("average")
        );
    }
}
