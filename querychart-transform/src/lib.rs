pub mod aggregation;
pub mod error;
pub mod escape;
pub mod limit;
pub mod options;
pub mod series;
pub mod transform;

pub use aggregation::AggregationType;
pub use error::QueryChartError;
pub use limit::{LimitAndAggregateEngine, LimitAndAggregateParams, LimitedResults};
pub use options::{ColumnsSelection, TransformOptions};
pub use transform::{transform, DataTransformer, TransformResult};
