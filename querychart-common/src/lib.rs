pub mod column;
pub mod data;
pub mod value;
