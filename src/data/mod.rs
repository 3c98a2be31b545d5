//! Data module - CSV loading and the email table

mod loader;
mod table;

pub use loader::{ColumnNames, EmailLoader, LoaderError};
pub use table::{EmailTable, DAY_OF_WEEK, TIME_OF_DAY, YEAR};
