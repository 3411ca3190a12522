//! IO utilities for loading external test sets and customer tables.

pub mod churn_csv;
pub mod customers_csv;

pub use churn_csv::{read_test_set, read_test_set_with_config, TestSetReaderConfig};
pub use customers_csv::read_customer_records;
