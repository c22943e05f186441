//! IO utilities for loading uploaded tables.

pub mod csv_table;

pub use csv_table::{read_csv_table, read_delimited_table};
