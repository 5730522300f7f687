pub mod csv_file;

pub use csv_file::{read_records, write_report};
