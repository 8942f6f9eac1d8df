//! Dataset readers, missing-value imputation, and result writers for cedar.

mod arff;
mod csv_reader;
mod domain;
mod error;
mod impute;
mod writer;

pub use arff::ArffReader;
pub use csv_reader::CsvReader;
pub use domain::ExperimentName;
pub use error::IoError;
pub use impute::{MissingPolicy, impute};
pub use writer::ReportWriter;
