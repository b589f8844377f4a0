//! Library side of the `lsbook` binary, exposed for integration tests.
pub mod book;
pub mod cli;

pub use book::{BuildOptions, BuildReport, generate_book};
