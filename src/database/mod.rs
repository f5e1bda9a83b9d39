// Database module
// SQLite persistence for plagiarism reports

pub mod sqlite;

pub use sqlite::*;
