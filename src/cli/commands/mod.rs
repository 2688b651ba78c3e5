//! Command implementations

pub mod analyze;
pub mod completions;
pub mod data;
pub mod init;
pub mod scenario;
pub mod workbook;
