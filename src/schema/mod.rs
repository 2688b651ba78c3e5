//! Schema system - workbook validation and starter templates

pub mod template;
pub mod validator;

pub use template::{TemplateError, TemplateGenerator, WorkbookTemplate};
pub use validator::{SchemaError, SchemaViolation, WorkbookError, WorkbookValidator};
