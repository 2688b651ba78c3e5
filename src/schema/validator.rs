//! Workbook validation with source-located diagnostics

use jsonschema::error::ValidationErrorKind;
use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use rust_embed::Embed;
use serde_json::Value as JsonValue;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::error::ValidationError;
use crate::entities::workbook::Workbook;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

const WORKBOOK_SCHEMA: &str = "workbook.schema.json";

/// Schema violations found in one workbook file
#[derive(Debug, Error, Diagnostic)]
#[error("Workbook validation failed: {summary}")]
#[diagnostic(code(priceplan::schema::validation_error))]
pub struct SchemaError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<SchemaViolation>,
}

/// A single schema violation
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct SchemaViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl SchemaViolation {
    fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl SchemaError {
    fn new(filename: &str, source: &str, violations: Vec<SchemaViolation>) -> Self {
        let summary = if violations.len() == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", violations.len())
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }
}

/// Anything that stops a workbook file from becoming models
#[derive(Debug, Error, Diagnostic)]
pub enum WorkbookError {
    #[error("could not read {path}: {message}")]
    #[diagnostic(code(priceplan::workbook::io))]
    Io { path: String, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    #[error("workbook {path} is invalid: {source}")]
    #[diagnostic(code(priceplan::workbook::invalid))]
    Invalid {
        path: String,
        #[source]
        source: ValidationError,
    },

    #[error("embedded workbook schema is unusable: {0}")]
    #[diagnostic(code(priceplan::schema::internal))]
    SchemaLoad(String),
}

/// Compiled workbook schema
pub struct WorkbookValidator {
    schema: JsonValidator,
}

impl WorkbookValidator {
    pub fn new() -> Result<Self, WorkbookError> {
        let raw = EmbeddedSchemas::get(WORKBOOK_SCHEMA)
            .ok_or_else(|| WorkbookError::SchemaLoad(format!("{} not embedded", WORKBOOK_SCHEMA)))?;
        let schema_json: JsonValue = serde_json::from_slice(&raw.data)
            .map_err(|e| WorkbookError::SchemaLoad(e.to_string()))?;
        let schema =
            validator_for(&schema_json).map_err(|e| WorkbookError::SchemaLoad(e.to_string()))?;
        Ok(Self { schema })
    }

    /// The raw embedded schema, for `workbook schema`
    pub fn schema_source() -> Option<String> {
        EmbeddedSchemas::get(WORKBOOK_SCHEMA)
            .and_then(|f| String::from_utf8(f.data.into_owned()).ok())
    }

    /// Check YAML content against the schema, reporting every violation
    pub fn validate(&self, content: &str, filename: &str) -> Result<JsonValue, SchemaError> {
        let yaml_value: serde_yml::Value = match serde_yml::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                let span = find_error_span(content, e.location());
                let violation = SchemaViolation::new(
                    format!("YAML parse error: {}", e),
                    "invalid YAML".to_string(),
                    span,
                    Some("Check YAML syntax - proper indentation, colons, quotes".to_string()),
                );
                return Err(SchemaError::new(filename, content, vec![violation]));
            }
        };

        // An empty file is an empty workbook
        let yaml_value = match yaml_value {
            serde_yml::Value::Null => serde_yml::Value::Mapping(Default::default()),
            other => other,
        };

        let json_value: JsonValue = serde_json::to_value(&yaml_value).map_err(|e| {
            let violation = SchemaViolation::new(
                format!("Failed to convert YAML to JSON: {}", e),
                "conversion error".to_string(),
                (0, content.len()).into(),
                None,
            );
            SchemaError::new(filename, content, vec![violation])
        })?;

        let violations: Vec<SchemaViolation> = self
            .schema
            .iter_errors(&json_value)
            .map(|e| error_to_violation(content, &e))
            .collect();

        if violations.is_empty() {
            Ok(json_value)
        } else {
            debug!(file = filename, count = violations.len(), "workbook failed schema");
            Err(SchemaError::new(filename, content, violations))
        }
    }

    /// Validate and deserialize workbook content
    pub fn parse(&self, content: &str, filename: &str) -> Result<Workbook, WorkbookError> {
        let json_value = self.validate(content, filename)?;
        serde_json::from_value(json_value).map_err(|e| {
            let violation = SchemaViolation::new(
                format!("Workbook does not match the expected shape: {}", e),
                "invalid workbook".to_string(),
                first_line_span(content),
                None,
            );
            WorkbookError::Schema(SchemaError::new(filename, content, vec![violation]))
        })
    }

    /// Read, validate and deserialize a workbook file
    pub fn load(&self, path: &Path) -> Result<Workbook, WorkbookError> {
        let content = std::fs::read_to_string(path).map_err(|e| WorkbookError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let filename = path.display().to_string();
        self.parse(&content, &filename)
    }
}

fn error_to_violation(content: &str, error: &JsonSchemaError) -> SchemaViolation {
    let path = error.instance_path.to_string();
    let span = find_path_span(content, &path);
    SchemaViolation::new(
        format_schema_error(error),
        format_error_hint(error),
        span,
        generate_help_message(error),
    )
}

fn format_schema_error(error: &JsonSchemaError) -> String {
    let path = if error.instance_path.as_str().is_empty() {
        "workbook root".to_string()
    } else {
        format!("'{}'", error.instance_path)
    };

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let field = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("Missing required field: {} at {}", field, path)
        }
        ValidationErrorKind::Type { kind } => {
            format!("Wrong type at {}: expected {:?}", path, kind)
        }
        ValidationErrorKind::Enum { options } => {
            format!("Invalid value at {}: must be one of: {}", path, format_enum_options(options))
        }
        ValidationErrorKind::Minimum { limit } | ValidationErrorKind::ExclusiveMinimum { limit } => {
            format!("Value at {} is too small: limit {}", path, limit)
        }
        ValidationErrorKind::Maximum { limit } | ValidationErrorKind::ExclusiveMaximum { limit } => {
            format!("Value at {} is too large: limit {}", path, limit)
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            format!("Unknown field(s) at {}: {}", path, unexpected.join(", "))
        }
        _ => format!("Validation error at {}: {}", path, error),
    }
}

fn format_enum_options(options: &JsonValue) -> String {
    match options.as_array() {
        Some(arr) => arr
            .iter()
            .map(|v| v.as_str().map(|s| s.to_string()).unwrap_or_else(|| v.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        None => options.to_string(),
    }
}

fn format_error_hint(error: &JsonSchemaError) -> String {
    match &error.kind {
        ValidationErrorKind::Required { .. } => "required field missing",
        ValidationErrorKind::Type { .. } => "wrong type",
        ValidationErrorKind::Enum { .. } => "invalid value",
        ValidationErrorKind::Minimum { .. }
        | ValidationErrorKind::ExclusiveMinimum { .. }
        | ValidationErrorKind::Maximum { .. }
        | ValidationErrorKind::ExclusiveMaximum { .. } => "out of range",
        ValidationErrorKind::AdditionalProperties { .. } => "unknown field",
        _ => "validation error",
    }
    .to_string()
}

fn generate_help_message(error: &JsonSchemaError) -> Option<String> {
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let field = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            Some(format!("Add the '{}' field", field))
        }
        ValidationErrorKind::Enum { options } => {
            Some(format!("Valid values: {}", format_enum_options(options)))
        }
        ValidationErrorKind::ExclusiveMaximum { .. }
            if error.instance_path.as_str() == "/target_margin" =>
        {
            Some("A margin of 1.0 or more would need an infinite price; use e.g. 0.3 for 30%".to_string())
        }
        ValidationErrorKind::AdditionalProperties { unexpected } if unexpected.len() == 1 => {
            Some(format!("Remove the '{}' field or check spelling", unexpected[0]))
        }
        ValidationErrorKind::AdditionalProperties { .. } => {
            Some("Remove unknown fields or check spelling".to_string())
        }
        _ => None,
    }
}

/// Byte offset and text of every line, without its `\n` or `\r\n`
fn lines_with_offsets(content: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    content.split_inclusive('\n').scan(0, |offset, raw| {
        let start = *offset;
        *offset += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        Some((start, line.strip_suffix('\r').unwrap_or(line)))
    })
}

fn first_line_span(content: &str) -> SourceSpan {
    let len = lines_with_offsets(content).next().map_or(0, |(_, line)| line.len());
    (0, len.max(1).min(content.len())).into()
}

/// Span for a YAML parser error location
///
/// Parser columns count characters, so they are mapped to byte offsets
/// through the line's char boundaries.
fn find_error_span(content: &str, location: Option<serde_yml::Location>) -> SourceSpan {
    let Some(loc) = location else {
        return first_line_span(content);
    };
    let line = loc.line().saturating_sub(1);
    let column = loc.column().saturating_sub(1);

    let Some((start, text)) = lines_with_offsets(content).nth(line) else {
        return (content.len(), 0).into();
    };
    let within = text
        .char_indices()
        .nth(column)
        .map_or(text.len(), |(index, _)| index);
    let offset = start + within;
    let len = (text.len() - within).max(1).min(content.len() - offset);
    (offset, len).into()
}

/// Span for a JSON pointer, found by searching for the nearest named key
fn find_path_span(content: &str, json_path: &str) -> SourceSpan {
    json_path
        .split('/')
        .filter(|s| !s.is_empty() && s.parse::<usize>().is_err())
        .last()
        .and_then(|key| find_key_span(content, key))
        .unwrap_or_else(|| first_line_span(content))
}

fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let pattern = format!("{}:", key);
    lines_with_offsets(content).find_map(|(offset, line)| {
        let trimmed = line.trim_start_matches([' ', '-']);
        trimmed
            .starts_with(&pattern)
            .then(|| (offset + (line.len() - trimmed.len()), trimmed.len()).into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> WorkbookValidator {
        WorkbookValidator::new().unwrap()
    }

    #[test]
    fn test_valid_workbook() {
        let yaml = r#"
business_type: bakery
target_margin: 0.4
expected_volume: 500
market_position: premium
direct_costs:
  - name: Flour
    amount: 0.8
segments:
  - name: Cafes
    size: 12
    price_sensitivity: 4
"#;
        let workbook = validator().parse(yaml, "bakery.yaml").unwrap();
        assert_eq!(workbook.business_type, "bakery");
        assert_eq!(workbook.segments[0].price_sensitivity, 4.0);
    }

    #[test]
    fn test_empty_file_is_default_workbook() {
        let workbook = validator().parse("", "empty.yaml").unwrap();
        assert_eq!(workbook.target_margin, 0.3);
    }

    #[test]
    fn test_reports_every_violation() {
        let yaml = r#"
target_margin: 1.2
market_position: luxury
direct_costs:
  - amount: -5
"#;
        let err = validator().validate(yaml, "bad.yaml").unwrap_err();
        let messages: Vec<&str> = err.violations().iter().map(|v| v.message()).collect();

        assert!(err.violations().len() >= 4, "{:?}", messages);
        assert!(messages.iter().any(|m| m.contains("luxury") || m.contains("market_position")));
        assert!(messages.iter().any(|m| m.contains("Missing required field: name")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = validator()
            .validate("business_type: x\nmargin: 0.3\n", "typo.yaml")
            .unwrap_err();
        assert!(err.violations()[0].message().contains("margin"));
    }

    #[test]
    fn test_yaml_syntax_error() {
        let err = validator()
            .validate("direct_costs: [\n  name: x", "broken.yaml")
            .unwrap_err();
        assert!(err.violations()[0].message().starts_with("YAML parse error"));
    }

    #[test]
    fn test_syntax_error_span_on_multibyte_line() {
        for yaml in [
            "business_type: ééééééééé: x\n",
            "notes: ok\r\nbusiness_type: ééééééééé: x\r\n",
        ] {
            let err = validator().validate(yaml, "accents.yaml").unwrap_err();
            let span = err.violations()[0].span;
            let end = span.offset() + span.len();

            assert!(end <= yaml.len());
            assert!(yaml.is_char_boundary(span.offset()), "{:?}", span);
            assert!(yaml.is_char_boundary(end), "{:?}", span);
        }
    }

    #[test]
    fn test_key_span_with_crlf_line_endings() {
        let span = find_key_span("business_type: x\r\nmargin: 0.3\r\n", "margin").unwrap();
        assert_eq!(span.offset(), 18);
        assert_eq!(span.len(), "margin: 0.3".len());
    }

    #[test]
    fn test_schema_source_is_embedded() {
        let source = WorkbookValidator::schema_source().unwrap();
        assert!(source.contains("price_sensitivity"));
    }
}
