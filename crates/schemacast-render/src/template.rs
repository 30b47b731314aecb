use std::borrow::Cow;

use schemacast_core::ColumnDescriptor;

use crate::typemap::{extraction_type, warehouse_type};

/// Input section of the Embulk config, up to the column options list.
///
/// The `{{ env.* }}` tags are Liquid placeholders resolved when the pipeline
/// runs, not here.
pub const EMBULK_INPUT_HEADER: &str = r#"in:
  type: sqlserver
  host: {{ env.IN_SOURCE_HOST }}
  user: {{ env.IN_SOURCE_DB_USER }}
  password: {{ env.IN_SOURCE_DB_PASS }}
  database: {{ env.IN_SOURCE_DB }}
  table: {{ env.IN_SOURCE_TABLE }}
  select: "*"
  column_options:
"#;

/// Output section of the Embulk config, up to the column options list.
pub const BIGQUERY_OUTPUT_HEADER: &str = r#"out:
  type: bigquery
  auth_method: application_default
  project: {{ env.GCP_PROJECT_ID }}
  dataset: {{ env.BQ_DATASET }}
  table: {{ env.BQ_TABLE }}
  compression: GZIP
  gcs_bucket: {{ env.GCP_PROJECT_ID }}-embulk
  auto_create_gcs_bucket: true
  column_options:
"#;

/// Fixed document shared by every table.
///
/// Each header is emitted verbatim and followed by one `  - ...` line per
/// column, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTemplate {
    input_header: Cow<'static, str>,
    output_header: Cow<'static, str>,
}

impl Default for ConfigTemplate {
    fn default() -> Self {
        Self::new(EMBULK_INPUT_HEADER, BIGQUERY_OUTPUT_HEADER)
    }
}

impl ConfigTemplate {
    pub fn new(
        input_header: impl Into<Cow<'static, str>>,
        output_header: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            input_header: input_header.into(),
            output_header: output_header.into(),
        }
    }

    /// Render the document for one table's columns.
    pub fn render(&self, columns: &[ColumnDescriptor]) -> String {
        let mut out = String::new();

        out.push_str(&self.input_header);
        for column in columns {
            push_line(&mut out, &input_column_option(column));
        }

        out.push_str(&self.output_header);
        for column in columns {
            push_line(&mut out, &output_column_option(column));
        }

        out
    }
}

fn push_line(out: &mut String, option: &str) {
    out.push_str("  - ");
    out.push_str(option);
    out.push('\n');
}

/// `<name>: {type: <extraction type>}`
pub fn input_column_option(column: &ColumnDescriptor) -> String {
    format!(
        "{}: {{type: {}}}",
        column.name,
        extraction_type(&column.native_type)
    )
}

/// `{name: <name>, type: <warehouse type>[, format: '<fmt>']}`
pub fn output_column_option(column: &ColumnDescriptor) -> String {
    let mapped = warehouse_type(&column.native_type);
    match mapped.format() {
        Some(format) => format!(
            "{{name: {}, type: {}, format: '{format}'}}",
            column.name,
            mapped.name()
        ),
        None => format!("{{name: {}, type: {}}}", column.name, mapped.name()),
    }
}
