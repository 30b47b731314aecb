//! Rendering of per-table pipeline configs.
//!
//! Every table of a [`SchemaMapping`] becomes one `<table>.yml.liquid` file
//! inside a fresh `config-<YYYYMMDD_HHMM>` directory.

pub mod output;
pub mod template;
pub mod typemap;

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use schemacast_core::{Error, Result, SchemaMapping, TableSchema};

pub use output::{ARTIFACT_SUFFIX, RUN_DIR_PREFIX, artifact_file_name, run_dir_name};
pub use template::{
    BIGQUERY_OUTPUT_HEADER, ConfigTemplate, EMBULK_INPUT_HEADER, input_column_option,
    output_column_option,
};
pub use typemap::{ExtractionType, WarehouseType, extraction_type, warehouse_type};

/// Paths produced by one rendering run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub run_dir: PathBuf,
    pub artifacts: Vec<PathBuf>,
}

/// Renders and writes one config artifact per table.
#[derive(Debug, Clone, Default)]
pub struct ConfigRenderer {
    template: ConfigTemplate,
}

impl ConfigRenderer {
    pub fn new(template: ConfigTemplate) -> Self {
        Self { template }
    }

    /// Render one table's document without touching the filesystem.
    pub fn render_table(&self, table: &TableSchema) -> String {
        self.template.render(&table.columns)
    }

    /// Write one table's artifact into `run_dir` and return its path.
    pub fn write_table(&self, run_dir: &Path, table: &TableSchema) -> Result<PathBuf> {
        let file_name =
            artifact_file_name(&table.name).map_err(|err| Error::output(run_dir, err))?;
        let path = run_dir.join(file_name);

        tracing::info!(event = "artifact_rendering", table = %table.name);
        let body = self.render_table(table);
        output::write_artifact(&path, &body)?;
        tracing::info!(
            event = "artifact_written",
            table = %table.name,
            columns = table.columns.len(),
            path = %path.display()
        );

        Ok(path)
    }

    /// Create the run directory under `root` and write every table into it.
    ///
    /// Stops at the first failure; files already written are left in place.
    pub fn render_all<Tz>(
        &self,
        mapping: &SchemaMapping,
        root: &Path,
        started_at: &DateTime<Tz>,
    ) -> Result<RenderSummary>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let run_dir = output::create_run_dir(root, started_at)?;
        tracing::info!(event = "output_dir_created", path = %run_dir.display());

        let artifacts = mapping
            .tables()
            .map(|table| self.write_table(&run_dir, table))
            .collect::<Result<Vec<_>>>()?;

        Ok(RenderSummary { run_dir, artifacts })
    }
}
