use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use uuid::Uuid;

use schemacast_core::{Error, SchemaMapping};
use schemacast_introspect::{CatalogConnection, CatalogReader, SqlServerConnection};
use schemacast_render::{ConfigRenderer, RenderSummary};

use crate::CliError;
use crate::config::RunSettings;

/// What a finished run produced.
#[derive(Debug)]
pub enum RunOutcome {
    Rendered(RenderSummary),
    DryRun { tables: usize },
}

/// Validate settings, connect to the source and generate every artifact.
pub async fn execute(settings: &RunSettings) -> Result<RunOutcome, CliError> {
    settings.connection.validate()?;

    let run_id = Uuid::new_v4().to_string();
    let started_at = Local::now();
    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        connection = %settings.connection.redacted()
    );

    let timer = Instant::now();
    let mut connection = SqlServerConnection::connect(&settings.connection).await?;
    let outcome = execute_with(settings, &mut connection, &started_at).await?;

    tracing::info!(
        event = "run_finished",
        run_id = %run_id,
        status = "success",
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(outcome)
}

/// Read, group and render using an already-open connection.
pub async fn execute_with<C>(
    settings: &RunSettings,
    connection: &mut C,
    started_at: &DateTime<Local>,
) -> Result<RunOutcome, CliError>
where
    C: CatalogConnection + ?Sized,
{
    let rows = CatalogReader::default().read(connection).await?;
    let mapping = SchemaMapping::from_rows(rows);
    tracing::info!(
        event = "schema_grouped",
        tables = mapping.len(),
        columns = mapping.column_count()
    );

    if let Some(path) = &settings.dump_schema {
        write_schema_dump(path, &mapping)?;
        tracing::info!(event = "schema_written", path = %path.display());
    }

    if settings.dry_run {
        for table in mapping.tables() {
            tracing::info!(
                event = "dry_run_table",
                table = %table.name,
                columns = table.columns.len()
            );
        }
        return Ok(RunOutcome::DryRun {
            tables: mapping.len(),
        });
    }

    let summary =
        ConfigRenderer::default().render_all(&mapping, &settings.output_root, started_at)?;
    Ok(RunOutcome::Rendered(summary))
}

fn write_schema_dump(path: &Path, mapping: &SchemaMapping) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|err| Error::output(parent, err))?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .map_err(|err| Error::output(path, err))?;
    serde_json::to_writer_pretty(file, mapping).map_err(|err| CliError::SchemaDump {
        path: PathBuf::from(path),
        source: err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use schemacast_core::{CatalogRow, ConnectionSettings, Result};

    struct StaticCatalog {
        rows: Vec<CatalogRow>,
        closed: bool,
    }

    #[async_trait]
    impl CatalogConnection for StaticCatalog {
        fn engine(&self) -> &'static str {
            "static"
        }

        async fn fetch_rows(&mut self, _query: &str) -> Result<Vec<CatalogRow>> {
            Ok(self.rows.clone())
        }

        async fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    struct FailingCatalog {
        closed: bool,
    }

    #[async_trait]
    impl CatalogConnection for FailingCatalog {
        fn engine(&self) -> &'static str {
            "failing"
        }

        async fn fetch_rows(&mut self, _query: &str) -> Result<Vec<CatalogRow>> {
            Err(Error::Query("Invalid object name 'INFORMATION_SCHEMA.COLUMNS'".into()))
        }

        async fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    fn temp_root(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("schemacast_cli_{label}_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp root");
        dir
    }

    fn settings(root: PathBuf) -> RunSettings {
        RunSettings {
            connection: ConnectionSettings::new("sales", "secret"),
            output_root: root,
            dump_schema: None,
            dry_run: false,
        }
    }

    fn started_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()
    }

    #[tokio::test]
    async fn renders_every_table() {
        let root = temp_root("render");
        let mut catalog = StaticCatalog {
            rows: vec![
                CatalogRow::new("orders", "id", "int"),
                CatalogRow::new("orders", "created_at", "datetime"),
                CatalogRow::new("users", "id", "bigint"),
            ],
            closed: false,
        };

        let outcome = execute_with(&settings(root.clone()), &mut catalog, &started_at())
            .await
            .expect("run");

        assert!(catalog.closed);
        match outcome {
            RunOutcome::Rendered(summary) => {
                assert_eq!(summary.run_dir, root.join("config-20240506_0708"));
                assert_eq!(summary.artifacts.len(), 2);
                assert!(summary.artifacts.iter().all(|path| path.is_file()));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_catalog_still_creates_run_dir() {
        let root = temp_root("empty");
        let mut catalog = StaticCatalog {
            rows: Vec::new(),
            closed: false,
        };

        let outcome = execute_with(&settings(root.clone()), &mut catalog, &started_at())
            .await
            .expect("run");

        match outcome {
            RunOutcome::Rendered(summary) => {
                assert!(summary.artifacts.is_empty());
                assert_eq!(std::fs::read_dir(&summary.run_dir).unwrap().count(), 0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dry_run_writes_nothing_but_the_dump() {
        let root = temp_root("dry");
        let dump = root.join("dump").join("schema.json");
        let mut run_settings = settings(root.clone());
        run_settings.dry_run = true;
        run_settings.dump_schema = Some(dump.clone());
        let mut catalog = StaticCatalog {
            rows: vec![CatalogRow::new("orders", "id", "int")],
            closed: false,
        };

        let outcome = execute_with(&run_settings, &mut catalog, &started_at())
            .await
            .expect("run");

        assert!(matches!(outcome, RunOutcome::DryRun { tables: 1 }));
        assert!(!root.join("config-20240506_0708").exists());

        let dumped: SchemaMapping =
            serde_json::from_str(&std::fs::read_to_string(&dump).unwrap()).unwrap();
        assert_eq!(dumped.get("orders").map(|t| t.columns.len()), Some(1));
    }

    #[tokio::test]
    async fn missing_password_fails_before_connecting() {
        let mut run_settings = settings(temp_root("precondition"));
        run_settings.connection.password.clear();

        let err = execute(&run_settings).await.unwrap_err();
        assert!(matches!(err, CliError::Core(Error::Precondition(_))));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn failed_catalog_query_exits_with_query_code() {
        let root = temp_root("query");
        let mut catalog = FailingCatalog { closed: false };

        let err = execute_with(&settings(root.clone()), &mut catalog, &started_at())
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Core(Error::Query(_))));
        assert_eq!(err.exit_code(), 4);
        assert!(!root.join("config-20240506_0708").exists());
    }

    #[tokio::test]
    async fn unwritable_output_root_exits_with_output_code() {
        let root = temp_root("output");
        let blocker = root.join("not-a-dir");
        std::fs::write(&blocker, "occupied").expect("create blocking file");
        let mut catalog = StaticCatalog {
            rows: vec![CatalogRow::new("orders", "id", "int")],
            closed: false,
        };

        let err = execute_with(&settings(blocker), &mut catalog, &started_at())
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Core(Error::Output { .. })));
        assert_eq!(err.exit_code(), 5);
    }
}
