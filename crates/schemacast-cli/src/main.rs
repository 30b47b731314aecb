mod config;
mod logging;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use schemacast_core::Error as CoreError;
use thiserror::Error;

use config::{FileConfig, FlagOverrides, RunSettings, load_config, resolve};
use logging::{LogFormat, init_logging};
use run::RunOutcome;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("failed to write schema dump to {}: {source}", path.display())]
    SchemaDump {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("logging error: {0}")]
    Logging(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Core(CoreError::Precondition(_) | CoreError::Config(_)) => 2,
            CliError::Core(CoreError::Connect(_)) => 3,
            CliError::Core(CoreError::Query(_)) => 4,
            CliError::Core(CoreError::Output { .. }) | CliError::SchemaDump { .. } => 5,
            CliError::Logging(_) => 1,
        }
    }
}

/// Generate Embulk SQL Server to BigQuery configs from a database catalog.
#[derive(Parser, Debug)]
#[command(name = "schemacast", version)]
struct Cli {
    /// Login name [default: sa]
    #[arg(long)]
    username: Option<String>,
    /// Login password (required)
    #[arg(long)]
    password: Option<String>,
    /// Server host name [default: 127.0.0.1]
    #[arg(long)]
    hostname: Option<String>,
    /// Database whose catalog is read (required)
    #[arg(long)]
    database: Option<String>,
    /// Server port [default: 1433]
    #[arg(long)]
    port: Option<u16>,
    /// Encrypt the whole session, not just the login exchange [default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    encrypt: Option<bool>,
    /// Skip server certificate validation when encrypting [default: false]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    trust_server_cert: Option<bool>,
    /// TOML file with [source] and [output] defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory in which the config-<timestamp> directory is created [default: .]
    #[arg(long, value_name = "DIR")]
    output_root: Option<PathBuf>,
    /// Also write the grouped schema as JSON to this path.
    #[arg(long, value_name = "PATH")]
    dump_schema: Option<PathBuf>,
    /// Read and group the catalog without writing configs.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(&cli.log_level, cli.log_format) {
        eprintln!("error: {err}");
        return ExitCode::from(err.exit_code());
    }

    match run_cli(cli).await {
        Ok(RunOutcome::Rendered(summary)) => {
            println!("{}", summary.run_dir.display());
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::DryRun { tables }) => {
            println!("dry run: {tables} table(s) found");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(event = "run_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run_cli(cli: Cli) -> Result<RunOutcome, CliError> {
    let file = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };

    let flags = FlagOverrides {
        username: cli.username,
        password: cli.password,
        hostname: cli.hostname,
        port: cli.port,
        database: cli.database,
        encrypt: cli.encrypt,
        trust_server_cert: cli.trust_server_cert,
        output_root: cli.output_root,
    };
    let (connection, output_root) = resolve(flags, file);

    let settings = RunSettings {
        connection,
        output_root,
        dump_schema: cli.dump_schema,
        dry_run: cli.dry_run,
    };

    run::execute(&settings).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_flags_are_tri_state() {
        let cli = Cli::try_parse_from(["schemacast"]).expect("parse");
        assert_eq!(cli.encrypt, None);
        assert_eq!(cli.trust_server_cert, None);

        let cli = Cli::try_parse_from(["schemacast", "--encrypt", "--trust-server-cert"])
            .expect("parse");
        assert_eq!(cli.encrypt, Some(true));
        assert_eq!(cli.trust_server_cert, Some(true));

        let cli = Cli::try_parse_from([
            "schemacast",
            "--encrypt=false",
            "--trust-server-cert",
            "false",
        ])
        .expect("parse");
        assert_eq!(cli.encrypt, Some(false));
        assert_eq!(cli.trust_server_cert, Some(false));
    }
}
