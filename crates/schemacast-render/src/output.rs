use std::fs::{File, create_dir, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use schemacast_core::{Error, Result};

pub const RUN_DIR_PREFIX: &str = "config-";
pub const ARTIFACT_SUFFIX: &str = ".yml.liquid";

/// `config-<YYYYMMDD_HHMM>` for the given run start time.
pub fn run_dir_name<Tz>(started_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{RUN_DIR_PREFIX}{}", started_at.format("%Y%m%d_%H%M"))
}

/// Create the run directory under `root`.
///
/// Fails if the directory already exists so an earlier run is never
/// overwritten in place.
pub fn create_run_dir<Tz>(root: &Path, started_at: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if !root.as_os_str().is_empty() {
        create_dir_all(root).map_err(|err| Error::output(root, err))?;
    }

    let run_dir = root.join(run_dir_name(started_at));
    create_dir(&run_dir).map_err(|err| Error::output(&run_dir, err))?;
    Ok(run_dir)
}

/// `<table_name>.yml.liquid`, provided the name is usable as a single path
/// component.
pub fn artifact_file_name(table_name: &str) -> std::result::Result<String, io::Error> {
    let invalid = table_name.is_empty()
        || table_name == "."
        || table_name == ".."
        || table_name.contains(['/', '\\', '\0']);

    if invalid {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("table name {table_name:?} cannot be used as a file name"),
        ));
    }

    Ok(format!("{table_name}{ARTIFACT_SUFFIX}"))
}

/// Write `body` to `path`, creating or truncating the file.
pub fn write_artifact(path: &Path, body: &str) -> Result<()> {
    let file = File::create(path).map_err(|err| Error::output(path, err))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(body.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|err| Error::output(path, err))
}
