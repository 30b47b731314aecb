use std::path::{Path, PathBuf};

use serde::Deserialize;

use schemacast_core::{
    ConnectionSettings, DEFAULT_HOSTNAME, DEFAULT_PORT, DEFAULT_USERNAME, Error, Result,
};

/// Optional TOML file supplying defaults for command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub encrypt: Option<bool>,
    pub trust_server_cert: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub root: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| Error::Config(format!("reading {}: {err}", path.display())))?;
    toml::from_str(&content)
        .map_err(|err| Error::Config(format!("parsing {}: {err}", path.display())))
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct FlagOverrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub encrypt: Option<bool>,
    pub trust_server_cert: Option<bool>,
    pub output_root: Option<PathBuf>,
}

/// Fully resolved parameters for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub connection: ConnectionSettings,
    pub output_root: PathBuf,
    pub dump_schema: Option<PathBuf>,
    pub dry_run: bool,
}

/// Merge flags over the file config over built-in defaults.
pub fn resolve(flags: FlagOverrides, file: FileConfig) -> (ConnectionSettings, PathBuf) {
    let source = file.source;

    let connection = ConnectionSettings {
        username: flags
            .username
            .or(source.username)
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
        password: flags.password.or(source.password).unwrap_or_default(),
        hostname: flags
            .hostname
            .or(source.hostname)
            .unwrap_or_else(|| DEFAULT_HOSTNAME.to_string()),
        port: flags.port.or(source.port).unwrap_or(DEFAULT_PORT),
        database: flags.database.or(source.database).unwrap_or_default(),
        encrypt: flags.encrypt.or(source.encrypt).unwrap_or(false),
        trust_server_cert: flags
            .trust_server_cert
            .or(source.trust_server_cert)
            .unwrap_or(false),
    };

    let output_root = flags
        .output_root
        .or(file.output.root)
        .unwrap_or_else(|| PathBuf::from("."));

    (connection, output_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let (connection, root) = resolve(FlagOverrides::default(), FileConfig::default());
        assert_eq!(connection.username, "sa");
        assert_eq!(connection.hostname, "127.0.0.1");
        assert_eq!(connection.port, 1433);
        assert!(connection.password.is_empty());
        assert!(connection.database.is_empty());
        assert!(!connection.encrypt);
        assert_eq!(root, PathBuf::from("."));
    }

    #[test]
    fn flags_take_precedence_over_file() {
        let file: FileConfig = toml::from_str(
            r#"
            [source]
            username = "loader"
            password = "from-file"
            database = "sales"
            port = 14330

            [output]
            root = "generated"
            "#,
        )
        .expect("parse config");

        let flags = FlagOverrides {
            password: Some("from-flag".to_string()),
            output_root: Some(PathBuf::from("out")),
            ..FlagOverrides::default()
        };

        let (connection, root) = resolve(flags, file);
        assert_eq!(connection.username, "loader");
        assert_eq!(connection.password, "from-flag");
        assert_eq!(connection.database, "sales");
        assert_eq!(connection.port, 14330);
        assert_eq!(root, PathBuf::from("out"));
    }

    #[test]
    fn flag_can_turn_off_file_encryption() {
        let file: FileConfig = toml::from_str(
            "[source]\nencrypt = true\ntrust_server_cert = true\n",
        )
        .expect("parse config");

        let (from_file, _) = resolve(FlagOverrides::default(), file.clone());
        assert!(from_file.encrypt);
        assert!(from_file.trust_server_cert);

        let flags = FlagOverrides {
            encrypt: Some(false),
            trust_server_cert: Some(false),
            ..FlagOverrides::default()
        };
        let (connection, _) = resolve(flags, file);
        assert!(!connection.encrypt);
        assert!(!connection.trust_server_cert);
    }

    #[test]
    fn rejects_unknown_keys() {
        let parsed = toml::from_str::<FileConfig>("[source]\npasword = \"typo\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_config(Path::new("/nonexistent/schemacast.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
