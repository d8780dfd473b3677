use crate::config::schema::{InjectorConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "buildscript-injector.toml";

/// Where a configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from an in-memory string
    Inline,
    /// Named explicitly, e.g. with `--config`
    Explicit(PathBuf),
    /// `buildscript-injector.toml` found in the project root
    Project(PathBuf),
}

impl ConfigOrigin {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigOrigin::Inline => None,
            ConfigOrigin::Explicit(path) | ConfigOrigin::Project(path) => Some(path.as_path()),
        }
    }
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::Inline => write!(f, "inline injector config"),
            ConfigOrigin::Explicit(path) => write!(f, "injector config {}", path.display()),
            ConfigOrigin::Project(path) => write!(f, "project config {}", path.display()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        origin: ConfigOrigin,
        source: std::io::Error,
    },
    Toml {
        origin: ConfigOrigin,
        source: toml_edit::de::Error,
    },
    Validation {
        origin: ConfigOrigin,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn origin(&self) -> &ConfigOrigin {
        match self {
            ConfigError::Io { origin, .. }
            | ConfigError::Toml { origin, .. }
            | ConfigError::Validation { origin, .. } => origin,
        }
    }

    fn relocated(self, origin: ConfigOrigin) -> Self {
        match self {
            ConfigError::Io { source, .. } => ConfigError::Io { origin, source },
            ConfigError::Toml { source, .. } => ConfigError::Toml { origin, source },
            ConfigError::Validation { source, .. } => ConfigError::Validation { origin, source },
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { origin, source } => write!(f, "cannot read {origin}: {source}"),
            ConfigError::Toml { origin, source } => {
                write!(f, "{origin} is not valid injector TOML: {source}")
            }
            ConfigError::Validation { origin, source } => {
                write!(f, "{origin} rejected: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<InjectorConfig, ConfigError> {
    let config: InjectorConfig =
        toml_edit::de::from_str(input).map_err(|source| ConfigError::Toml {
            origin: ConfigOrigin::Inline,
            source,
        })?;
    config.validate().map_err(|source| ConfigError::Validation {
        origin: ConfigOrigin::Inline,
        source,
    })?;
    Ok(config)
}

fn load_file(path: &Path, origin: ConfigOrigin) -> Result<InjectorConfig, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(source) => return Err(ConfigError::Io { origin, source }),
    };
    load_from_str(&contents).map_err(|error| error.relocated(origin))
}

/// Load an explicitly named config file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<InjectorConfig, ConfigError> {
    let path = path.as_ref();
    load_file(path, ConfigOrigin::Explicit(path.to_path_buf()))
}

/// Resolve the configuration for a project.
///
/// Priority order:
/// 1. Explicit path
/// 2. `buildscript-injector.toml` in the project root
/// 3. Built-in defaults
pub fn load_for_project(
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<InjectorConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let candidate = project_root.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        tracing::debug!(path = %candidate.display(), "using project config");
        return load_file(&candidate, ConfigOrigin::Project(candidate.clone()));
    }

    Ok(InjectorConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_empty_is_default() {
        let config = load_from_str("").unwrap();
        assert_eq!(config, InjectorConfig::default());
    }

    #[test]
    fn test_load_partial_override() {
        let config = load_from_str(
            r##"
[plugin]
version = "1.2.3"

[lexicon]
line_comment = "#"
"##,
        )
        .unwrap();
        assert_eq!(config.plugin.version, "1.2.3");
        assert_eq!(config.plugin.name, "trace-gradle-plugin");
        assert_eq!(config.lexicon.line_comment, "#");
        assert_eq!(config.lexicon.block_open, "/*");
    }

    #[test]
    fn test_load_rejects_unknown_field() {
        let err = load_from_str("[target]\nmarkr = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml { origin: ConfigOrigin::Inline, .. }));
    }

    #[test]
    fn test_load_validation_failure() {
        let err = load_from_str("[plugin]\nversion = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert!(err.to_string().contains("plugin.version must not be empty"));
    }

    #[test]
    fn test_load_from_path_attaches_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[plugin]\nversion = \"nope\"\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        match &err {
            ConfigError::Validation {
                origin: ConfigOrigin::Explicit(p),
                ..
            } => assert_eq!(p, &path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with("injector config "));
        assert!(err.to_string().contains("is not a semantic version"));
    }

    #[test]
    fn test_load_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().starts_with("cannot read injector config"));
    }

    #[test]
    fn test_load_for_project_prefers_project_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[target]\nmarker = \"pluginManagement {\"\n",
        )
        .unwrap();

        let config = load_for_project(dir.path(), None).unwrap();
        assert_eq!(config.target.marker, "pluginManagement {");
    }

    #[test]
    fn test_load_for_project_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_for_project(dir.path(), None).unwrap();
        assert_eq!(config, InjectorConfig::default());
    }

    #[test]
    fn test_load_for_project_reports_project_origin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[target\n").unwrap();

        let err = load_for_project(dir.path(), None).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert_eq!(err.origin(), &ConfigOrigin::Project(path.clone()));
        assert_eq!(err.origin().path(), Some(path.as_path()));
        assert!(err
            .to_string()
            .starts_with(&format!("project config {} is not valid injector TOML", path.display())));
    }
}
