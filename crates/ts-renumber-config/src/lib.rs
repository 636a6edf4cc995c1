//! Reads the `[renumber]` table of `.ts-renumber.toml`.
//!
//! A `--config` file wins over the copy in the working directory, which wins
//! over the copy at the repository root, which wins over the built-in input,
//! grammar and section start. Each key is taken from the highest layer that
//! sets it, and the merged table is checked once before it becomes
//! [`RenumberSettings`].

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use ts_renumber::{Grammar, RenumberOptions, DEFAULT_SECTION_START};

pub const CONFIG_FILE_NAME: &str = ".ts-renumber.toml";
pub const DEFAULT_INPUT: &str = "README.md";

/// Renumber settings plus the files they were read from.
#[derive(Clone, Debug)]
pub struct Config {
    pub renumber: RenumberSettings,
    pub sources: ConfigSources,
}

/// Input document, bullet grammar and section start for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenumberSettings {
    pub input: PathBuf,
    pub grammar: Grammar,
    pub section_start: i64,
}

impl RenumberSettings {
    pub fn options(&self) -> RenumberOptions {
        RenumberOptions {
            grammar: self.grammar,
            section_start: self.section_start,
        }
    }
}

/// Directory the files were searched from and every layer that applied.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// One `.ts-renumber.toml` (or the built-in values) and the directory its relative `input` is resolved against.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in value".to_owned(),
            (kind, Some(path)) => format!("{kind} {}", path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Where a layer came from; variants are listed lowest precedence first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "built-in",
            ConfigSourceKind::GitRoot => "repository",
            ConfigSourceKind::Local => "working-directory",
            ConfigSourceKind::Override => "--config",
        };
        f.write_str(label)
    }
}

/// Where to start searching, and the optional `--config` path.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Reasons `.ts-renumber.toml` could not produce settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot search for .ts-renumber.toml from {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("--config file {path} does not exist")]
    OverrideNotFound { path: PathBuf },
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("{path} is not a valid .ts-renumber.toml: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid [renumber] settings:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Merges every `.ts-renumber.toml` layer that exists and validates the result.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let default_source = ConfigSource::default(working_dir.clone());
        let mut merged = defaults_layer(default_source.clone());
        let mut source_layers = vec![default_source];

        let local_config_path = working_dir.join(CONFIG_FILE_NAME);
        let git_config_path = find_git_root(&working_dir).map(|root| root.join(CONFIG_FILE_NAME));

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        let renumber = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            renumber,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

fn load_layer(path: &Path, source: ConfigSource) -> Result<RenumberPartial, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.into(),
        source: err,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.into(),
        source: err,
    })?;
    Ok(raw
        .renumber
        .map(|section| section.into_partial(source))
        .unwrap_or_default())
}

fn defaults_layer(source: ConfigSource) -> RenumberPartial {
    RenumberPartial {
        input: Some(Located::new(PathBuf::from(DEFAULT_INPUT), source.clone())),
        grammar: Some(Located::new(
            Grammar::default().as_str().to_string(),
            source.clone(),
        )),
        section_start: Some(Located::new(DEFAULT_SECTION_START, source)),
    }
}

#[derive(Clone, Debug, Default)]
struct RenumberPartial {
    input: Option<Located<PathBuf>>,
    grammar: Option<Located<String>>,
    section_start: Option<Located<i64>>,
}

impl RenumberPartial {
    fn merge(&mut self, other: RenumberPartial) {
        if other.input.is_some() {
            self.input = other.input;
        }
        if other.grammar.is_some() {
            self.grammar = other.grammar;
        }
        if other.section_start.is_some() {
            self.section_start = other.section_start;
        }
    }

    fn finalize(self) -> Result<RenumberSettings, ConfigValidationErrors> {
        let mut errors = Vec::new();
        let fallback = || ConfigSource::default(PathBuf::from("."));

        let input = self
            .input
            .unwrap_or_else(|| Located::new(PathBuf::from(DEFAULT_INPUT), fallback()));
        if input.value.as_os_str().is_empty() {
            errors.push(
                ConfigValidationError::new(Some(input.source.clone()), "input cannot be empty".into())
                    .with_context("renumber.input"),
            );
        }

        let grammar_loc = self
            .grammar
            .unwrap_or_else(|| Located::new(Grammar::default().as_str().to_string(), fallback()));
        let grammar = match grammar_loc.value.parse::<Grammar>() {
            Ok(grammar) => grammar,
            Err(_) => {
                let known: Vec<&str> = Grammar::ALL.iter().map(|g| g.as_str()).collect();
                errors.push(
                    ConfigValidationError::new(
                        Some(grammar_loc.source.clone()),
                        format!(
                            "unknown grammar '{}' (expected one of: {})",
                            grammar_loc.value,
                            known.join(", ")
                        ),
                    )
                    .with_context("renumber.grammar"),
                );
                Grammar::default()
            }
        };

        let section_start = self
            .section_start
            .unwrap_or_else(|| Located::new(DEFAULT_SECTION_START, fallback()));
        if section_start.value < DEFAULT_SECTION_START {
            errors.push(
                ConfigValidationError::new(
                    Some(section_start.source.clone()),
                    format!(
                        "section_start must be at least {DEFAULT_SECTION_START} (received {})",
                        section_start.value
                    ),
                )
                .with_context("renumber.section_start"),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(RenumberSettings {
            input: resolve_path(&input),
            grammar,
            section_start: section_start.value,
        })
    }
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

fn resolve_path(located: &Located<PathBuf>) -> PathBuf {
    let path = &located.value;
    if path.is_absolute() {
        path.clone()
    } else {
        located.source.base_dir.join(path)
    }
}

/// Every problem found in the merged `[renumber]` table, one per line.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// One bad key, with the layer that set it.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    renumber: Option<RawRenumber>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRenumber {
    #[serde(default)]
    input: Option<PathBuf>,
    #[serde(default)]
    grammar: Option<String>,
    #[serde(default)]
    section_start: Option<i64>,
}

impl RawRenumber {
    fn into_partial(self, source: ConfigSource) -> RenumberPartial {
        RenumberPartial {
            input: self.input.map(|value| Located::new(value, source.clone())),
            grammar: self.grammar.map(|value| Located::new(value, source.clone())),
            section_start: self.section_start.map(|value| Located::new(value, source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_layers_replace_individual_keys() {
        let base = ConfigSource::default(PathBuf::from("/work"));
        let mut merged = defaults_layer(base);
        merged.merge(RenumberPartial {
            grammar: Some(Located::new(
                "double-bracket".into(),
                ConfigSource::for_file(ConfigSourceKind::Local, PathBuf::from("/work/.ts-renumber.toml")),
            )),
            ..RenumberPartial::default()
        });

        let settings = merged.finalize().unwrap();
        assert_eq!(settings.grammar, Grammar::DoubleBracket);
        assert_eq!(settings.section_start, -1);
        assert_eq!(settings.input, PathBuf::from("/work/README.md"));
    }

    #[test]
    fn validation_errors_name_their_layer() {
        let source =
            ConfigSource::for_file(ConfigSourceKind::Override, PathBuf::from("/tmp/custom.toml"));
        let partial = RenumberPartial {
            section_start: Some(Located::new(-5, source)),
            ..RenumberPartial::default()
        };

        let errors = partial.finalize().unwrap_err();
        let rendered = errors.to_string();
        assert!(rendered.contains("renumber.section_start"));
        assert!(rendered.contains("(--config /tmp/custom.toml)"));
    }
}
