use super::lexorank::RankError;
use super::{Bucket, LexoRank};
use ini::Properties;
use log::{debug, warn};
use serde::Deserialize;
use shellexpand::env_with_context_no_errors;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ini configuration: {0}")]
    Ini(#[from] ini::Error),
    #[error("invalid yaml configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unexpected section '{0}'")]
    UnexpectedSection(String),
    #[error("unexpected property '{0}'")]
    UnexpectedProperty(String),
    #[error("invalid value '{value}' for property '{key}'")]
    InvalidProperty { key: String, value: String },
    #[error(transparent)]
    Rank(#[from] RankError),
}

/// Settings as read from a single file. Unset keys leave the value from
/// previously read files untouched.
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    default_bucket: Option<Bucket>,
    warn_length: Option<usize>,
}

impl SettingsFile {
    fn merge(&mut self, other: Self) {
        if let Some(default_bucket) = other.default_bucket {
            self.default_bucket = Some(default_bucket);
        }
        if let Some(warn_length) = other.warn_length {
            self.warn_length = Some(warn_length);
        }
    }

    fn from_ini_reader(mut reader: impl std::io::Read) -> Result<Self, ConfigurationError> {
        use ini::Ini;

        let parser = Ini::read_from_noescape(&mut reader)?;
        let mut settings = SettingsFile::default();
        for (sec, prop) in parser.iter() {
            match sec {
                Some("Main") => settings.merge(prop.try_into()?),
                Some(sec) => return Err(ConfigurationError::UnexpectedSection(sec.to_string())),
                None => {
                    if let Some(key) = prop.iter().next().map(|(k, _)| k) {
                        return Err(ConfigurationError::UnexpectedProperty(key.to_string()));
                    }
                }
            }
        }

        Ok(settings)
    }

    fn from_yaml_reader(reader: impl std::io::Read) -> Result<Self, ConfigurationError> {
        let settings: Self = serde_yaml::from_reader(reader)?;
        Ok(settings)
    }

    /// Read `lexorank.conf` then `lexorank.yaml` from a directory
    fn from_dir(dir: &Path) -> Result<Self, ConfigurationError> {
        let mut settings = Self::default();

        if let Ok(file) = File::open(dir.join("lexorank.conf")) {
            debug!("reading {}", dir.join("lexorank.conf").display());
            settings.merge(Self::from_ini_reader(BufReader::new(file))?);
        }
        if let Ok(file) = File::open(dir.join("lexorank.yaml")) {
            debug!("reading {}", dir.join("lexorank.yaml").display());
            settings.merge(Self::from_yaml_reader(BufReader::new(file))?);
        }

        Ok(settings)
    }
}

impl TryFrom<&Properties> for SettingsFile {
    type Error = ConfigurationError;

    fn try_from(props: &Properties) -> Result<Self, Self::Error> {
        let mut res = Self::default();

        for (k, v) in props.iter() {
            match k {
                "default_bucket" => {
                    res.default_bucket = Some(v.trim().parse()?);
                }
                "warn_length" => {
                    res.warn_length =
                        Some(
                            v.trim()
                                .parse()
                                .map_err(|_| ConfigurationError::InvalidProperty {
                                    key: k.to_string(),
                                    value: v.to_string(),
                                })?,
                        );
                }
                _ => {
                    return Err(ConfigurationError::UnexpectedProperty(k.to_string()));
                }
            }
        }

        Ok(res)
    }
}

/// Defaults applied when handling ranks given by users
///
/// Settings are read from `lexorank.conf` (ini, `[Main]` section) and
/// `lexorank.yaml` in each configuration directory, later files overriding
/// earlier ones:
///
/// ```ini
/// [Main]
/// default_bucket = 1
/// warn_length = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    default_bucket: Bucket,
    warn_length: Option<usize>,
}

static GLOBAL_SETTINGS: RwLock<Option<Arc<Settings>>> = RwLock::new(None);

static CONFIG_PATHS: &[&str] = &[
    "/etc/lexorank",
    "$HOME/.local/etc/lexorank",
    "$XDG_CONFIG_HOME/lexorank",
];

// Expand environment variables in a path
// Returns None in case of non-utf8 path
fn resolve_config_path(path: &Path) -> Option<PathBuf> {
    let context = |s: &str| match s {
        "HOME" => std::env::var("HOME").ok(),
        "XDG_CONFIG_HOME" => std::env::var("XDG_CONFIG_HOME").ok().or_else(|| {
            std::env::var("HOME")
                .ok()
                .and_then(|h| Path::new(&h).join(".config").to_str().map(String::from))
        }),
        _ => None,
    };

    Some(PathBuf::from(
        env_with_context_no_errors(path.to_str()?, context).as_ref(),
    ))
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        Self {
            default_bucket: file.default_bucket.unwrap_or_default(),
            warn_length: file.warn_length,
        }
    }
}

impl Settings {
    pub fn new(default_bucket: Bucket, warn_length: Option<usize>) -> Self {
        Self {
            default_bucket,
            warn_length,
        }
    }

    /// Load settings from the default configuration directories
    pub fn from_config() -> Result<Self, ConfigurationError> {
        Self::from_dirs(
            CONFIG_PATHS
                .iter()
                .filter_map(|path| resolve_config_path(Path::new(path))),
        )
    }

    /// Load settings from the given directories, in order
    pub fn from_dirs(
        dirs: impl IntoIterator<Item = impl AsRef<Path>>,
    ) -> Result<Self, ConfigurationError> {
        let mut file = SettingsFile::default();
        for dir in dirs {
            file.merge(SettingsFile::from_dir(dir.as_ref())?);
        }

        Ok(file.into())
    }

    /// Set the settings used by [`Settings::get_global`]
    pub fn set_global(settings: Settings) {
        *GLOBAL_SETTINGS
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(settings));
    }

    /// Get the global settings, or the default settings if none were set
    pub fn get_global() -> Arc<Settings> {
        GLOBAL_SETTINGS
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .cloned()
            .unwrap_or_default()
    }

    /// Bucket given to ranks that are written without one
    pub fn default_bucket(&self) -> Bucket {
        self.default_bucket
    }

    pub fn warn_length(&self) -> Option<usize> {
        self.warn_length
    }

    /// Parse a rank from its canonical form or from a bare value
    ///
    /// Bare values are placed in the default bucket.
    pub fn parse_rank(&self, s: &str) -> Result<LexoRank, RankError> {
        if s.contains('|') {
            s.parse()
        } else {
            LexoRank::with_bucket(s, self.default_bucket)
        }
    }

    /// Log a warning if `rank` grew past the configured length
    ///
    /// Returns whether the rank is too long.
    pub fn check_length(&self, rank: &LexoRank) -> bool {
        match self.warn_length {
            Some(max) if rank.value().len() > max => {
                warn!(
                    "rank {} is {} digits long, the list may need to be rebalanced",
                    rank,
                    rank.value().len()
                );
                true
            }
            _ => false,
        }
    }
}
