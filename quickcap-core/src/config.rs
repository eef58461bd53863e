//! User configuration at ~/.config/quickcap/config.toml
//!
//! Values can be overridden from the environment with `QUICKCAP_` variables,
//! using `__` for nesting (`QUICKCAP_REST__API_KEY`).

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};
use crate::store::{BinStore, DEFAULT_BIN_URL, LocalStore, RestStore, Store};

static DEFAULT_DATA_FILE: &str = "~/.local/share/quickcap/items.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Bin,
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinConfig {
    #[serde(default = "default_bin_url")]
    pub url: String,
    pub bin_id: Option<String>,
    pub access_key: Option<String>,
}

fn default_bin_url() -> String {
    DEFAULT_BIN_URL.to_string()
}

impl Default for BinConfig {
    fn default() -> Self {
        BinConfig {
            url: default_bin_url(),
            bin_id: None,
            access_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickcapConfig {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// IANA zone stamped on new items. Defaults to the host's zone.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub bin: BinConfig,

    #[serde(default)]
    pub rest: RestConfig,
}

fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("quickcap").join("items.json"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

/// The host's IANA zone, or UTC when it can't be determined.
pub fn default_timezone() -> String {
    iana_time_zone::get_timezone()
        .ok()
        .filter(|tz| tz.parse::<chrono_tz::Tz>().is_ok())
        .unwrap_or_else(|| "UTC".to_string())
}

impl Default for QuickcapConfig {
    fn default() -> Self {
        QuickcapConfig {
            backend: Backend::default(),
            data_file: default_data_file(),
            timezone: default_timezone(),
            bin: BinConfig::default(),
            rest: RestConfig::default(),
        }
    }
}

impl QuickcapConfig {
    pub fn config_path() -> CaptureResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CaptureError::Config("Could not determine config directory".into()))?
            .join("quickcap");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out file there
    /// first if none exists.
    pub fn load() -> CaptureResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CaptureResult<Self> {
        let config: QuickcapConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("QUICKCAP").separator("__"))
            .build()
            .map_err(|e| CaptureError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CaptureError::Config(e.to_string()))?;

        if config.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(CaptureError::Config(format!(
                "Unknown timezone '{}'",
                config.timezone
            )));
        }

        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CaptureResult<()> {
        let contents = format!(
            "\
# quickcap configuration

# Where items are stored: \"local\", \"bin\" or \"rest\"
# backend = \"local\"

# Local data file (also the local side of `quickcap sync`):
# data_file = \"{}\"

# Timezone for new items (defaults to the system timezone):
# timezone = \"Europe/London\"

# Hosted JSON bin used by `quickcap sync` and the bin backend:
# [bin]
# url = \"{}\"
# bin_id = \"\"
# access_key = \"\"

# quickcap-server used by the rest backend:
# [rest]
# url = \"http://127.0.0.1:3000\"
# api_key = \"\"
",
            DEFAULT_DATA_FILE, DEFAULT_BIN_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CaptureError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CaptureError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// The effective settings as TOML, with keys masked.
    pub fn to_toml(&self) -> CaptureResult<String> {
        let mask = |secret: &Option<String>| secret.as_ref().map(|_| "********".to_string());

        let mut shown = self.clone();
        shown.bin.access_key = mask(&self.bin.access_key);
        shown.rest.api_key = mask(&self.rest.api_key);

        toml::to_string(&shown).map_err(|e| CaptureError::Serialization(e.to_string()))
    }

    /// The data file with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_file.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn local_store(&self) -> LocalStore {
        LocalStore::new(self.data_path())
    }

    pub fn bin_store(&self) -> CaptureResult<BinStore> {
        let bin_id = self
            .bin
            .bin_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CaptureError::Config("bin.bin_id is not set".into()))?;
        let access_key = self
            .bin
            .access_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CaptureError::Config("bin.access_key is not set".into()))?;
        Ok(BinStore::new(&self.bin.url, bin_id, access_key))
    }

    pub fn rest_store(&self) -> CaptureResult<RestStore> {
        let url = self
            .rest
            .url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CaptureError::Config("rest.url is not set".into()))?;
        Ok(RestStore::new(url, self.rest.api_key.clone()))
    }

    /// The store items are read from and saved to.
    pub fn store(&self) -> CaptureResult<Box<dyn Store>> {
        Ok(match self.backend {
            Backend::Local => Box::new(self.local_store()),
            Backend::Bin => Box::new(self.bin_store()?),
            Backend::Rest => Box::new(self.rest_store()?),
        })
    }

    /// The store `quickcap sync` talks to: the REST server when that is the
    /// backend, otherwise the bin.
    pub fn sync_remote(&self) -> CaptureResult<Box<dyn Store>> {
        Ok(match self.backend {
            Backend::Rest => Box::new(self.rest_store()?),
            Backend::Local | Backend::Bin => Box::new(self.bin_store()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_file_is_all_comments_and_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quickcap").join("config.toml");
        QuickcapConfig::create_default_config(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().all(|l| l.is_empty() || l.starts_with('#')));

        let config = QuickcapConfig::load_from(&path).unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.bin.url, DEFAULT_BIN_URL);
        assert!(config.rest.url.is_none());
    }

    #[test]
    fn reads_backend_sections_and_expands_tilde() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
backend = "rest"
data_file = "~/items.json"
timezone = "America/New_York"

[rest]
url = "http://localhost:3000"
api_key = "abc"
"#,
        )
        .unwrap();

        let config = QuickcapConfig::load_from(&path).unwrap();
        assert_eq!(config.backend, Backend::Rest);
        assert_eq!(config.timezone, "America/New_York");
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
        assert_eq!(config.store().unwrap().name(), "rest");
    }

    #[test]
    fn bin_backend_without_credentials_is_config_error() {
        let config = QuickcapConfig {
            backend: Backend::Bin,
            ..QuickcapConfig::default()
        };
        assert!(matches!(config.store(), Err(CaptureError::Config(_))));
        assert!(matches!(config.sync_remote(), Err(CaptureError::Config(_))));
    }

    #[test]
    fn bin_url_defaults_without_bin_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend = \"local\"\n").unwrap();

        let config = QuickcapConfig::load_from(&path).unwrap();
        assert_eq!(config.bin.url, DEFAULT_BIN_URL);
        assert!(config.to_toml().unwrap().contains(DEFAULT_BIN_URL));
    }

    #[test]
    fn toml_dump_masks_secrets() {
        let mut config = QuickcapConfig::default();
        config.bin.access_key = Some("secret-key".into());
        config.rest.url = Some("http://localhost:3000".into());

        let dump = config.to_toml().unwrap();
        assert!(!dump.contains("secret-key"));
        assert!(dump.contains("access_key = \"********\""));
        assert!(dump.contains("url = \"http://localhost:3000\""));
        assert!(dump.contains("backend = \"local\""));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timezone = \"Nowhere/Special\"\n").unwrap();
        assert!(matches!(
            QuickcapConfig::load_from(&path),
            Err(CaptureError::Config(_))
        ));
    }
}
