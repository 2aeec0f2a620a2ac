//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/netdisk/config.toml`
//! - Windows: `%APPDATA%/netdisk/config.toml`

use std::path::{Path, PathBuf};

use netdisk_upload::{DEFAULT_UPLOAD_THREADS, UploadConfig};
use serde::{Deserialize, Serialize};

/// Uploader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetdiskConfig {
    /// OAuth access token sent with every request.
    #[serde(default)]
    pub access_token: String,

    /// Concurrent slice uploads. Out-of-range values fall back to 3.
    #[serde(default = "default_upload_thread")]
    pub upload_thread: i64,

    /// Slice size in bytes.
    #[serde(default = "default_slice_size")]
    pub slice_size: u64,

    /// Directory for staged copies (system temp dir when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dir: Option<PathBuf>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_upload_url")]
    pub upload_url: String,
}

fn default_upload_thread() -> i64 {
    DEFAULT_UPLOAD_THREADS as i64
}

fn default_slice_size() -> u64 {
    netdisk_transfer::DEFAULT_SLICE_SIZE
}

fn default_api_base() -> String {
    netdisk_client::DEFAULT_API_BASE.into()
}

fn default_upload_url() -> String {
    netdisk_client::DEFAULT_UPLOAD_URL.into()
}

impl Default for NetdiskConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            upload_thread: default_upload_thread(),
            slice_size: default_slice_size(),
            temp_dir: None,
            api_base: default_api_base(),
            upload_url: default_upload_url(),
        }
    }
}

impl NetdiskConfig {
    /// Loads configuration from `path`, or creates a default there if not found.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: NetdiskConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = NetdiskConfig::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix (holds the access token).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Library settings derived from this file.
    pub fn upload_config(&self) -> UploadConfig {
        UploadConfig {
            slice_size: self.slice_size,
            temp_dir: self.temp_dir.clone(),
            ..UploadConfig::default()
        }
        .with_threads(self.upload_thread)
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("netdisk")
            .join("config.toml")
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("netdisk").join("config.toml")
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        PathBuf::from("/tmp/netdisk/config.toml")
    }
}
