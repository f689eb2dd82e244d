use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeviceConfig {
    /// Name announced by the wireless transport
    #[serde(default = "default_device_name")]
    pub device_name: String,

    #[serde(default = "default_db_dir")]
    pub db_root_dir: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Physical position the simulated board starts in
    #[serde(default = "default_initially_closed")]
    pub simulated_initially_closed: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
            db_root_dir: default_db_dir(),
            log_dir: default_log_dir(),
            simulated_initially_closed: default_initially_closed(),
        }
    }
}

impl DeviceConfig {
    /// # Errors
    /// Returns `Error::InvalidConfig` when the name is empty or a directory
    /// cannot be created.
    pub fn validate(&self) -> Result<()> {
        if self.device_name.trim().is_empty() {
            return Err(Error::InvalidConfig("device_name cannot be empty".into()));
        }

        validate_directory(&self.db_root_dir, "db_root_dir")?;
        validate_directory(&self.log_dir, "log_dir")?;
        Ok(())
    }
}

/// Ensures directory path is valid and writable
pub(crate) fn validate_directory(
    path: &Path,
    name: &str,
) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidConfig(format!("{} path cannot be empty", name)));
    }

    #[cfg(not(test))]
    {
        use std::fs;
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| {
                Error::InvalidConfig(format!(
                    "Failed to create {} directory at {}: {}",
                    name,
                    path.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

fn default_device_name() -> String {
    "CubeLock-123456".to_string()
}
fn default_db_dir() -> PathBuf {
    PathBuf::from("./db")
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}
fn default_initially_closed() -> bool {
    true
}
